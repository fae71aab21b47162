// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use stalescan::{
    plan::{plan, record_inputs, Plan},
    scanner::Inclusion,
    ScanConfig,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "stalescan [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    /// Path to scan configuration file.
    #[arg(short, long, value_name = "path", default_value = "stalescan.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let config = ScanConfig::load(&self.config)?;
        match self.command {
            Command::Scan(opts) => run_scan(config, opts),
            Command::List => run_list(config),
            Command::Plan(opts) => run_plan(config, opts),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List sources whose outputs are missing or out of date.
    #[command(override_usage = "stalescan scan [options]")]
    Scan(ScanOptions),

    /// List every recognized source.
    #[command(override_usage = "stalescan list")]
    List,

    /// Decide which sources the processor needs to be given.
    #[command(override_usage = "stalescan plan [options]")]
    Plan(PlanOptions),
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct ScanOptions {
    /// Override configured staleness tolerance in milliseconds.
    #[arg(short, long, value_name = "millis")]
    pub stale_millis: Option<u64>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct PlanOptions {
    /// Record current input file tree for the next incremental run.
    #[arg(short, long)]
    pub record: bool,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn run_scan(config: ScanConfig, opts: ScanOptions) -> Result<()> {
    let tolerance_millis = opts.stale_millis.unwrap_or(config.stale_millis);
    let stale = config
        .scanner(Inclusion::Stale { tolerance_millis })?
        .scan(&config.source_roots)?;
    if stale.is_empty() {
        info!("all outputs are up to date");
    }

    for source in stale.iter() {
        println!("{}", source.display());
    }

    Ok(())
}

fn run_list(config: ScanConfig) -> Result<()> {
    let sources = config
        .scanner(Inclusion::All)?
        .scan(&config.source_roots)?;
    for source in sources.iter() {
        println!("{}", source.display());
    }

    Ok(())
}

fn run_plan(config: ScanConfig, opts: PlanOptions) -> Result<()> {
    match plan(&config)? {
        Plan::UpToDate => info!("nothing to process"),
        Plan::Process { sources, reason } => {
            info!("{reason}: {} sources to process", sources.len());
            for source in sources.iter() {
                println!("{}", source.display());
            }
        }
    }

    if opts.record {
        record_inputs(&config)?;
    }

    Ok(())
}
