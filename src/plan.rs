// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Processing plan of a build step.
//!
//! Decide which sources a build step should hand to its processor, if any.
//! The plan is computed once per build step from a [`ScanConfig`], and never
//! touches the processor itself.
//!
//! # Stale Mode
//!
//! By default only stale sources are processed. The exception is an aggregate
//! processor that cannot patch its existing output: it regenerates the whole
//! output in one pass, so it must be given every source as soon as any one of
//! them is stale. The source roots are scanned a second time in that case to
//! collect the complete listing.
//!
//! # Incremental Mode
//!
//! Incremental mode always hands the complete listing of sources to the
//! processor, but only if something changed: a stale source, a source that was
//! added or removed since the recorded input manifest, or an aggregate output
//! that cannot be patched.

use crate::{
    config::ScanConfig,
    scanner::{Inclusion, ScanError, StaleSet},
    state::{InputManifest, StateError},
};

use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::{debug, info, instrument};

/// Outcome of planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Every output is current.
    UpToDate,

    /// Hand sources to the processor.
    Process { sources: StaleSet, reason: Reason },
}

impl Plan {
    /// Sources to process, empty if up to date.
    pub fn sources(&self) -> Option<&StaleSet> {
        match self {
            Self::UpToDate => None,
            Self::Process { sources, .. } => Some(sources),
        }
    }
}

/// Why sources need processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Some sources are newer than their outputs.
    Stale,

    /// Aggregate output must be regenerated from every source.
    AggregateRebuild,

    /// Sources were added or removed since the last recorded run.
    InputTreeChanged,
}

impl Display for Reason {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Stale => fmt.write_str("stale sources detected"),
            Self::AggregateRebuild => fmt.write_str("aggregate output must be rebuilt"),
            Self::InputTreeChanged => fmt.write_str("input file tree changed"),
        }
    }
}

/// Plan processing of sources for a build step.
///
/// # Errors
///
/// - Return [`PlanError::Scan`] if scanning source roots fails.
/// - Return [`PlanError::State`] if input manifest cannot be read.
#[instrument(skip(config), level = "debug")]
pub fn plan(config: &ScanConfig) -> Result<Plan> {
    if config.incremental {
        debug!("incremental mode enabled");
        plan_incremental(config)
    } else {
        debug!("incremental mode disabled");
        plan_stale(config)
    }
}

/// Record complete listing of sources as input manifest for the next run.
///
/// # Errors
///
/// - Return [`PlanError::Scan`] if scanning source roots fails.
/// - Return [`PlanError::State`] if input manifest cannot be written.
#[instrument(skip(config), level = "debug")]
pub fn record_inputs(config: &ScanConfig) -> Result<()> {
    let sources = config.scanner(Inclusion::All)?.scan(&config.source_roots)?;
    let path = config.status_file_path();
    info!("record {} sources to {:?}", sources.len(), path.display());
    InputManifest::new(sources).record(path)?;

    Ok(())
}

fn plan_stale(config: &ScanConfig) -> Result<Plan> {
    let stale = stale_sources(config)?;
    if stale.is_empty() {
        info!("nothing to process - all outputs are up to date");
        return Ok(Plan::UpToDate);
    }

    if needs_full_rebuild(config) {
        info!("aggregate output cannot be updated in place, rescanning all sources");
        let sources = config.scanner(Inclusion::All)?.scan(&config.source_roots)?;
        return Ok(Plan::Process {
            sources,
            reason: Reason::AggregateRebuild,
        });
    }

    info!("{} stale sources to process", stale.len());
    Ok(Plan::Process {
        sources: stale,
        reason: Reason::Stale,
    })
}

fn plan_incremental(config: &ScanConfig) -> Result<Plan> {
    let sources = config.scanner(Inclusion::All)?.scan(&config.source_roots)?;

    // INVARIANT: Stop at the first change found.
    let reason = if needs_full_rebuild(config) {
        Some(Reason::AggregateRebuild)
    } else if !stale_sources(config)?.is_empty() {
        Some(Reason::Stale)
    } else if input_tree_changed(config, &sources)? {
        Some(Reason::InputTreeChanged)
    } else {
        None
    };

    match reason {
        Some(reason) => {
            info!("changes detected ({reason}), processing all {} sources", sources.len());
            Ok(Plan::Process { sources, reason })
        }
        None => {
            info!("nothing to process - all outputs are up to date");
            Ok(Plan::UpToDate)
        }
    }
}

fn stale_sources(config: &ScanConfig) -> Result<StaleSet> {
    let stale = config
        .scanner(Inclusion::Stale {
            tolerance_millis: config.stale_millis,
        })?
        .scan(&config.source_roots)?;

    for source in stale.iter() {
        debug!("stale source detected: {:?}", source.display());
    }

    Ok(stale)
}

fn input_tree_changed(config: &ScanConfig, sources: &StaleSet) -> Result<bool> {
    let changed = match InputManifest::load(config.status_file_path())? {
        Some(manifest) => manifest.differs_from(sources.iter()),
        None => true,
    };

    Ok(changed)
}

fn needs_full_rebuild(config: &ScanConfig) -> bool {
    config.source_mapping().is_aggregate() && !config.can_update_target()
}

/// Planning error types.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Scanning source roots fails.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Input manifest cannot be accessed.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Friendly result alias :3
pub type Result<T, E = PlanError> = std::result::Result<T, E>;
