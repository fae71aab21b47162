// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Incremental build helpers.
//!
//! Stalescan answers one question for a build step: which sources must be
//! handed to the processor again? A processor can be a compiler, a code
//! generator, or anything else that turns source files into output files.
//! Sources are discovered under one or more source roots, and are compared
//! against the outputs that a [`SourceMapping`] says they produce.
//!
//! A small archive proxy is also provided for steps that assemble archives,
//! see [`archive`].

pub mod archive;
pub mod config;
pub mod mapping;
pub mod plan;
pub mod scanner;
pub mod state;

pub use config::{ConfigError, ScanConfig};
pub use mapping::SourceMapping;
pub use plan::{plan, Plan, PlanError, Reason};
pub use scanner::{compute_stale, list_sources, Inclusion, ScanError, StaleSet, StalenessScanner};
