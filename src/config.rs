// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout of the scan configuration file to simplify the process
//! of serialization and deserialization. The configuration is an immutable
//! value handed to the scanner at call time. Nothing about it is kept around
//! between scans.
//!
//! # General Layout
//!
//! ```toml
//! source_roots = ["src/main/java", "target/generated-sources/annotations"]
//! output_directory = "target/classes"
//! stale_millis = 0
//!
//! [mapping]
//! style = "per-file"
//! input_suffix = ".java"
//! output_suffixes = [".class"]
//! ```
//!
//! The `[mapping]` table selects the output style of the processor. Use
//! `style = "aggregate"` with an `output_file` for processors that fold all
//! inputs into one shared output.

use crate::{
    mapping::SourceMapping,
    scanner::{Inclusion, ScanError, SourceFilter, StalenessScanner},
};

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Name of input manifest file kept under the output directory.
const STATUS_FILE: &str = ".stalescan/inputFiles.lst";

/// Scan configuration layout.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Ordered listing of directories to discover sources in.
    pub source_roots: Vec<PathBuf>,

    /// Directory that per-file outputs are written to.
    pub output_directory: PathBuf,

    /// Directory of generated sources that should never be scanned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_sources_directory: Option<PathBuf>,

    /// Tolerance in milliseconds before a newer source counts as stale.
    #[serde(default)]
    pub stale_millis: u64,

    /// Glob patterns of sources to include relative to their root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    /// Glob patterns of sources to exclude relative to their root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,

    /// Hand every source to the processor whenever anything changed.
    #[serde(default)]
    pub incremental: bool,

    /// Location of input manifest used by incremental mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_file: Option<PathBuf>,

    /// Output style of processor.
    pub mapping: MappingConfig,
}

impl ScanConfig {
    /// Load configuration file.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if file cannot be read.
    /// - Return any error from [`ScanConfig::from_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_to_string(path.as_ref())
            .map_err(|err| ConfigError::Read {
                source: err,
                path: path.as_ref().to_path_buf(),
            })?
            .parse()
    }

    /// Build source mapping for configured output style.
    ///
    /// Aggregate output files are relative to the output directory unless
    /// they are absolute.
    pub fn source_mapping(&self) -> SourceMapping {
        match &self.mapping {
            MappingConfig::PerFile {
                input_suffix,
                output_suffixes,
            } => SourceMapping::suffixes(
                &self.output_directory,
                input_suffix.as_slice(),
                output_suffixes,
            ),
            MappingConfig::Aggregate {
                input_suffix,
                output_file,
                ..
            } => SourceMapping::single_target(input_suffix, self.output_directory.join(output_file)),
        }
    }

    /// Build scanner over configured mapping and source filter.
    ///
    /// The generated sources directory is skipped if configured.
    ///
    /// # Errors
    ///
    /// - Return [`ScanError::Pattern`] if include or exclude patterns are malformed.
    pub fn scanner(&self, inclusion: Inclusion) -> Result<StalenessScanner, ScanError> {
        let filter = SourceFilter::new(&self.includes, &self.excludes)?;
        let scanner = StalenessScanner::new(self.source_mapping(), inclusion).with_filter(filter);

        Ok(match &self.generated_sources_directory {
            Some(generated) => scanner.skip_root(generated),
            None => scanner,
        })
    }

    /// Check if processor can patch an existing aggregate output.
    ///
    /// Per-file processors never need to.
    pub fn can_update_target(&self) -> bool {
        match &self.mapping {
            MappingConfig::PerFile { .. } => true,
            MappingConfig::Aggregate {
                can_update_target, ..
            } => *can_update_target,
        }
    }

    /// Path to input manifest.
    pub fn status_file_path(&self) -> PathBuf {
        match &self.status_file {
            Some(path) => path.clone(),
            None => self.output_directory.join(STATUS_FILE),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            source_roots: vec![PathBuf::from("src/main/java")],
            output_directory: PathBuf::from("target/classes"),
            generated_sources_directory: None,
            stale_millis: 0,
            includes: Vec::new(),
            excludes: Vec::new(),
            incremental: false,
            status_file: None,
            mapping: MappingConfig::default(),
        }
    }
}

impl FromStr for ScanConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: ScanConfig = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on every path field.
        config.source_roots = config
            .source_roots
            .iter()
            .map(|root| expand_path(root))
            .collect::<Result<Vec<_>>>()?;
        config.output_directory = expand_path(&config.output_directory)?;
        config.generated_sources_directory = config
            .generated_sources_directory
            .as_deref()
            .map(expand_path)
            .transpose()?;
        config.status_file = config.status_file.as_deref().map(expand_path).transpose()?;

        match &mut config.mapping {
            MappingConfig::PerFile {
                output_suffixes, ..
            } if output_suffixes.is_empty() => return Err(ConfigError::NoOutputSuffix),
            MappingConfig::Aggregate { output_file, .. } => *output_file = expand_path(output_file)?,
            MappingConfig::PerFile { .. } => {}
        }

        Ok(config)
    }
}

impl Display for ScanConfig {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Output style of processor.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(tag = "style", rename_all = "kebab-case")]
pub enum MappingConfig {
    /// One output per input.
    PerFile {
        /// Suffix or suffixes of recognized sources.
        input_suffix: InputSuffix,

        /// Suffixes of outputs produced for each source.
        output_suffixes: Vec<String>,
    },

    /// One shared output for all inputs.
    Aggregate {
        /// Suffix of recognized sources.
        input_suffix: String,

        /// Shared output file.
        output_file: PathBuf,

        /// Processor can patch existing output instead of regenerating it.
        #[serde(default)]
        can_update_target: bool,
    },
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::PerFile {
            input_suffix: InputSuffix::One(".java".into()),
            output_suffixes: vec![".class".into()],
        }
    }
}

/// One or many input suffixes.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum InputSuffix {
    One(String),
    Many(Vec<String>),
}

impl InputSuffix {
    /// Treat suffixes as slice.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(suffix) => std::slice::from_ref(suffix),
            Self::Many(suffixes) => suffixes.as_slice(),
        }
    }
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    Ok(PathBuf::from(
        shellexpand::full(path.to_string_lossy().as_ref())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned(),
    ))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read configuration file at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize configuration.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Per-file mapping lists no output suffix.
    #[error("per-file mapping needs at least one output suffix")]
    NoOutputSuffix,
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("BLAH", "/home/blah/project")])]
    fn deserialize_scan_config() -> anyhow::Result<()> {
        let result: ScanConfig = r#"
            source_roots = ["$BLAH/src/main/java", "$BLAH/target/generated"]
            output_directory = "$BLAH/target/classes"
            generated_sources_directory = "$BLAH/target/generated"
            stale_millis = 20
            includes = ["**/*.java"]
            excludes = ["**/package-info.java"]

            [mapping]
            style = "per-file"
            input_suffix = "java"
            output_suffixes = ["class"]
        "#
        .parse()?;

        let expect = ScanConfig {
            source_roots: vec![
                "/home/blah/project/src/main/java".into(),
                "/home/blah/project/target/generated".into(),
            ],
            output_directory: "/home/blah/project/target/classes".into(),
            generated_sources_directory: Some("/home/blah/project/target/generated".into()),
            stale_millis: 20,
            includes: vec!["**/*.java".into()],
            excludes: vec!["**/package-info.java".into()],
            incremental: false,
            status_file: None,
            mapping: MappingConfig::PerFile {
                input_suffix: InputSuffix::One("java".into()),
                output_suffixes: vec!["class".into()],
            },
        };

        assert_eq!(result, expect);
        assert_eq!(
            result.source_mapping(),
            SourceMapping::suffix("/home/blah/project/target/classes", ".java", ".class")
        );

        Ok(())
    }

    #[test]
    fn deserialize_aggregate_mapping() -> anyhow::Result<()> {
        let result: ScanConfig = indoc! {r#"
            source_roots = ["src"]
            output_directory = "target"
            incremental = true

            [mapping]
            style = "aggregate"
            input_suffix = ".cs"
            output_file = "module.dll"
        "#}
        .parse()?;

        assert!(result.incremental);
        assert!(!result.can_update_target());
        assert_eq!(
            result.source_mapping(),
            SourceMapping::single_target(".cs", "target/module.dll")
        );
        assert_eq!(
            result.status_file_path(),
            PathBuf::from("target/.stalescan/inputFiles.lst")
        );

        Ok(())
    }

    #[test]
    fn deserialize_multiple_input_suffixes() -> anyhow::Result<()> {
        let result: ScanConfig = indoc! {r#"
            source_roots = ["src/main/antlr4"]
            output_directory = "target/generated-sources/antlr4"

            [mapping]
            style = "per-file"
            input_suffix = [".g", ".g4"]
            output_suffixes = [".tokens", ".java"]
        "#}
        .parse()?;

        assert_eq!(
            result.source_mapping(),
            SourceMapping::suffixes(
                "target/generated-sources/antlr4",
                [".g", ".g4"],
                [".tokens", ".java"]
            )
        );

        Ok(())
    }

    #[test]
    fn reject_unknown_mapping_style() {
        let result: Result<ScanConfig> = indoc! {r#"
            source_roots = ["src"]
            output_directory = "target"

            [mapping]
            style = "one-per-moon"
            input_suffix = ".java"
        "#}
        .parse();

        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn reject_empty_output_suffixes() {
        let result: Result<ScanConfig> = indoc! {r#"
            source_roots = ["src"]
            output_directory = "target"

            [mapping]
            style = "per-file"
            input_suffix = ".java"
            output_suffixes = []
        "#}
        .parse();

        assert!(matches!(result, Err(ConfigError::NoOutputSuffix)));
    }

    #[test]
    fn serialize_scan_config() -> anyhow::Result<()> {
        let config = ScanConfig {
            stale_millis: 20,
            excludes: vec!["**/Legacy*.java".into()],
            ..Default::default()
        };
        let result = config.to_string();

        assert!(result.contains("stale_millis = 20"));
        assert!(result.contains("[mapping]"));
        assert!(result.contains(r#"style = "per-file""#));
        assert!(!result.contains("status_file"));
        assert_eq!(result.parse::<ScanConfig>()?, config);

        Ok(())
    }
}
