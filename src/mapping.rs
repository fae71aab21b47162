// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Source to output mapping.
//!
//! A __source mapping__ tells the scanner where the output of a given source
//! file is expected to live. The scanner never looks at file contents, only at
//! whether the expected outputs exist and how old they are. Thus, the mapping
//! is the only piece of knowledge the scanner has about the processor that
//! consumes the sources.
//!
//! # Output Styles
//!
//! Processors come in two flavors:
//!
//! 1. __Per-file__ processors emit one output per input, e.g., a compiler
//!    that turns `Foo.java` into `Foo.class`. See [`SourceMapping::Suffix`].
//! 2. __Aggregate__ processors fold every input into one shared output, e.g.,
//!    a compiler that emits a single assembly for a whole module. See
//!    [`SourceMapping::SingleTarget`].
//!
//! A source that a mapping does not recognize is simply not a source of
//! interest. It maps to nothing, and is never reported as an error.

use std::path::{Path, PathBuf};

/// Mapping from a source file to its expected output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapping {
    /// One output per input through suffix substitution.
    ///
    /// Relative directory structure of the source is preserved under the
    /// target directory. A source may map to more than one output when
    /// multiple target suffixes are given.
    Suffix {
        target_dir: PathBuf,
        source_suffixes: Vec<String>,
        target_suffixes: Vec<String>,
    },

    /// Every input maps to the same shared output file.
    SingleTarget {
        source_suffix: String,
        target_file: PathBuf,
    },
}

impl SourceMapping {
    /// Construct per-file mapping with one source suffix and one target suffix.
    pub fn suffix(
        target_dir: impl Into<PathBuf>,
        source_suffix: impl AsRef<str>,
        target_suffix: impl AsRef<str>,
    ) -> Self {
        Self::suffixes(target_dir, [source_suffix], [target_suffix])
    }

    /// Construct per-file mapping with any number of source and target suffixes.
    pub fn suffixes(
        target_dir: impl Into<PathBuf>,
        source_suffixes: impl IntoIterator<Item = impl AsRef<str>>,
        target_suffixes: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self::Suffix {
            target_dir: target_dir.into(),
            source_suffixes: source_suffixes
                .into_iter()
                .map(|suffix| normalize_suffix(suffix.as_ref()))
                .collect(),
            target_suffixes: target_suffixes
                .into_iter()
                .map(|suffix| normalize_suffix(suffix.as_ref()))
                .collect(),
        }
    }

    /// Construct aggregate mapping onto one shared target file.
    pub fn single_target(source_suffix: impl AsRef<str>, target_file: impl Into<PathBuf>) -> Self {
        Self::SingleTarget {
            source_suffix: normalize_suffix(source_suffix.as_ref()),
            target_file: target_file.into(),
        }
    }

    /// Check if all inputs share one output.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::SingleTarget { .. })
    }

    /// List source suffixes recognized by mapping.
    ///
    /// An empty suffix means that any file is recognized.
    pub fn source_suffixes(&self) -> Vec<&str> {
        match self {
            Self::Suffix {
                source_suffixes, ..
            } => source_suffixes.iter().map(String::as_str).collect(),
            Self::SingleTarget { source_suffix, .. } => vec![source_suffix.as_str()],
        }
    }

    /// Determine expected output files of a source.
    ///
    /// The source path must be relative to its source root. Returns an empty
    /// listing if the source is not recognized by the mapping, which includes
    /// file names that become empty once their suffix is stripped.
    pub fn target_files(&self, relative_source: impl AsRef<Path>) -> Vec<PathBuf> {
        let relative_source = relative_source.as_ref();
        let Some(name) = relative_source.file_name().and_then(|name| name.to_str()) else {
            return Vec::new();
        };

        match self {
            Self::Suffix {
                target_dir,
                source_suffixes,
                target_suffixes,
            } => {
                let Some(stem) = source_suffixes
                    .iter()
                    .find_map(|suffix| strip_suffix(name, suffix))
                else {
                    return Vec::new();
                };

                let parent = target_dir.join(relative_source.parent().unwrap_or(Path::new("")));
                target_suffixes
                    .iter()
                    .map(|suffix| parent.join(format!("{stem}{suffix}")))
                    .collect()
            }
            Self::SingleTarget {
                source_suffix,
                target_file,
            } => match strip_suffix(name, source_suffix) {
                Some(_) => vec![target_file.clone()],
                None => Vec::new(),
            },
        }
    }
}

/// Strip suffix from file name, rejecting names that would become empty.
fn strip_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    name.strip_suffix(suffix).filter(|stem| !stem.is_empty())
}

/// Give suffix a leading dot.
///
/// Processors are not consistent about reporting file endings with or without
/// the dot, so both "java" and ".java" mean the same thing here.
pub(crate) fn normalize_suffix(suffix: &str) -> String {
    let suffix = suffix.trim();
    if suffix.is_empty() || suffix.starts_with('.') {
        suffix.to_owned()
    } else {
        format!(".{suffix}")
    }
}
