// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Recorded input file tree.
//!
//! Timestamps alone cannot tell that a source was deleted, or that an old file
//! was moved into a source root. Incremental mode catches these cases by
//! comparing the current listing of sources against the listing recorded after
//! the previous run. That listing is the __input manifest__: a file holding one
//! absolute source path per line. Paths are stored as raw bytes, so names that
//! are not valid UTF-8 survive a round trip.

use std::{
    collections::BTreeSet,
    fs::{read, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Listing of sources seen by a previous run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputManifest {
    files: BTreeSet<PathBuf>,
}

impl InputManifest {
    /// Construct new input manifest.
    pub fn new(files: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Load input manifest.
    ///
    /// Returns `None` if no manifest was recorded yet.
    ///
    /// # Errors
    ///
    /// - Return [`StateError::Read`] if manifest exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        match read(path.as_ref()) {
            Ok(content) => Ok(Some(Self::from_bytes(&content))),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no input manifest at {:?}", path.as_ref().display());
                Ok(None)
            }
            Err(err) => Err(StateError::Read {
                source: err,
                manifest_path: path.as_ref().to_path_buf(),
            }),
        }
    }

    /// Record input manifest.
    ///
    /// Creates parent directories of manifest if needed.
    ///
    /// # Errors
    ///
    /// - Return [`StateError::CreateDir`] if parent directories cannot be created.
    /// - Return [`StateError::Write`] if manifest cannot be written.
    pub fn record(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            mkdirp::mkdirp(parent).map_err(|err| StateError::CreateDir {
                source: err,
                manifest_path: path.to_path_buf(),
            })?;
        }

        write(path, self.to_bytes()).map_err(|err| StateError::Write {
            source: err,
            manifest_path: path.to_path_buf(),
        })?;

        Ok(())
    }

    /// Check if current sources differ from recorded ones.
    pub fn differs_from<'a>(&self, sources: impl IntoIterator<Item = &'a Path>) -> bool {
        let current = sources.into_iter().collect::<BTreeSet<_>>();
        current.len() != self.files.len()
            || !self.files.iter().all(|file| current.contains(file.as_path()))
    }

    /// Iterate through recorded sources.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Encode manifest with one path per line.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut content = Vec::new();
        for file in &self.files {
            content.extend_from_slice(file.as_os_str().as_encoded_bytes());
            content.push(b'\n');
        }

        content
    }

    /// Decode manifest from one path per line, skipping blank lines.
    pub fn from_bytes(content: &[u8]) -> Self {
        Self::new(
            content
                .split(|byte| *byte == b'\n')
                .filter(|line| !line.is_empty())
                .map(path_from_bytes),
        )
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Input manifest error types.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Input manifest cannot be read from.
    #[error("failed to read input manifest at {:?}", manifest_path.display())]
    Read {
        #[source]
        source: std::io::Error,
        manifest_path: PathBuf,
    },

    /// Directory of input manifest cannot be created.
    #[error("failed to create directory for input manifest at {:?}", manifest_path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        manifest_path: PathBuf,
    },

    /// Input manifest cannot be written to.
    #[error("failed to write input manifest at {:?}", manifest_path.display())]
    Write {
        #[source]
        source: std::io::Error,
        manifest_path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = StateError> = std::result::Result<T, E>;
