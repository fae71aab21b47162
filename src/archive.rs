// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Prefixing archive proxy.
//!
//! Archive formats are somebody else's problem. This module only models the
//! capabilities that assembling an archive needs through the [`Archiver`]
//! trait, and provides [`PrefixingArchiver`], a decorator that sits in front of
//! any concrete archiver.
//!
//! # Prefixing
//!
//! Every destination path handed to the decorator is placed under a fixed
//! __root prefix__, e.g., `myapp-1.0/`. Callers can describe archive layout
//! relative to the archive root, and the decorator shifts everything into the
//! top-level directory.
//!
//! # Deduplication
//!
//! Nested archives are often reachable from more than one place during
//! assembly. The decorator remembers each `(archive, prefix)` pair it handed to
//! its delegate, and silently skips any repeat for the rest of its lifetime.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::{
    collections::HashSet,
    fmt::Debug,
    io,
    path::{self, Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, warn};

/// Capabilities of an archive writer.
pub trait Archiver {
    /// Add single file to archive at destination path.
    fn add_file(&mut self, source: &Path, destination: &str) -> Result<()>;

    /// Add contents of a directory to archive.
    fn add_directory(&mut self, file_set: FileSet) -> Result<()>;

    /// Add contents of another archive to archive.
    fn add_archived_file_set(&mut self, file_set: ArchivedFileSet) -> Result<()>;

    /// Write out archive.
    fn create_archive(&mut self) -> Result<()>;
}

/// Decide whether a file belongs in an archive.
pub trait FileSelector: Debug + Send + Sync {
    /// Check if file should be added.
    fn is_selected(&self, path: &Path) -> io::Result<bool>;
}

/// Directory contents to add to an archive.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    pub directory: PathBuf,
    pub prefix: String,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub selectors: Vec<Arc<dyn FileSelector>>,
}

impl FileSet {
    /// Construct new file set over directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// Place file set under prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Only add files that match patterns.
    pub fn with_includes(mut self, includes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    /// Never add files that match patterns.
    pub fn with_excludes(mut self, excludes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }
}

/// Contents of an existing archive to add to an archive.
#[derive(Debug, Clone, Default)]
pub struct ArchivedFileSet {
    pub archive: PathBuf,
    pub prefix: String,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub selectors: Vec<Arc<dyn FileSelector>>,
}

impl ArchivedFileSet {
    /// Construct new file set over archive.
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            ..Default::default()
        }
    }

    /// Place file set under prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Only add entries that match patterns.
    pub fn with_includes(mut self, includes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.includes = includes.into_iter().map(Into::into).collect();
        self
    }

    /// Never add entries that match patterns.
    pub fn with_excludes(mut self, excludes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excludes = excludes.into_iter().map(Into::into).collect();
        self
    }
}

/// Archiver decorator that prefixes destinations and skips repeated archives.
///
/// # Invariant
///
/// - For a given archive file and prefix, the delegate receives the archived
///   file set at most once.
/// - Nothing reaches the delegate in dry-run mode.
#[derive(Debug)]
pub struct PrefixingArchiver<A>
where
    A: Archiver,
{
    delegate: A,
    root_prefix: String,
    selectors: Vec<Arc<dyn FileSelector>>,
    seen: HashSet<(PathBuf, String)>,
    dry_run: bool,
}

impl<A> PrefixingArchiver<A>
where
    A: Archiver,
{
    /// Construct new prefixing archiver.
    ///
    /// A non-empty root prefix always ends with `/`.
    pub fn new(root_prefix: impl Into<String>, delegate: A) -> Self {
        let mut root_prefix = root_prefix.into();
        if !root_prefix.is_empty() && !root_prefix.ends_with('/') {
            root_prefix.push('/');
        }

        Self {
            delegate,
            root_prefix,
            selectors: Vec::new(),
            seen: HashSet::new(),
            dry_run: false,
        }
    }

    /// Filter files through selector.
    ///
    /// Selectors apply to single files directly, and are handed to the
    /// delegate along with every file set.
    pub fn with_selector(mut self, selector: impl FileSelector + 'static) -> Self {
        self.selectors.push(Arc::new(selector));
        self
    }

    /// Log additions without handing anything to the delegate.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Root prefix of archiver.
    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    /// Unwrap into delegate archiver.
    pub fn into_inner(self) -> A {
        self.delegate
    }

    fn accept_file(&self, path: &Path) -> Result<bool> {
        for selector in &self.selectors {
            let selected = selector
                .is_selected(path)
                .map_err(|err| ArchiverError::Selector {
                    source: err,
                    path: path.to_path_buf(),
                })?;

            if !selected {
                debug!("{:?} rejected by {selector:?}", path.display());
                return Ok(false);
            }
        }

        Ok(true)
    }
}

impl<A> Archiver for PrefixingArchiver<A>
where
    A: Archiver,
{
    fn add_file(&mut self, source: &Path, destination: &str) -> Result<()> {
        if !self.accept_file(source)? {
            return Ok(());
        }

        let destination = format!("{}{destination}", self.root_prefix);
        debug!("adding file {:?} to archive location {destination:?}", source.display());
        if self.dry_run {
            debug!("dry run: skip adding file");
            return Ok(());
        }

        self.delegate.add_file(source, &destination)
    }

    fn add_directory(&mut self, mut file_set: FileSet) -> Result<()> {
        file_set.prefix = format!("{}{}", self.root_prefix, file_set.prefix);
        file_set.selectors.extend(self.selectors.iter().cloned());
        debug!(
            "adding directory {:?} to archive location {:?}",
            file_set.directory.display(),
            file_set.prefix
        );
        if self.dry_run {
            debug!("dry run: skip adding directory");
            return Ok(());
        }

        self.delegate.add_directory(file_set)
    }

    fn add_archived_file_set(&mut self, mut file_set: ArchivedFileSet) -> Result<()> {
        let archive = path::absolute(&file_set.archive).map_err(|err| ArchiverError::Io {
            source: err,
            path: file_set.archive.clone(),
        })?;
        let key = (archive, file_set.prefix.clone());
        if self.seen.contains(&key) {
            warn!("archive {:?} has already been added, skipping", file_set.archive.display());
            return Ok(());
        }

        file_set.prefix = format!("{}{}", self.root_prefix, file_set.prefix);
        file_set.selectors.extend(self.selectors.iter().cloned());
        debug!(
            "adding archived file set {:?} to archive location {:?}",
            file_set.archive.display(),
            file_set.prefix
        );
        if self.dry_run {
            debug!("dry run: skip adding archived file set");
            return Ok(());
        }

        // INVARIANT: Only remember archives the delegate actually accepted.
        self.delegate.add_archived_file_set(file_set)?;
        self.seen.insert(key);

        Ok(())
    }

    fn create_archive(&mut self) -> Result<()> {
        if self.dry_run {
            debug!("dry run: skip creating archive");
            return Ok(());
        }

        self.delegate.create_archive()
    }
}

/// File selector that rejects files matching gitignore-style patterns.
#[derive(Debug)]
pub struct PatternSelector {
    matcher: Gitignore,
}

impl PatternSelector {
    /// Construct new pattern selector.
    ///
    /// Patterns are anchored at `base` like lines of a gitignore file.
    ///
    /// # Errors
    ///
    /// - Return [`ArchiverError::Pattern`] if any pattern is malformed.
    pub fn new(
        base: impl AsRef<Path>,
        patterns: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(base.as_ref());
        for pattern in patterns {
            builder.add_line(None, pattern.as_ref())?;
        }

        Ok(Self {
            matcher: builder.build()?,
        })
    }
}

impl FileSelector for PatternSelector {
    fn is_selected(&self, path: &Path) -> io::Result<bool> {
        let is_dir = path.is_dir();

        // INVARIANT: Parent matching only works for paths under the base.
        let matched = if path.starts_with(self.matcher.path()) {
            self.matcher.matched_path_or_any_parents(path, is_dir)
        } else {
            self.matcher.matched(path, is_dir)
        };

        Ok(!matched.is_ignore())
    }
}

/// Archiving error types.
#[derive(Debug, thiserror::Error)]
pub enum ArchiverError {
    /// Delegate archiver failed.
    #[error("archiver failed: {message}")]
    Delegate {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File selector failed to inspect file.
    #[error("error processing file {:?} through selector", path.display())]
    Selector {
        #[source]
        source: io::Error,
        path: PathBuf,
    },

    /// Selector pattern is malformed.
    #[error(transparent)]
    Pattern(#[from] ignore::Error),

    /// Path of archive cannot be resolved.
    #[error("failed to resolve archive path {:?}", path.display())]
    Io {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ArchiverError> = std::result::Result<T, E>;
