// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Stale source detection.
//!
//! Figure out which source files need to be handed to a processor again by
//! comparing each source against the outputs that a [`SourceMapping`] says it
//! should have produced.
//!
//! # Staleness
//!
//! A source is __stale__ if any of its expected outputs is missing, or if the
//! source was modified more than a configured tolerance after the output was.
//! Timestamps are compared at millisecond granularity. Equal timestamps mean
//! the output is current.
//!
//! # Source Roots
//!
//! Sources are discovered by walking one or more __source roots__. A root that
//! does not exist, is not a directory, or cannot be opened contributes nothing.
//! However, once a walk through a root has begun, any I/O failure aborts the
//! whole scan. A partial result would silently leave sources unprocessed.

use crate::mapping::SourceMapping;

use glob::{MatchOptions, Pattern};
use ignore::{DirEntry, WalkBuilder};
use std::{
    collections::{btree_set, BTreeSet},
    fs::{self, Metadata},
    io::{self, ErrorKind},
    path::{Component, Path, PathBuf},
    time::UNIX_EPOCH,
};
use tracing::{debug, instrument, warn};

/// Directories of version control systems that are never scanned.
const SCM_DIRECTORIES: [&str; 6] = [".git", ".svn", ".hg", ".bzr", "CVS", "_darcs"];

/// Determine stale sources across a set of source roots.
///
/// Sources are recognized through `mapping`, and are stale if their output is
/// missing or older than the source by more than `tolerance_millis`.
///
/// # Errors
///
/// - Return [`ScanError::Walk`] if traversal of a source root fails.
/// - Return [`ScanError::Metadata`] if timestamps cannot be read.
pub fn compute_stale(
    roots: impl IntoIterator<Item = impl AsRef<Path>>,
    mapping: &SourceMapping,
    tolerance_millis: u64,
) -> Result<StaleSet> {
    StalenessScanner::new(mapping.clone(), Inclusion::Stale { tolerance_millis }).scan(roots)
}

/// List every source recognized by mapping across a set of source roots.
///
/// No timestamps are consulted.
///
/// # Errors
///
/// - Return [`ScanError::Walk`] if traversal of a source root fails.
pub fn list_sources(
    roots: impl IntoIterator<Item = impl AsRef<Path>>,
    mapping: &SourceMapping,
) -> Result<StaleSet> {
    StalenessScanner::new(mapping.clone(), Inclusion::All).scan(roots)
}

/// How scanned sources are selected for inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// Include sources whose outputs are missing or out of date.
    Stale { tolerance_millis: u64 },

    /// Include every recognized source.
    All,
}

/// Include and exclude patterns for sources.
///
/// Patterns use glob syntax, and are matched against the path of a source
/// relative to its root with `/` as separator. No include patterns means that
/// everything is included.
#[derive(Debug, Default, Clone)]
pub struct SourceFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl SourceFilter {
    /// Construct new source filter.
    ///
    /// # Errors
    ///
    /// - Return [`ScanError::Pattern`] if any pattern is not valid glob syntax.
    pub fn new(
        includes: impl IntoIterator<Item = impl AsRef<str>>,
        excludes: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self> {
        Ok(Self {
            includes: compile_patterns(includes)?,
            excludes: compile_patterns(excludes)?,
        })
    }

    /// Check if source relative to its root passes the filter.
    pub fn is_included(&self, relative_source: impl AsRef<Path>) -> bool {
        let path = slash_path(relative_source.as_ref());
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|pattern| pattern.matches_with(&path, options));

        included
            && !self
                .excludes
                .iter()
                .any(|pattern| pattern.matches_with(&path, options))
    }
}

/// Scanner of source roots.
///
/// Walks source roots, maps every source that passes the [`SourceFilter`]
/// through a [`SourceMapping`], and selects sources according to its
/// [`Inclusion`] rule.
#[derive(Debug, Clone)]
pub struct StalenessScanner {
    mapping: SourceMapping,
    inclusion: Inclusion,
    filter: SourceFilter,
    skipped_root: Option<PathBuf>,
}

impl StalenessScanner {
    /// Construct new scanner.
    pub fn new(mapping: SourceMapping, inclusion: Inclusion) -> Self {
        Self {
            mapping,
            inclusion,
            filter: SourceFilter::default(),
            skipped_root: None,
        }
    }

    /// Use source filter.
    pub fn with_filter(mut self, filter: SourceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Never scan a given root, e.g., a directory of generated sources that a
    /// processor already knows about.
    ///
    /// Roots are compared by their canonical path, so any spelling of the
    /// same directory is skipped.
    pub fn skip_root(mut self, root: impl AsRef<Path>) -> Self {
        self.skipped_root = fs::canonicalize(root.as_ref()).ok();
        self
    }

    /// Mapping used by scanner.
    pub fn mapping(&self) -> &SourceMapping {
        &self.mapping
    }

    /// Inclusion rule used by scanner.
    pub fn inclusion(&self) -> Inclusion {
        self.inclusion
    }

    /// Scan all source roots.
    ///
    /// Results of each root are unioned into one set. Roots that are missing,
    /// not directories, unreadable, or skipped contribute nothing.
    ///
    /// # Errors
    ///
    /// - Return [`ScanError::Walk`] if traversal of a source root fails.
    /// - Return [`ScanError::Metadata`] if timestamps cannot be read.
    #[instrument(skip(self, roots), level = "debug")]
    pub fn scan(&self, roots: impl IntoIterator<Item = impl AsRef<Path>>) -> Result<StaleSet> {
        let mut sources = StaleSet::default();
        for root in roots {
            let root = root.as_ref();
            let canonical = match fs::canonicalize(root) {
                Ok(canonical) if canonical.is_dir() => canonical,
                _ => {
                    debug!("skip missing source root {:?}", root.display());
                    continue;
                }
            };

            if self.skipped_root.as_ref() == Some(&canonical) {
                debug!("skip source root {:?}", root.display());
                continue;
            }

            sources.extend(self.included_sources(&canonical)?);
        }

        Ok(sources)
    }

    /// Scan one source root.
    ///
    /// Returned paths are rooted at the canonical path of the source root, so
    /// overlapping or aliased roots yield the same paths. A root that cannot be
    /// opened yields nothing.
    ///
    /// # Errors
    ///
    /// - Return [`ScanError::Walk`] if traversal of source root fails.
    /// - Return [`ScanError::Metadata`] if timestamps cannot be read.
    pub fn included_sources(&self, root: impl AsRef<Path>) -> Result<BTreeSet<PathBuf>> {
        let root = fs::canonicalize(root.as_ref()).map_err(|err| ScanError::Walk {
            root: root.as_ref().to_path_buf(),
            source: ignore::Error::from(err),
        })?;

        let mut sources = BTreeSet::new();
        for entry in WalkBuilder::new(&root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| !is_scm_directory(entry))
            .build()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if error_depth(&err) == Some(0) => {
                    warn!("skip unreadable source root {:?}: {err}", root.display());
                    return Ok(BTreeSet::new());
                }
                Err(err) => match dangling_link(&err) {
                    Some(link) => {
                        debug!("skip dangling symlink {:?}", link.display());
                        continue;
                    }
                    None => {
                        return Err(ScanError::Walk {
                            root: root.clone(),
                            source: err,
                        })
                    }
                },
            };

            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }

            let source = entry.path();
            let Ok(relative) = source.strip_prefix(&root) else {
                continue;
            };

            if !self.filter.is_included(relative) {
                continue;
            }

            let targets = self.mapping.target_files(relative);
            if targets.is_empty() {
                continue;
            }

            let include = match self.inclusion {
                Inclusion::All => true,
                Inclusion::Stale { tolerance_millis } => {
                    is_stale(&root, source, &targets, tolerance_millis)?
                }
            };

            if include {
                sources.insert(source.to_path_buf());
            }
        }

        Ok(sources)
    }
}

/// Set of sources selected by a scan.
///
/// Paths are absolute, unique, and iterate in a deterministic order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaleSet(BTreeSet<PathBuf>);

impl StaleSet {
    /// Construct new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount of selected sources.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if source was selected.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.0.contains(path.as_ref())
    }

    /// Iterate through selected sources.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    /// Unwrap into underlying set.
    pub fn into_inner(self) -> BTreeSet<PathBuf> {
        self.0
    }
}

impl Extend<PathBuf> for StaleSet {
    fn extend<T: IntoIterator<Item = PathBuf>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<PathBuf> for StaleSet {
    fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for StaleSet {
    type Item = PathBuf;
    type IntoIter = btree_set::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a StaleSet {
    type Item = &'a PathBuf;
    type IntoIter = btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Check if source is newer than any of its targets beyond tolerance.
fn is_stale(root: &Path, source: &Path, targets: &[PathBuf], tolerance_millis: u64) -> Result<bool> {
    let source_millis = fs::metadata(source)
        .and_then(|metadata| modified_millis(&metadata))
        .map_err(|err| ScanError::Metadata {
            root: root.to_path_buf(),
            path: source.to_path_buf(),
            source: err,
        })?;

    for target in targets {
        let target_millis = match fs::metadata(target) {
            Ok(metadata) => modified_millis(&metadata),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{:?} has no output at {:?}", source.display(), target.display());
                return Ok(true);
            }
            Err(err) => Err(err),
        }
        .map_err(|err| ScanError::Metadata {
            root: root.to_path_buf(),
            path: target.clone(),
            source: err,
        })?;

        // INVARIANT: Equal timestamps are current, and tolerance is inclusive.
        if source_millis > target_millis + u128::from(tolerance_millis) {
            debug!("{:?} is newer than {:?}", source.display(), target.display());
            return Ok(true);
        }
    }

    Ok(false)
}

/// Modification time in milliseconds since the Unix epoch.
///
/// Times before the epoch are clamped to zero.
fn modified_millis(metadata: &Metadata) -> io::Result<u128> {
    Ok(metadata
        .modified()?
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default())
}

/// Depth at which walk error occurred, zero being the root itself.
fn error_depth(err: &ignore::Error) -> Option<usize> {
    match err {
        ignore::Error::WithDepth { depth, .. } => Some(*depth),
        ignore::Error::WithPath { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_depth(err)
        }
        _ => None,
    }
}

/// Path of symlink whose target does not exist, if that is what walk error is.
fn dangling_link(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, err } => {
            let not_found = err
                .io_error()
                .is_some_and(|err| err.kind() == ErrorKind::NotFound);
            let is_link = fs::symlink_metadata(path)
                .is_ok_and(|metadata| metadata.file_type().is_symlink());
            (not_found && is_link).then_some(path.as_path())
        }
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            dangling_link(err)
        }
        _ => None,
    }
}

fn is_scm_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|kind| kind.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SCM_DIRECTORIES.contains(&name))
}

fn compile_patterns(patterns: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Pattern::new(pattern).map_err(|err| ScanError::Pattern {
                pattern: pattern.to_owned(),
                source: err,
            })
        })
        .collect()
}

/// Render relative path with `/` separators for pattern matching.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Source scanning error types.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Traversal of a source root failed part way through.
    #[error("error scanning source root {:?} for stale files", root.display())]
    Walk {
        #[source]
        source: ignore::Error,
        root: PathBuf,
    },

    /// Modification time of a source or output could not be read.
    #[error("error reading timestamp of {:?} in source root {:?}", path.display(), root.display())]
    Metadata {
        #[source]
        source: io::Error,
        root: PathBuf,
        path: PathBuf,
    },

    /// Include or exclude pattern is malformed.
    #[error("invalid source pattern {pattern:?}")]
    Pattern {
        #[source]
        source: glob::PatternError,
        pattern: String,
    },
}

/// Friendly result alias :3
pub type Result<T, E = ScanError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use simple_test_case::test_case;
    use tempfile::TempDir;

    const EPOCH_SECS: i64 = 1_700_000_000;

    fn touch(path: &Path, millis: i64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
        let time = FileTime::from_unix_time(
            EPOCH_SECS + millis.div_euclid(1000),
            (millis.rem_euclid(1000) * 1_000_000) as u32,
        );
        set_file_mtime(path, time).unwrap();
    }

    fn stale_names(set: &StaleSet, root: &Path) -> Vec<String> {
        let root = root.canonicalize().unwrap();
        set.iter()
            .map(|path| slash_path(path.strip_prefix(&root).unwrap()))
            .collect()
    }

    #[test_case(100, Some(90), 0, true; "output older than source")]
    #[test_case(50, Some(60), 0, false; "output newer than source")]
    #[test_case(100, Some(100), 0, false; "equal timestamps are current")]
    #[test_case(100, None, 0, true; "missing output")]
    #[test_case(100, Some(85), 20, false; "within tolerance")]
    #[test_case(100, Some(80), 20, false; "exactly at tolerance")]
    #[test_case(100, Some(70), 20, true; "beyond tolerance")]
    #[test]
    fn stale_source_detection(
        source_millis: i64,
        output_millis: Option<i64>,
        tolerance_millis: u64,
        expect: bool,
    ) {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        touch(&src.join("A.java"), source_millis);
        if let Some(millis) = output_millis {
            touch(&out.join("A.class"), millis);
        }

        let mapping = SourceMapping::suffix(&out, "java", "class");
        let result = compute_stale([&src], &mapping, tolerance_millis).unwrap();

        pretty_assertions::assert_eq!(result.contains(src.join("A.java")), expect);
    }

    #[test]
    fn scan_preserves_directory_structure() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        touch(&src.join("org/acme/A.java"), 100);
        touch(&src.join("org/acme/B.java"), 100);
        touch(&out.join("org/acme/A.class"), 200);
        touch(&out.join("B.class"), 200);

        let mapping = SourceMapping::suffix(&out, "java", "class");
        let result = compute_stale([&src], &mapping, 0).unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["org/acme/B.java"]);
    }

    #[test]
    fn scan_ignores_unrecognized_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        touch(&src.join("A.java"), 100);
        touch(&src.join("notes.txt"), 100);
        touch(&src.join(".java"), 100);

        let mapping = SourceMapping::suffix(&out, "java", "class");
        let result = compute_stale([&src], &mapping, 0).unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["A.java"]);
    }

    #[test]
    fn scan_skips_missing_and_non_directory_roots() {
        let tmp = TempDir::new().unwrap();
        let file_root = tmp.path().join("file.java");
        touch(&file_root, 100);

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = compute_stale(
            [tmp.path().join("nonexistent"), file_root],
            &mapping,
            0,
        )
        .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn scan_unions_roots() {
        let tmp = TempDir::new().unwrap();
        let main = tmp.path().join("main");
        let generated = tmp.path().join("generated");
        let out = tmp.path().join("out");
        touch(&main.join("A.java"), 100);
        touch(&generated.join("B.java"), 100);

        let mapping = SourceMapping::suffix(&out, "java", "class");
        let result = compute_stale([&main, &generated, &main], &mapping, 0).unwrap();

        pretty_assertions::assert_eq!(result.len(), 2);
        assert!(result.contains(main.join("A.java")));
        assert!(result.contains(generated.join("B.java")));
    }

    #[test]
    fn scan_skips_designated_root() {
        let tmp = TempDir::new().unwrap();
        let main = tmp.path().join("main");
        let generated = tmp.path().join("generated");
        touch(&main.join("A.java"), 100);
        touch(&generated.join("B.java"), 100);

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = StalenessScanner::new(mapping, Inclusion::All)
            .skip_root(&generated)
            .scan([&main, &generated])
            .unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &main), vec!["A.java"]);
    }

    #[test]
    fn scan_merges_aliased_roots() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let sub = src.join("sub");
        touch(&sub.join("A.java"), 100);

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = list_sources([src.clone(), sub.clone(), sub.join("../sub")], &mapping).unwrap();

        pretty_assertions::assert_eq!(result.len(), 1);
        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["sub/A.java"]);
    }

    #[test]
    fn skip_root_matches_any_spelling() {
        let tmp = TempDir::new().unwrap();
        let main = tmp.path().join("main");
        let generated = tmp.path().join("target/gen");
        touch(&main.join("A.java"), 100);
        touch(&generated.join("B.java"), 100);

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = StalenessScanner::new(mapping, Inclusion::All)
            .skip_root(tmp.path().join("target/../target/gen"))
            .scan([&main, &generated])
            .unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &main), vec!["A.java"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_dangling_symlinks() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("A.java"), 100);
        symlink(tmp.path().join("gone.java"), src.join("B.java")).unwrap();
        symlink(tmp.path().join("user@host.1234"), src.join(".#A.java")).unwrap();

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = compute_stale([&src], &mapping, 0).unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["A.java"]);
    }

    #[cfg(unix)]
    #[test]
    fn scan_aborts_on_traversal_failure() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("A.java"), 100);
        symlink(&src, src.join("loop")).unwrap();

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = compute_stale([&src], &mapping, 0);

        let expect = src.canonicalize().unwrap();
        assert!(matches!(result, Err(ScanError::Walk { root, .. }) if root == expect));
    }

    #[test]
    fn scan_prunes_scm_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("A.java"), 100);
        touch(&src.join(".git/B.java"), 100);
        touch(&src.join("pkg/CVS/C.java"), 100);

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let result = list_sources([&src], &mapping).unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["A.java"]);
    }

    #[test]
    fn scan_applies_source_filter() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        touch(&src.join("A.java"), 100);
        touch(&src.join("api/B.java"), 100);
        touch(&src.join("api/internal/C.java"), 100);
        touch(&src.join("impl/D.java"), 100);

        let mapping = SourceMapping::suffix(tmp.path().join("out"), "java", "class");
        let filter = SourceFilter::new(["api/**/*.java", "*.java"], ["**/internal/**"]).unwrap();
        let result = StalenessScanner::new(mapping, Inclusion::All)
            .with_filter(filter)
            .scan([&src])
            .unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["A.java", "api/B.java"]);
    }

    #[test]
    fn list_sources_ignores_timestamps() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        touch(&src.join("A.java"), 100);
        touch(&src.join("B.java"), 100);
        touch(&out.join("A.class"), 200);
        touch(&out.join("B.class"), 200);

        let mapping = SourceMapping::suffix(&out, "java", "class");
        assert!(compute_stale([&src], &mapping, 0).unwrap().is_empty());
        pretty_assertions::assert_eq!(list_sources([&src], &mapping).unwrap().len(), 2);
    }

    #[test]
    fn stale_if_any_target_is_stale() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        touch(&src.join("Expr.g4"), 100);
        touch(&out.join("Expr.tokens"), 200);
        touch(&out.join("Expr.java"), 50);

        let mapping = SourceMapping::suffixes(&out, ["g4"], ["tokens", "java"]);
        let result = compute_stale([&src], &mapping, 0).unwrap();

        pretty_assertions::assert_eq!(stale_names(&result, &src), vec!["Expr.g4"]);
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let result = SourceFilter::new(["***/[.java"], Vec::<String>::new());
        assert!(matches!(result, Err(ScanError::Pattern { .. })));
    }

    #[test_case("A.java", "*.java", true; "star matches top level")]
    #[test_case("a/A.java", "*.java", false; "star stays in one directory")]
    #[test_case("a/A.java", "**/*.java", true; "double star crosses directories")]
    #[test_case("A.java", "**/*.java", true; "double star matches no directory")]
    #[test]
    fn source_filter_patterns(path: &str, include: &str, expect: bool) {
        let filter = SourceFilter::new([include], Vec::<String>::new()).unwrap();
        pretty_assertions::assert_eq!(filter.is_included(path), expect);
    }
}
