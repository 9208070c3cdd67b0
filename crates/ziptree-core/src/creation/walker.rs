//! Depth-first source tree walking with filtering.
//!
//! Traversal is driven by `walkdir`, whose explicit directory stack keeps deep
//! trees off the call stack. The walker emits files plus explicit markers for
//! directories that end up with no children after filtering; non-empty
//! directories are implied by the names of their descendants.

use crate::ArchiveError;
use crate::Result;
use crate::path::PathComparator;
use crate::path::relative_path;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

/// Shared path predicate; returning `false` skips the path and, for
/// directories, everything below it.
pub type PathFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// One input to a pack operation.
///
/// # Examples
///
/// ```
/// use ziptree_core::creation::SourceSpec;
///
/// let spec = SourceSpec::new("project")
///     .with_include_root_dir(true)
///     .with_filter(|path| path.extension().is_none_or(|ext| ext != "tmp"));
/// assert!(spec.include_root_dir);
/// ```
#[derive(Clone)]
pub struct SourceSpec {
    /// File or directory to pack.
    pub root: PathBuf,

    /// Keep the top-level directory name as the first segment of entry
    /// names. Ignored for single files, whose name is always kept.
    pub include_root_dir: bool,

    /// Per-source filter.
    pub filter: Option<PathFilter>,
}

impl SourceSpec {
    /// Creates a source that packs the contents of `root` without its own name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_root_dir: false,
            filter: None,
        }
    }

    /// Sets whether the root directory name is kept.
    #[must_use]
    pub fn with_include_root_dir(mut self, include: bool) -> Self {
        self.include_root_dir = include;
        self
    }

    /// Sets the per-source filter.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        self.filter.as_ref().is_none_or(|f| f(path))
    }
}

impl fmt::Debug for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSpec")
            .field("root", &self.root)
            .field("include_root_dir", &self.include_root_dir)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .finish()
    }
}

impl From<PathBuf> for SourceSpec {
    fn from(root: PathBuf) -> Self {
        Self::new(root)
    }
}

impl From<&Path> for SourceSpec {
    fn from(root: &Path) -> Self {
        Self::new(root)
    }
}

/// A file or empty directory ready to be written to an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Absolute filesystem path.
    pub path: PathBuf,

    /// `/`-separated entry name relative to the walk root, without a
    /// trailing separator.
    pub name: String,

    /// `true` for an empty-directory marker.
    pub is_dir: bool,
}

/// Options shared by every source of one walk.
#[derive(Clone, Default)]
pub struct WalkOptions {
    /// Filter applied in addition to each source's own filter.
    pub filter: Option<PathFilter>,

    /// Follow symbolic links instead of skipping them.
    pub follow_symlinks: bool,

    /// Comparator used when computing relative names.
    pub comparator: PathComparator,
}

impl fmt::Debug for WalkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkOptions")
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("follow_symlinks", &self.follow_symlinks)
            .field("comparator", &self.comparator)
            .finish()
    }
}

/// Walks every source in order and yields entries lazily.
///
/// The returned iterator makes a single forward pass and is not restartable.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::creation::SourceSpec;
/// use ziptree_core::creation::walker::WalkOptions;
/// use ziptree_core::creation::walker::walk;
///
/// let sources = [SourceSpec::new("./project")];
/// for entry in walk(&sources, &WalkOptions::default()) {
///     let entry = entry?;
///     println!("{} (dir: {})", entry.name, entry.is_dir);
/// }
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub fn walk<'a>(
    sources: &'a [SourceSpec],
    options: &'a WalkOptions,
) -> impl Iterator<Item = Result<WalkEntry>> + 'a {
    sources
        .iter()
        .flat_map(move |source| SourceWalker::new(source, options))
}

type EntryPredicate<'a> = Box<dyn FnMut(&walkdir::DirEntry) -> bool + 'a>;

/// Entry walker for a single source.
///
/// Pre-order traversal with one entry of lookahead: a directory is held as
/// pending and emitted as an empty-directory marker only if the next entry
/// is not one of its children.
pub struct SourceWalker<'a> {
    options: &'a WalkOptions,
    walk_root: PathBuf,
    inner: Option<walkdir::FilterEntry<walkdir::IntoIter, EntryPredicate<'a>>>,
    pending_dir: Option<(usize, PathBuf)>,
    queued: Option<Result<WalkEntry>>,
    failed: Option<ArchiveError>,
}

impl<'a> SourceWalker<'a> {
    /// Prepares a walk of `source`. Errors resolving the root are reported
    /// by the first call to `next`.
    pub fn new(source: &'a SourceSpec, options: &'a WalkOptions) -> Self {
        let mut walker = Self {
            options,
            walk_root: PathBuf::new(),
            inner: None,
            pending_dir: None,
            queued: None,
            failed: None,
        };

        match source.root.canonicalize() {
            Ok(root) => {
                walker.walk_root = if root.is_file() || source.include_root_dir {
                    root.parent().map_or_else(|| root.clone(), Path::to_path_buf)
                } else {
                    root.clone()
                };

                let filter: EntryPredicate<'a> = Box::new(move |entry| {
                    // the source root itself is never filtered out
                    if entry.depth() == 0 {
                        return true;
                    }
                    let path = entry.path();
                    if !options.follow_symlinks && entry.path_is_symlink() {
                        tracing::warn!(path = %path.display(), "skipping symlink");
                        return false;
                    }
                    source.accepts(path) && options.filter.as_ref().is_none_or(|f| f(path))
                });

                walker.inner = Some(
                    WalkDir::new(root)
                        .follow_links(options.follow_symlinks)
                        .sort_by_file_name()
                        .into_iter()
                        .filter_entry(filter),
                );
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                walker.failed = Some(ArchiveError::SourceNotFound {
                    path: source.root.clone(),
                });
            }
            Err(e) => walker.failed = Some(ArchiveError::Io(e)),
        }

        walker
    }

    /// Returns the directory entry names are computed against.
    #[must_use]
    pub fn walk_root(&self) -> &Path {
        &self.walk_root
    }

    fn entry_for(&self, path: PathBuf, is_dir: bool) -> Option<Result<WalkEntry>> {
        match relative_path(&path, &self.walk_root, self.options.comparator) {
            Some(name) if name.is_empty() => None,
            Some(name) => Some(Ok(WalkEntry { path, name, is_dir })),
            None => Some(Err(ArchiveError::InvalidEntryName {
                name: path.to_string_lossy().into_owned(),
            })),
        }
    }

    /// Emits the pending directory if `depth` shows it had no children.
    fn flush_pending(&mut self, depth: Option<usize>) -> Option<Result<WalkEntry>> {
        let pending_depth = self.pending_dir.as_ref()?.0;
        if depth.is_some_and(|d| d > pending_depth) {
            self.pending_dir = None;
            return None;
        }
        let (_, path) = self.pending_dir.take()?;
        tracing::trace!(path = %path.display(), "empty directory");
        self.entry_for(path, true)
    }
}

impl Iterator for SourceWalker<'_> {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.failed.take() {
            self.inner = None;
            return Some(Err(err));
        }
        if let Some(queued) = self.queued.take() {
            return Some(queued);
        }

        loop {
            let Some(inner) = self.inner.as_mut() else {
                return self.flush_pending(None);
            };

            let Some(next) = inner.next() else {
                self.inner = None;
                return self.flush_pending(None);
            };

            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    self.inner = None;
                    self.pending_dir = None;
                    return Some(Err(ArchiveError::Io(std::io::Error::other(format!(
                        "walkdir error: {e}"
                    )))));
                }
            };

            let depth = entry.depth();
            let flushed = self.flush_pending(Some(depth));

            let produced = if entry.file_type().is_dir() {
                self.pending_dir = Some((depth, entry.into_path()));
                None
            } else {
                self.entry_for(entry.into_path(), false)
            };

            match (flushed, produced) {
                (Some(first), Some(second)) => {
                    self.queued = Some(second);
                    return Some(first);
                }
                (Some(item), None) | (None, Some(item)) => return Some(item),
                (None, None) => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(sources: &[SourceSpec], options: &WalkOptions) -> Vec<(String, bool)> {
        walk(sources, options)
            .map(|entry| {
                let entry = entry.unwrap();
                (entry.name, entry.is_dir)
            })
            .collect()
    }

    fn sample_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "hi").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub/b.txt"), "yo").unwrap();
        fs::create_dir(root.join("emptyDir")).unwrap();
        temp
    }

    #[test]
    fn test_walk_excludes_root_name_by_default() {
        let temp = sample_tree();
        let sources = [SourceSpec::new(temp.path())];
        let entries = names(&sources, &WalkOptions::default());

        assert_eq!(
            entries,
            vec![
                ("a.txt".to_string(), false),
                ("emptyDir".to_string(), true),
                ("sub/b.txt".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_walk_includes_root_name_when_requested() {
        let temp = sample_tree();
        let root_name = temp
            .path()
            .canonicalize()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        let sources = [SourceSpec::new(temp.path()).with_include_root_dir(true)];
        let entries = names(&sources, &WalkOptions::default());

        assert!(entries.contains(&(format!("{root_name}/a.txt"), false)));
        assert!(entries.contains(&(format!("{root_name}/sub/b.txt"), false)));
        assert!(entries.contains(&(format!("{root_name}/emptyDir"), true)));
    }

    #[test]
    fn test_walk_single_file_uses_file_name() {
        let temp = sample_tree();
        let sources = [SourceSpec::new(temp.path().join("sub/b.txt"))];
        let entries = names(&sources, &WalkOptions::default());
        assert_eq!(entries, vec![("b.txt".to_string(), false)]);
    }

    #[test]
    fn test_walk_nonempty_directories_are_implied() {
        let temp = sample_tree();
        let sources = [SourceSpec::new(temp.path())];
        let entries = names(&sources, &WalkOptions::default());
        assert!(!entries.iter().any(|(name, _)| name == "sub"));
    }

    #[test]
    fn test_walk_filtered_children_make_directory_empty() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("logs")).unwrap();
        fs::write(root.join("logs/app.log"), "noise").unwrap();

        let sources = [SourceSpec::new(root)
            .with_filter(|path| path.extension().is_none_or(|ext| ext != "log"))];
        let entries = names(&sources, &WalkOptions::default());
        assert_eq!(entries, vec![("logs".to_string(), true)]);
    }

    #[test]
    fn test_walk_filter_prunes_directories() {
        let temp = sample_tree();
        let sources = [SourceSpec::new(temp.path())
            .with_filter(|path| path.file_name().is_none_or(|n| n != "sub"))];
        let entries = names(&sources, &WalkOptions::default());
        assert!(!entries.iter().any(|(name, _)| name.starts_with("sub")));
        assert!(entries.contains(&("a.txt".to_string(), false)));
    }

    #[test]
    fn test_walk_global_filter_applies_to_all_sources() {
        let temp = sample_tree();
        let options = WalkOptions {
            filter: Some(Arc::new(|path: &Path| {
                path.file_name().is_none_or(|n| n != "a.txt")
            })),
            ..WalkOptions::default()
        };
        let sources = [SourceSpec::new(temp.path())];
        let entries = names(&sources, &options);
        assert!(!entries.iter().any(|(name, _)| name == "a.txt"));
        assert!(entries.contains(&("sub/b.txt".to_string(), false)));
    }

    #[test]
    fn test_walk_empty_root_without_name_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let sources = [SourceSpec::new(temp.path())];
        assert!(names(&sources, &WalkOptions::default()).is_empty());
    }

    #[test]
    fn test_walk_empty_root_with_name_yields_marker() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("blank")).unwrap();
        let sources = [SourceSpec::new(temp.path().join("blank")).with_include_root_dir(true)];
        assert_eq!(
            names(&sources, &WalkOptions::default()),
            vec![("blank".to_string(), true)]
        );
    }

    #[test]
    fn test_walk_nested_empty_directories() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("a/d")).unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();

        let sources = [SourceSpec::new(root)];
        let entries = names(&sources, &WalkOptions::default());
        assert_eq!(
            entries,
            vec![
                ("a/b/c".to_string(), true),
                ("a/d".to_string(), true),
                ("z.txt".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_walk_missing_source() {
        let sources = [SourceSpec::new("/nonexistent/path/that/does/not/exist")];
        let results: Vec<_> = walk(&sources, &WalkOptions::default()).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ArchiveError::SourceNotFound { .. })));
    }

    #[test]
    fn test_walk_multiple_sources_in_order() {
        let first = sample_tree();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("only.txt"), "x").unwrap();

        let sources = [SourceSpec::new(first.path()), SourceSpec::new(second.path())];
        let entries = names(&sources, &WalkOptions::default());
        assert_eq!(entries.last(), Some(&("only.txt".to_string(), false)));
        assert_eq!(entries.len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_symlinks_by_default() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let sources = [SourceSpec::new(root)];
        let entries = names(&sources, &WalkOptions::default());
        assert_eq!(entries, vec![("target.txt".to_string(), false)]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_follows_symlinks_when_configured() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("target.txt"), "content").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let options = WalkOptions {
            follow_symlinks: true,
            ..WalkOptions::default()
        };
        let sources = [SourceSpec::new(root)];
        let entries = names(&sources, &options);
        assert!(entries.contains(&("link.txt".to_string(), false)));
        assert!(entries.contains(&("target.txt".to_string(), false)));
    }

    #[test]
    fn test_walk_deep_tree() {
        let temp = TempDir::new().unwrap();
        let mut deep = temp.path().to_path_buf();
        for i in 0..64 {
            deep.push(format!("d{i}"));
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("leaf.txt"), "leaf").unwrap();

        let sources = [SourceSpec::new(temp.path())];
        let entries = names(&sources, &WalkOptions::default());
        assert_eq!(entries.len(), 1);
        assert!(entries[0].0.ends_with("d63/leaf.txt"));
    }
}
