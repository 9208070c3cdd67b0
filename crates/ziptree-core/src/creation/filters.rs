//! Ready-made path filters for pack operations.
//!
//! Every builder returns a [`PathFilter`] that can be set on a
//! [`SourceSpec`](super::SourceSpec) or on [`PackOptions`](super::PackOptions).

use crate::creation::walker::PathFilter;
use std::path::Path;
use std::sync::Arc;

/// Configuration for [`exclusion_filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Include hidden files (names starting with `.`).
    pub include_hidden: bool,

    /// Glob-style patterns to exclude.
    pub exclude_patterns: Vec<String>,
}

impl FilterConfig {
    /// Creates a configuration that keeps hidden files and excludes nothing.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            include_hidden: true,
            exclude_patterns: Vec::new(),
        }
    }

    /// Sets whether hidden files are kept.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Returns `true` if `path` should be dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use ziptree_core::creation::filters::FilterConfig;
    ///
    /// let config = FilterConfig::default();
    /// assert!(config.should_skip(Path::new(".gitignore")));
    /// assert!(!config.should_skip(Path::new("main.rs")));
    /// ```
    #[must_use]
    pub fn should_skip(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return true;
        }
        self.exclude_patterns
            .iter()
            .any(|pattern| matches_pattern(path, pattern))
    }
}

/// Builds a filter from a [`FilterConfig`].
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::creation::filters::FilterConfig;
/// use ziptree_core::creation::filters::exclusion_filter;
///
/// let filter = exclusion_filter(
///     FilterConfig::permissive().with_exclude_patterns(vec!["*.log".to_string()]),
/// );
/// assert!(filter(Path::new("keep.txt")));
/// assert!(!filter(Path::new("debug.log")));
/// ```
#[must_use]
pub fn exclusion_filter(config: FilterConfig) -> PathFilter {
    Arc::new(move |path| !config.should_skip(path))
}

/// Checks if the final component of a path starts with `.`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::creation::filters::is_hidden;
///
/// assert!(is_hidden(Path::new("dir/.hidden")));
/// assert!(!is_hidden(Path::new("dir/normal.rs")));
/// ```
#[must_use]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Matches the final path component against a glob-style pattern.
///
/// Supports exact names (`.git`), suffix wildcards (`*.tmp`) and prefix
/// wildcards (`temp*`). Only the file name is matched, so a pattern never
/// trips over a component of the directory a source lives in; excluded
/// directories prune everything below them during the walk.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziptree_core::creation::filters::matches_pattern;
///
/// assert!(matches_pattern(Path::new("dir/.git"), ".git"));
/// assert!(matches_pattern(Path::new("dir/test.tmp"), "*.tmp"));
/// assert!(matches_pattern(Path::new("temp_file"), "temp*"));
/// assert!(!matches_pattern(Path::new("file_temp"), "temp*"));
/// ```
#[must_use]
pub fn matches_pattern(path: &Path, pattern: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| pattern_matches(name, pattern))
}

fn pattern_matches(s: &str, pattern: &str) -> bool {
    if pattern == s {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }
    false
}
