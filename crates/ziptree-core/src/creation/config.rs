//! Configuration for pack operations.

use crate::charset::Charset;
use crate::creation::walker::PathFilter;
use crate::creation::walker::WalkOptions;
use crate::extraction::UnpackOptions;
use crate::path::PathComparator;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Options for [`pack`](crate::pack) and [`pack_streams`](crate::pack_streams).
///
/// # Examples
///
/// ```
/// use ziptree_core::PackOptions;
///
/// let options = PackOptions::default()
///     .with_follow_symlinks(true)
///     .with_filter(|path| path.extension().is_none_or(|ext| ext != "tmp"));
/// assert!(options.follow_symlinks);
/// ```
#[derive(Clone, Default)]
pub struct PackOptions {
    /// Charset entry names must be representable in.
    ///
    /// A name outside it fails the pack with `InvalidEntryName`. Use
    /// [`unpack_options`](Self::unpack_options) to read the archive back with
    /// the same charset.
    ///
    /// Default: [`Charset::Utf8`].
    pub charset: Charset,

    /// Filter applied to every source in addition to its own filter.
    ///
    /// Default: `None` (keep everything).
    pub filter: Option<PathFilter>,

    /// Follow symlinks instead of skipping them.
    ///
    /// Default: `false`.
    pub follow_symlinks: bool,

    /// Comparator used for relative names and the self-inclusion check.
    ///
    /// Default: [`PathComparator::host`].
    pub comparator: PathComparator,
}

impl PackOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entry-name charset.
    #[must_use]
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Sets the global filter.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Sets the global filter from an already shared predicate.
    #[must_use]
    pub fn with_path_filter(mut self, filter: PathFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets whether symlinks are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Sets the path comparator.
    #[must_use]
    pub fn with_comparator(mut self, comparator: PathComparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Returns unpack options with the same charset and comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use ziptree_core::Charset;
    /// use ziptree_core::PackOptions;
    ///
    /// let pack = PackOptions::default().with_charset(Charset::Cp437);
    /// assert_eq!(pack.unpack_options().charset, Charset::Cp437);
    /// ```
    #[must_use]
    pub fn unpack_options(&self) -> UnpackOptions {
        UnpackOptions::new()
            .with_charset(self.charset)
            .with_comparator(self.comparator)
    }

    pub(crate) fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            filter: self.filter.clone(),
            follow_symlinks: self.follow_symlinks,
            comparator: self.comparator,
        }
    }
}

impl fmt::Debug for PackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackOptions")
            .field("charset", &self.charset)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("follow_symlinks", &self.follow_symlinks)
            .field("comparator", &self.comparator)
            .finish()
    }
}
