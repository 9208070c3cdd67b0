//! Configuration for unpack operations.

use crate::charset::Charset;
use crate::path::PathComparator;

/// Options for [`unpack`](crate::unpack) and [`ArchiveReader`](super::ArchiveReader).
///
/// # Examples
///
/// ```
/// use ziptree_core::Charset;
/// use ziptree_core::UnpackOptions;
///
/// let options = UnpackOptions::default().with_charset(Charset::Cp437);
/// assert_eq!(options.charset, Charset::Cp437);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackOptions {
    /// Charset used to decode entry names that carry no UTF-8 flag.
    ///
    /// Default: [`Charset::Utf8`].
    pub charset: Charset,

    /// Comparator used by the containment check.
    ///
    /// Default: [`PathComparator::host`].
    pub comparator: PathComparator,
}

impl UnpackOptions {
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

    /// Sets the path comparator.
    #[must_use]
    pub fn with_comparator(mut self, comparator: PathComparator) -> Self {
        self.comparator = comparator;
        self
    }
}
