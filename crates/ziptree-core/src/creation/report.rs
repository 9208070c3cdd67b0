//! Pack operation reporting.

use std::time::Duration;

/// Statistics collected while writing an archive.
///
/// # Examples
///
/// ```
/// use ziptree_core::PackReport;
///
/// let mut report = PackReport::default();
/// report.files_added = 10;
/// report.directories_added = 2;
/// assert_eq!(report.total_entries(), 12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Number of file entries written.
    pub files_added: usize,

    /// Number of empty-directory entries written.
    pub directories_added: usize,

    /// Uncompressed bytes copied into the archive.
    pub bytes_written: u64,

    /// Wall-clock time spent writing.
    pub duration: Duration,
}

impl PackReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries written.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_added + self.directories_added
    }
}
