//! Unpack operation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Statistics collected while extracting an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackReport {
    /// Root the archive was extracted into.
    pub destination: PathBuf,

    /// Number of file entries materialized.
    pub files_extracted: usize,

    /// Number of directory entries materialized.
    pub directories_created: usize,

    /// Bytes written to disk.
    pub bytes_written: u64,

    /// Wall-clock time spent extracting.
    pub duration: Duration,
}

impl UnpackReport {
    /// Creates an empty report for `destination`.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            ..Self::default()
        }
    }

    /// Returns the number of entries materialized.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}
