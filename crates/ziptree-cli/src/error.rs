//! Error conversion utilities for CLI.
//!
//! Converts ziptree-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use ziptree_core::ArchiveError;

/// Converts `ArchiveError` to a user-friendly anyhow error with context.
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive '{}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                path.display()
            )
        }
        ArchiveError::SelfInclusion {
            archive: output,
            source_dir,
        } => {
            anyhow!(
                "Refusing to write '{}' inside source directory '{}'\n\
                 HINT: Choose an output path outside every directory being packed.",
                output.display(),
                source_dir.display()
            )
        }
        ArchiveError::DestinationIsDirectory { path } => {
            anyhow!(
                "Output path '{}' is a directory\n\
                 HINT: Pass a file name, for example '{}'.",
                path.display(),
                path.join("archive.zip").display()
            )
        }
        ArchiveError::SourceNotFound { path } => {
            anyhow!("Source not found: {}", path.display())
        }
        ArchiveError::NotAnArchive { reason } => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The file may be corrupted or not a ZIP archive.",
                archive.display(),
                reason
            )
        }
        ArchiveError::EntryNotFound { name } => {
            anyhow!(
                "Entry '{}' not found in '{}'\n\
                 HINT: Use 'ziptree list' to see the stored entry names.",
                name,
                archive.display()
            )
        }
        ArchiveError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        ArchiveError::InvalidEntryName { .. } => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds archive context to a library result.
pub fn add_archive_context<T>(
    result: Result<T, ArchiveError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_archive_error(e, archive))
}
