//! Error types for pack and unpack operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while packing or unpacking an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A source handed to a pack operation does not exist.
    #[error("source not found: {path}")]
    SourceNotFound {
        /// The missing source path.
        path: PathBuf,
    },

    /// The archive output path is an existing directory.
    #[error("archive destination is a directory: {path}")]
    DestinationIsDirectory {
        /// The archive output path.
        path: PathBuf,
    },

    /// The archive would be written inside a directory being packed.
    #[error("archive {archive} is located inside source directory {source_dir}")]
    SelfInclusion {
        /// The archive output path.
        archive: PathBuf,
        /// The source directory that contains it.
        source_dir: PathBuf,
    },

    /// An archive entry resolves outside the extraction root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name.
        path: PathBuf,
    },

    /// The input is not a readable ZIP container.
    #[error("not a ZIP archive: {reason}")]
    NotAnArchive {
        /// Why the container was rejected.
        reason: String,
    },

    /// The requested entry does not exist in the archive.
    #[error("entry not found in archive: {name}")]
    EntryNotFound {
        /// Requested entry name.
        name: String,
    },

    /// An entry name cannot be represented in the archive.
    #[error("invalid entry name: {name}")]
    InvalidEntryName {
        /// Lossy rendering of the offending name.
        name: String,
    },
}

impl ArchiveError {
    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use ziptree_core::ArchiveError;
    ///
    /// let err = ArchiveError::PathTraversal {
    ///     path: PathBuf::from("../../evil.txt"),
    /// };
    /// assert!(err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. } | Self::SelfInclusion { .. })
    }

    /// Returns `true` if the error was raised by a precondition check that
    /// runs before any byte is written.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SourceNotFound { .. }
                | Self::DestinationIsDirectory { .. }
                | Self::SelfInclusion { .. }
        )
    }

    /// Converts a `zip` crate error.
    ///
    /// Underlying I/O faults stay `Io`; anything else means the container
    /// itself is malformed.
    pub(crate) fn from_zip(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            zip::result::ZipError::FileNotFound => Self::NotAnArchive {
                reason: "entry index out of range".to_string(),
            },
            other => Self::NotAnArchive {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::SourceNotFound {
            path: PathBuf::from("/missing"),
        };
        assert_eq!(err.to_string(), "source not found: /missing");
    }

    #[test]
    fn test_path_traversal_error() {
        let err = ArchiveError::PathTraversal {
            path: PathBuf::from("../etc/passwd"),
        };
        assert!(err.to_string().contains("path traversal"));
        assert!(err.to_string().contains("../etc/passwd"));
        assert!(err.is_security_violation());
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_self_inclusion_error() {
        let err = ArchiveError::SelfInclusion {
            archive: PathBuf::from("/data/src/out.zip"),
            source_dir: PathBuf::from("/data/src"),
        };
        let display = err.to_string();
        assert!(display.contains("/data/src/out.zip"));
        assert!(err.is_security_violation());
        assert!(err.is_precondition());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ArchiveError = io_err.into();
        assert!(matches!(err, ArchiveError::Io(_)));
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_from_zip_keeps_io() {
        let io_err = std::io::Error::other("disk gone");
        let err = ArchiveError::from_zip(zip::result::ZipError::Io(io_err));
        assert!(matches!(err, ArchiveError::Io(_)));
    }

    #[test]
    fn test_preconditions() {
        assert!(
            ArchiveError::DestinationIsDirectory {
                path: PathBuf::from("out")
            }
            .is_precondition()
        );
        assert!(
            !ArchiveError::NotAnArchive {
                reason: "bad".into()
            }
            .is_precondition()
        );
    }
}
