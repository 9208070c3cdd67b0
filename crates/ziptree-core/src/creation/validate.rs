//! Pre-flight checks run before an archive file is opened.

use crate::ArchiveError;
use crate::Result;
use crate::creation::walker::SourceSpec;
use crate::path::PathComparator;
use crate::security::canonicalize_lenient;
use std::path::Path;

/// Checks that `archive` can be written from `sources`.
///
/// Runs before any output is created, so a failed check leaves nothing on
/// disk.
///
/// # Errors
///
/// - `DestinationIsDirectory` if `archive` is an existing directory.
/// - `SourceNotFound` if a source does not exist.
/// - `SelfInclusion` if the archive would land inside a directory source.
/// - `Io` if a path cannot be canonicalized.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::creation::SourceSpec;
/// use ziptree_core::creation::validate_sources;
/// use ziptree_core::path::PathComparator;
/// use std::path::Path;
///
/// let sources = [SourceSpec::new("project")];
/// let err = validate_sources(Path::new("project/out.zip"), &sources, PathComparator::host());
/// assert!(err.is_err());
/// ```
pub fn validate_sources(archive: &Path, sources: &[SourceSpec], cmp: PathComparator) -> Result<()> {
    if archive.is_dir() {
        return Err(ArchiveError::DestinationIsDirectory {
            path: archive.to_path_buf(),
        });
    }

    let archive_parent = match archive.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let canonical_parent = canonicalize_lenient(archive_parent)?;

    for source in sources {
        let root = &source.root;
        if !root.exists() {
            return Err(ArchiveError::SourceNotFound { path: root.clone() });
        }
        if !root.is_dir() {
            continue;
        }

        let canonical_source = root.canonicalize()?;
        if cmp.is_within(&canonical_source, &canonical_parent) {
            return Err(ArchiveError::SelfInclusion {
                archive: archive.to_path_buf(),
                source_dir: root.clone(),
            });
        }
    }

    tracing::trace!(archive = %archive.display(), sources = sources.len(), "sources validated");
    Ok(())
}
