//! High-level pack and unpack entry points.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::creation::ArchiveWriter;
use crate::creation::PackOptions;
use crate::creation::PackReport;
use crate::creation::SourceSpec;
use crate::creation::validate_sources;
use crate::creation::walker::walk;
use crate::extraction::ArchiveReader;
use crate::extraction::UnpackOptions;
use crate::extraction::UnpackReport;

/// Packs `sources` into a new ZIP archive at `archive`.
///
/// All preconditions are checked before the archive file is created, so a
/// failed check leaves nothing on disk. Missing parent directories of
/// `archive` are created. A failure while writing aborts the operation and
/// leaves the partial archive in place.
///
/// # Errors
///
/// Returns `DestinationIsDirectory`, `SourceNotFound` or `SelfInclusion`
/// from the precondition checks, `InvalidEntryName` for a name the
/// configured charset cannot represent, and `Io` for any failure while
/// writing.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::PackOptions;
/// use ziptree_core::creation::SourceSpec;
/// use ziptree_core::pack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = pack("out.zip", &[SourceSpec::new("src")], &PackOptions::default())?;
/// println!("Added {} files", report.files_added);
/// # Ok(())
/// # }
/// ```
pub fn pack<P: AsRef<Path>>(
    archive: P,
    sources: &[SourceSpec],
    options: &PackOptions,
) -> Result<PackReport> {
    let archive = archive.as_ref();
    validate_sources(archive, sources, options.comparator)?;

    let mut writer = create_writer(archive, options)?;
    let walk_options = options.walk_options();
    writer.add_walk_entries(walk(sources, &walk_options))?;
    let report = writer.close()?;

    tracing::info!(
        archive = %archive.display(),
        files = report.files_added,
        directories = report.directories_added,
        bytes = report.bytes_written,
        "pack complete"
    );
    Ok(report)
}

/// Packs named in-memory or streamed entries into a new ZIP archive.
///
/// Entries are written in iteration order. Names are normalized the same way
/// as walked names.
///
/// # Errors
///
/// Returns `DestinationIsDirectory` if `archive` is a directory,
/// `InvalidEntryName` for unusable names or names outside the charset, and `Io` for write failures.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::PackOptions;
/// use ziptree_core::pack_streams;
///
/// let entries = vec![("hello.txt", "hello".as_bytes())];
/// pack_streams("out.zip", entries, &PackOptions::default())?;
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub fn pack_streams<P, I, S, R>(archive: P, entries: I, options: &PackOptions) -> Result<PackReport>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (S, R)>,
    S: AsRef<str>,
    R: Read,
{
    let archive = archive.as_ref();
    validate_sources(archive, &[], options.comparator)?;

    let mut writer = create_writer(archive, options)?;
    for (name, mut reader) in entries {
        writer.add_file_entry(name.as_ref(), &mut reader)?;
    }
    let report = writer.close()?;

    tracing::info!(
        archive = %archive.display(),
        files = report.files_added,
        bytes = report.bytes_written,
        "pack complete"
    );
    Ok(report)
}

/// Extracts `archive` under `dest` and returns `dest`.
///
/// # Errors
///
/// Returns `NotAnArchive` for invalid containers, `PathTraversal` if any
/// entry resolves outside `dest`, and `Io` for filesystem failures.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::UnpackOptions;
/// use ziptree_core::unpack;
///
/// let dest = unpack("out.zip", "dst", UnpackOptions::default())?;
/// println!("extracted into {}", dest.display());
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub fn unpack<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    dest: Q,
    options: UnpackOptions,
) -> Result<PathBuf> {
    unpack_with_report(archive, dest, options).map(|report| report.destination)
}

/// Same as [`unpack`], returning extraction statistics.
///
/// # Errors
///
/// See [`unpack`].
pub fn unpack_with_report<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    dest: Q,
    options: UnpackOptions,
) -> Result<UnpackReport> {
    let archive = archive.as_ref();
    let mut reader = ArchiveReader::open(archive, options)?;
    reader.extract(dest.as_ref())?;
    let report = reader.report().clone();

    tracing::info!(
        archive = %archive.display(),
        dest = %report.destination.display(),
        files = report.files_extracted,
        directories = report.directories_created,
        bytes = report.bytes_written,
        "unpack complete"
    );
    Ok(report)
}

fn create_writer(archive: &Path, options: &PackOptions) -> Result<ArchiveWriter<BufWriter<File>>> {
    if let Some(parent) = archive.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(archive)?;
    Ok(ArchiveWriter::new(BufWriter::new(file)).with_charset(options.charset))
}
