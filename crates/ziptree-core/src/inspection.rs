//! Read-only access to archive contents.

use crate::Result;
use crate::charset::Charset;
use crate::extraction::ArchiveReader;
use crate::extraction::UnpackOptions;
use std::path::Path;

/// Lists entry names in the order they are stored.
///
/// Directory entries keep their trailing `/`.
///
/// # Errors
///
/// Returns `Io` if the archive cannot be opened and `NotAnArchive` if it is
/// not a valid ZIP container.
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::Charset;
/// use ziptree_core::list_entries;
///
/// for name in list_entries("out.zip", Charset::Utf8)? {
///     println!("{name}");
/// }
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub fn list_entries<P: AsRef<Path>>(archive: P, charset: Charset) -> Result<Vec<String>> {
    let options = UnpackOptions::default().with_charset(charset);
    ArchiveReader::open(archive.as_ref(), options)?.entry_names()
}

/// Reads the full content of one entry without extracting anything.
///
/// # Errors
///
/// Returns `EntryNotFound` if `name` is not in the archive, plus the errors
/// of [`list_entries`].
///
/// # Examples
///
/// ```no_run
/// use ziptree_core::Charset;
/// use ziptree_core::read_entry;
///
/// let bytes = read_entry("out.zip", "sub/b.txt", Charset::Utf8)?;
/// println!("{}", String::from_utf8_lossy(&bytes));
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub fn read_entry<P: AsRef<Path>>(archive: P, name: &str, charset: Charset) -> Result<Vec<u8>> {
    let options = UnpackOptions::default().with_charset(charset);
    ArchiveReader::open(archive.as_ref(), options)?.read_entry(name)
}
