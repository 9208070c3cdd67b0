//! Streaming ZIP reader with containment-checked extraction.

use crate::ArchiveError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_and_flush;
use crate::extraction::config::UnpackOptions;
use crate::extraction::report::UnpackReport;
use crate::security::check_containment;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use zip::ZipArchive;

/// Reads entries from one ZIP container.
///
/// The reader is `Open` after construction and becomes `Closed` once
/// [`extract`](Self::extract) or [`close`](Self::close) runs. Entries are
/// always visited in the order they are stored.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ziptree_core::UnpackOptions;
/// use ziptree_core::extraction::ArchiveReader;
///
/// let mut reader = ArchiveReader::open(Path::new("out.zip"), UnpackOptions::default())?;
/// let dest = reader.extract(Path::new("dst"))?;
/// println!("extracted into {}", dest.display());
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub struct ArchiveReader<R: Read + Seek> {
    archive: Option<ZipArchive<R>>,
    options: UnpackOptions,
    buffer: CopyBuffer,
    report: UnpackReport,
}

impl ArchiveReader<File> {
    /// Opens the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened and `NotAnArchive` if it is
    /// not a ZIP container.
    pub fn open(path: &Path, options: UnpackOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(file, options)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Reads the central directory of `inner`.
    ///
    /// # Errors
    ///
    /// Returns `NotAnArchive` if the ZIP structure is invalid.
    pub fn new(inner: R, options: UnpackOptions) -> Result<Self> {
        let archive = ZipArchive::new(inner).map_err(ArchiveError::from_zip)?;
        Ok(Self {
            archive: Some(archive),
            options,
            buffer: CopyBuffer::new(),
            report: UnpackReport::default(),
        })
    }

    /// Returns the number of entries, or 0 once closed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.as_ref().map_or(0, ZipArchive::len)
    }

    /// Returns `true` if the archive holds no entries or is closed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the reader has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.archive.is_none()
    }

    /// Statistics of the last extraction.
    #[must_use]
    pub fn report(&self) -> &UnpackReport {
        &self.report
    }

    /// Releases the container. Calling it again is a no-op.
    pub fn close(&mut self) {
        self.archive = None;
    }

    /// Returns the decoded entry names in stored order.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the reader is closed and `NotAnArchive` if an entry
    /// header is corrupt.
    pub fn entry_names(&mut self) -> Result<Vec<String>> {
        let charset = self.options.charset;
        let archive = self.archive_mut()?;
        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let entry = archive.by_index(index).map_err(ArchiveError::from_zip)?;
            names.push(charset.decode_name(entry.name_raw(), entry.name()));
        }
        Ok(names)
    }

    /// Returns the bytes of the entry whose decoded name equals `name`.
    ///
    /// A trailing `/` on either side is ignored, so directories can be named
    /// without it; their content is empty.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry matches, `NotAnArchive` for corrupt
    /// headers and `Io` if decompression fails.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let charset = self.options.charset;
        let wanted = name.trim_end_matches('/');
        let archive = self.archive_mut()?;

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(ArchiveError::from_zip)?;
            let decoded = charset.decode_name(entry.name_raw(), entry.name());
            if decoded.trim_end_matches('/') != wanted {
                continue;
            }

            let capacity = usize::try_from(entry.size()).unwrap_or_default();
            let mut content = Vec::with_capacity(capacity);
            entry.read_to_end(&mut content)?;
            return Ok(content);
        }

        Err(ArchiveError::EntryNotFound {
            name: name.to_string(),
        })
    }

    /// Extracts every entry under `dest` and closes the reader.
    ///
    /// `dest` is created if missing. For each entry, in stored order, the
    /// `.` and `..` segments of its name are resolved lexically (a `..` above
    /// `dest` is a traversal), and the resulting target is checked for
    /// containment before any directory or file is created for it. The first failing entry aborts the whole extraction; entries
    /// already written stay on disk.
    ///
    /// # Errors
    ///
    /// - `PathTraversal` if an entry resolves outside `dest`.
    /// - `InvalidEntryName` for a file entry whose name has no segments.
    /// - `NotAnArchive` for corrupt entry headers.
    /// - `Io` for filesystem failures, or if the reader is closed.
    pub fn extract(&mut self, dest: &Path) -> Result<PathBuf> {
        let started = Instant::now();
        let charset = self.options.charset;
        let cmp = self.options.comparator;
        if self.archive.is_none() {
            return Err(closed_error());
        }

        fs::create_dir_all(dest)?;
        let root = dest.canonicalize()?;
        self.report = UnpackReport::new(dest);

        let Some(archive) = self.archive.as_mut() else {
            return Err(closed_error());
        };

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(ArchiveError::from_zip)?;
            let name = charset.decode_name(entry.name_raw(), entry.name());
            let is_dir = entry.is_dir();

            let segments = resolve_segments(&name)?;
            let mut target = root.clone();
            target.extend(segments.iter());
            let is_root = segments.is_empty();

            check_containment(&root, &target, &name, cmp)?;

            if is_dir {
                fs::create_dir_all(&target)?;
                self.report.directories_created += 1;
                tracing::debug!(entry = %name, "created directory");
                continue;
            }

            if is_root {
                return Err(ArchiveError::InvalidEntryName { name });
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut file = File::create(&target)?;
            let bytes = copy_and_flush(&mut entry, &mut file, &mut self.buffer)?;
            self.report.files_extracted += 1;
            self.report.bytes_written = self.report.bytes_written.saturating_add(bytes);
            tracing::debug!(entry = %name, bytes, "extracted file");
        }

        self.archive = None;
        self.report.duration = started.elapsed();
        Ok(dest.to_path_buf())
    }

    fn archive_mut(&mut self) -> Result<&mut ZipArchive<R>> {
        self.archive.as_mut().ok_or_else(closed_error)
    }
}

/// Resolves `.` and `..` in an entry name without touching the filesystem,
/// so the joined target holds no `..` for the OS to apply after a symlink.
fn resolve_segments(name: &str) -> Result<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ArchiveError::PathTraversal {
                        path: PathBuf::from(name),
                    });
                }
            }
            other => segments.push(other),
        }
    }
    Ok(segments)
}

fn closed_error() -> ArchiveError {
    ArchiveError::Io(std::io::Error::other("archive reader is closed"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn raw_zip(entries: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content).unwrap();
            }
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn reader(entries: &[(&str, &[u8])]) -> ArchiveReader<Cursor<Vec<u8>>> {
        ArchiveReader::new(raw_zip(entries), UnpackOptions::default()).unwrap()
    }

    #[test]
    fn test_not_an_archive() {
        let result = ArchiveReader::new(Cursor::new(b"plain text".to_vec()), UnpackOptions::default());
        assert!(matches!(result, Err(ArchiveError::NotAnArchive { .. })));
    }

    #[test]
    fn test_entry_names_in_stored_order() {
        let mut reader = reader(&[("z.txt", b"z"), ("a/", b""), ("a/b.txt", b"b")]);
        assert_eq!(reader.len(), 3);
        assert_eq!(reader.entry_names().unwrap(), vec!["z.txt", "a/", "a/b.txt"]);
    }

    #[test]
    fn test_read_entry() {
        let mut reader = reader(&[("a.txt", b"hi"), ("sub/b.txt", b"yo")]);
        assert_eq!(reader.read_entry("sub/b.txt").unwrap(), b"yo");
        assert!(matches!(
            reader.read_entry("missing.txt"),
            Err(ArchiveError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn test_read_directory_entry_without_slash() {
        let mut reader = reader(&[("empty/", b"")]);
        assert!(reader.read_entry("empty").unwrap().is_empty());
    }

    #[test]
    fn test_extract_files_and_directories() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dst");
        let mut reader = reader(&[("a.txt", b"hi"), ("empty/", b""), ("sub/b.txt", b"yo")]);

        let returned = reader.extract(&dest).unwrap();
        assert_eq!(returned, dest);
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "hi");
        assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "yo");
        assert!(dest.join("empty").is_dir());

        let report = reader.report();
        assert_eq!(report.files_extracted, 2);
        assert_eq!(report.directories_created, 1);
        assert_eq!(report.bytes_written, 4);
        assert!(reader.is_closed());
    }

    #[test]
    fn test_extract_collapses_empty_segments() {
        let temp = TempDir::new().unwrap();
        let mut reader = reader(&[("a//b///c.txt", b"c")]);
        reader.extract(temp.path()).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("a/b/c.txt")).unwrap(), "c");
    }

    #[test]
    fn test_extract_rejects_traversal_before_creating_anything() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dst");
        let mut reader = reader(&[("../outside/evil.txt", b"evil")]);

        let result = reader.extract(&dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));
        assert!(!temp.path().join("outside").exists());
    }

    #[test]
    fn test_extract_aborts_on_first_bad_entry() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dst");
        let mut reader = reader(&[("ok.txt", b"ok"), ("../../evil.txt", b"evil"), ("later.txt", b"x")]);

        assert!(reader.extract(&dest).is_err());
        assert!(dest.join("ok.txt").exists());
        assert!(!dest.join("later.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_refuses_to_write_through_symlink() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dst");
        let outside = temp.path().join("outside");
        fs::create_dir_all(&dest).unwrap();
        fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, dest.join("link")).unwrap();

        let mut reader = reader(&[("link/evil.txt", b"evil")]);
        let result = reader.extract(&dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));
        assert!(!outside.join("evil.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_resolves_parent_segments_before_symlinks() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dst");
        let outside = temp.path().join("outside");
        fs::create_dir_all(&dest).unwrap();
        fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink("../outside", dest.join("link")).unwrap();

        let mut reader = reader(&[("x/../link/evil.txt", b"evil")]);
        let result = reader.extract(&dest);
        assert!(matches!(result, Err(ArchiveError::PathTraversal { .. })));
        assert!(!outside.join("evil.txt").exists());
        assert!(!dest.join("x").exists());
    }

    #[test]
    fn test_extract_inner_parent_creates_no_stray_directory() {
        let temp = TempDir::new().unwrap();
        let mut reader = reader(&[("a/../b.txt", b"b")]);
        reader.extract(temp.path()).unwrap();
        assert_eq!(fs::read_to_string(temp.path().join("b.txt")).unwrap(), "b");
        assert!(!temp.path().join("a").exists());
    }

    #[test]
    fn test_resolve_segments() {
        assert_eq!(resolve_segments("a/./b//c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(resolve_segments("x/y/../../z").unwrap(), vec!["z"]);
        assert!(resolve_segments("/").unwrap().is_empty());
        assert!(matches!(
            resolve_segments("a/../../b"),
            Err(ArchiveError::PathTraversal { .. })
        ));
    }

    #[test]
    fn test_operations_after_close_fail() {
        let temp = TempDir::new().unwrap();
        let mut reader = reader(&[("a.txt", b"hi")]);
        reader.close();
        reader.close();

        assert!(reader.is_empty());
        assert!(reader.entry_names().is_err());
        assert!(reader.extract(temp.path()).is_err());
    }
}
