//! Streaming ZIP writer.

use crate::ArchiveError;
use crate::Result;
use crate::charset::Charset;
use crate::copy::CopyBuffer;
use crate::copy::copy_and_flush;
use crate::creation::report::PackReport;
use crate::creation::walker::WalkEntry;
use crate::path::normalize;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

/// Writes directory and file entries into one ZIP container.
///
/// The writer is `Open` from construction until [`close`](Self::close) or
/// [`finish`](Self::finish); afterwards every add operation fails. Dropping
/// an open writer finalizes the container, logging any failure.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use ziptree_core::creation::ArchiveWriter;
///
/// let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
/// writer.add_directory_entry("empty")?;
/// writer.add_file_entry("greeting.txt", &mut "hello".as_bytes())?;
/// let report = writer.close()?;
/// assert_eq!(report.files_added, 1);
/// assert_eq!(report.directories_added, 1);
/// # Ok::<(), ziptree_core::ArchiveError>(())
/// ```
pub struct ArchiveWriter<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    options: SimpleFileOptions,
    charset: Charset,
    buffer: CopyBuffer,
    report: PackReport,
    started: Instant,
}

impl<W: Write + Seek> ArchiveWriter<W> {
    /// Binds a new writer to `inner`. Entries are Deflate-compressed.
    pub fn new(inner: W) -> Self {
        Self {
            zip: Some(ZipWriter::new(inner)),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            charset: Charset::default(),
            buffer: CopyBuffer::new(),
            report: PackReport::default(),
            started: Instant::now(),
        }
    }

    /// Restricts entry names to those `charset` can represent.
    #[must_use]
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Returns `true` once the container has been finalized.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.zip.is_none()
    }

    /// Statistics for the entries written so far.
    #[must_use]
    pub fn report(&self) -> &PackReport {
        &self.report
    }

    /// Adds a zero-length entry named `name/`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntryName` for names that normalize to nothing or to an
    /// absolute path or that the charset cannot represent, and `Io` if the
    /// writer is closed or the write fails.
    pub fn add_directory_entry(&mut self, name: &str) -> Result<()> {
        let name = archive_name(name, self.charset)?;
        let options = self.options;
        let zip = self.open_zip()?;
        zip.add_directory(format!("{name}/"), options)
            .map_err(|e| zip_failure("failed to add directory", e))?;

        self.report.directories_added += 1;
        tracing::debug!(entry = %name, "added directory");
        Ok(())
    }

    /// Adds a file entry and streams every byte of `reader` into it.
    ///
    /// The caller keeps ownership of `reader`. The entry is completed when the
    /// next entry starts or the container is closed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntryName` for unusable names and `Io` if the writer is
    /// closed or reading or writing fails.
    pub fn add_file_entry(&mut self, name: &str, reader: &mut dyn Read) -> Result<u64> {
        self.add_file_with_options(name, reader, self.options)
    }

    /// Adds one walker entry, opening the file it points at.
    ///
    /// # Errors
    ///
    /// Same as [`add_file_entry`](Self::add_file_entry), plus `Io` if the
    /// source file cannot be opened.
    pub fn add_walk_entry(&mut self, entry: &WalkEntry) -> Result<()> {
        if entry.is_dir {
            return self.add_directory_entry(&entry.name);
        }

        let mut file = File::open(&entry.path)?;
        let size = file.metadata()?.len();
        let options = self.options.large_file(size >= u64::from(u32::MAX));
        self.add_file_with_options(&entry.name, &mut file, options)?;
        Ok(())
    }

    /// Adds every entry of an iterator, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by `entries` or raised while writing.
    pub fn add_walk_entries<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<WalkEntry>>,
    {
        for entry in entries {
            self.add_walk_entry(&entry?)?;
        }
        Ok(())
    }

    /// Writes the central directory and releases the container.
    ///
    /// Calling `close` again is a no-op that returns the same report.
    ///
    /// # Errors
    ///
    /// Returns `Io` if finalizing or flushing the container fails.
    pub fn close(&mut self) -> Result<PackReport> {
        self.finish_inner()?;
        Ok(self.report.clone())
    }

    /// Closes the writer and hands back the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the writer was already closed or finalizing fails.
    pub fn finish(mut self) -> Result<W> {
        self.finish_inner()?
            .ok_or_else(|| closed_error().into())
    }

    fn finish_inner(&mut self) -> Result<Option<W>> {
        let Some(zip) = self.zip.take() else {
            return Ok(None);
        };
        let mut inner = zip
            .finish()
            .map_err(|e| zip_failure("failed to finish ZIP archive", e))?;
        inner.flush()?;

        self.report.duration = self.started.elapsed();
        tracing::debug!(
            files = self.report.files_added,
            directories = self.report.directories_added,
            bytes = self.report.bytes_written,
            "archive finalized"
        );
        Ok(Some(inner))
    }

    fn add_file_with_options(
        &mut self,
        name: &str,
        reader: &mut dyn Read,
        options: SimpleFileOptions,
    ) -> Result<u64> {
        let name = archive_name(name, self.charset)?;
        let zip = self.zip.as_mut().ok_or_else(closed_error)?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| zip_failure("failed to start file in ZIP", e))?;

        let bytes = copy_and_flush(reader, zip, &mut self.buffer)?;

        self.report.files_added += 1;
        self.report.bytes_written = self.report.bytes_written.saturating_add(bytes);
        tracing::debug!(entry = %name, bytes, "added file");
        Ok(bytes)
    }

    fn open_zip(&mut self) -> Result<&mut ZipWriter<W>> {
        self.zip.as_mut().ok_or_else(|| closed_error().into())
    }
}

impl<W: Write + Seek> Drop for ArchiveWriter<W> {
    fn drop(&mut self) {
        if self.zip.is_some()
            && let Err(e) = self.finish_inner()
        {
            tracing::warn!(error = %e, "failed to finalize archive on drop");
        }
    }
}

/// Validates and normalizes a caller-supplied entry name.
fn archive_name(name: &str, charset: Charset) -> Result<String> {
    let normalized = normalize(name);
    let first = normalized.split('/').next().unwrap_or_default();
    if normalized.is_empty()
        || normalized.starts_with('/')
        || first.contains(':')
        || !charset.can_encode(&normalized)
    {
        return Err(ArchiveError::InvalidEntryName {
            name: name.to_string(),
        });
    }
    Ok(normalized)
}

fn closed_error() -> std::io::Error {
    std::io::Error::other("archive writer is closed")
}

fn zip_failure(context: &str, err: ZipError) -> ArchiveError {
    match err {
        ZipError::Io(e) => ArchiveError::Io(e),
        other => ArchiveError::Io(std::io::Error::other(format!("{context}: {other}"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_directory_entry_has_trailing_slash() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer.add_directory_entry("empty").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert_eq!(entry_names(bytes), vec!["empty/"]);
    }

    #[test]
    fn test_file_entry_contents() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        let written = writer
            .add_file_entry("sub/b.txt", &mut "yo".as_bytes())
            .unwrap();
        assert_eq!(written, 2);
        let bytes = writer.finish().unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name("sub/b.txt").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "yo");
    }

    #[test]
    fn test_entry_names_are_normalized() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer
            .add_file_entry("a\\.\\b.txt", &mut "x".as_bytes())
            .unwrap();
        writer
            .add_file_entry("../../escape.txt", &mut "x".as_bytes())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert_eq!(entry_names(bytes), vec!["a/b.txt", "escape.txt"]);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        for name in ["", ".", "/etc/passwd", "C:/windows"] {
            let result = writer.add_file_entry(name, &mut "x".as_bytes());
            assert!(
                matches!(result, Err(ArchiveError::InvalidEntryName { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_close_twice_is_harmless() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer.add_file_entry("a.txt", &mut "hi".as_bytes()).unwrap();

        let first = writer.close().unwrap();
        let second = writer.close().unwrap();
        assert!(writer.is_closed());
        assert_eq!(first.files_added, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_after_close_fails() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer.close().unwrap();

        let result = writer.add_directory_entry("late");
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_finish_after_close_fails() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer.close().unwrap();
        assert!(writer.finish().is_err());
    }

    #[test]
    fn test_drop_finalizes_archive() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("dropped.zip");
        {
            let mut writer = ArchiveWriter::new(File::create(&path).unwrap());
            writer.add_file_entry("a.txt", &mut "hi".as_bytes()).unwrap();
        }

        let archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_add_walk_entry_reads_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "hi").unwrap();

        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer
            .add_walk_entry(&WalkEntry {
                path: file,
                name: "a.txt".to_string(),
                is_dir: false,
            })
            .unwrap();
        assert_eq!(writer.report().bytes_written, 2);
    }

    #[test]
    fn test_add_walk_entries_stops_on_error() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        let entries = vec![
            Ok(WalkEntry {
                path: "unused".into(),
                name: "first".to_string(),
                is_dir: true,
            }),
            Err(ArchiveError::SourceNotFound {
                path: "gone".into(),
            }),
            Ok(WalkEntry {
                path: "unused".into(),
                name: "never".to_string(),
                is_dir: true,
            }),
        ];

        let result = writer.add_walk_entries(entries);
        assert!(matches!(result, Err(ArchiveError::SourceNotFound { .. })));
        assert_eq!(writer.report().directories_added, 1);
    }

    #[test]
    fn test_cp437_rejects_unrepresentable_names() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new())).with_charset(Charset::Cp437);
        writer.add_file_entry("café.txt", &mut "x".as_bytes()).unwrap();

        let file = writer.add_file_entry("日本.txt", &mut "x".as_bytes());
        assert!(matches!(file, Err(ArchiveError::InvalidEntryName { .. })));
        let dir = writer.add_directory_entry("€uro");
        assert!(matches!(dir, Err(ArchiveError::InvalidEntryName { .. })));

        let bytes = writer.finish().unwrap().into_inner();
        assert_eq!(entry_names(bytes), vec!["café.txt"]);
    }

    #[test]
    fn test_non_ascii_names_are_utf8() {
        let mut writer = ArchiveWriter::new(Cursor::new(Vec::new()));
        writer
            .add_file_entry("données/été.txt", &mut "x".as_bytes())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name_raw(), "données/été.txt".as_bytes());
    }
}
