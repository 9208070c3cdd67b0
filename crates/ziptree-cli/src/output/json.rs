//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use ziptree_core::PackReport;
use ziptree_core::UnpackReport;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_pack_result(&self, output_path: &Path, report: &PackReport) -> Result<()> {
        #[derive(Serialize)]
        struct PackOutput {
            output_path: String,
            files_added: usize,
            directories_added: usize,
            bytes_written: u64,
            duration_ms: u128,
        }

        let data = PackOutput {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            directories_added: report.directories_added,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("pack", data))
    }

    fn format_unpack_result(&self, archive: &Path, report: &UnpackReport) -> Result<()> {
        #[derive(Serialize)]
        struct UnpackOutput {
            archive: String,
            destination: String,
            files_extracted: usize,
            directories_created: usize,
            bytes_written: u64,
            duration_ms: u128,
        }

        let data = UnpackOutput {
            archive: archive.display().to_string(),
            destination: report.destination.display().to_string(),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("unpack", data))
    }

    fn format_entry_list(&self, archive: &Path, entries: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            archive: String,
            total_entries: usize,
            entries: &'a [String],
        }

        let data = ListOutput {
            archive: archive.display().to_string(),
            total_entries: entries.len(),
            entries,
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
