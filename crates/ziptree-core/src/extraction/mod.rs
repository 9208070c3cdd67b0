//! Archive extraction.

pub mod config;
pub mod reader;
pub mod report;

pub use config::UnpackOptions;
pub use reader::ArchiveReader;
pub use report::UnpackReport;
