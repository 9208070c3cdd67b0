//! Archive creation.
//!
//! Sources are walked lazily and every entry is written as soon as it is
//! produced, so memory use does not grow with the size of the tree.

pub mod filters;
pub mod walker;

pub mod config;
pub mod report;
pub mod validate;
pub mod writer;

pub use config::PackOptions;
pub use report::PackReport;
pub use validate::validate_sources;
pub use walker::PathFilter;
pub use walker::SourceSpec;
pub use walker::WalkEntry;
pub use writer::ArchiveWriter;
