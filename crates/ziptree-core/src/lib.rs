//! Pack directory trees into ZIP archives and unpack them safely.
//!
//! `ziptree-core` walks one or more source trees lazily, streams every file
//! into a Deflate-compressed ZIP container, and extracts archives with every
//! entry checked for containment in the destination ("zip slip"
//! protection).
//!
//! # Examples
//!
//! ```no_run
//! use ziptree_core::PackOptions;
//! use ziptree_core::UnpackOptions;
//! use ziptree_core::creation::SourceSpec;
//! use ziptree_core::pack;
//! use ziptree_core::unpack;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = pack("/tmp/out.zip", &[SourceSpec::new("/tmp/src")], &PackOptions::default())?;
//! println!("Packed {} files", report.files_added);
//!
//! unpack("/tmp/out.zip", "/tmp/dst", UnpackOptions::default())?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod charset;
pub mod copy;
pub mod creation;
pub mod error;
pub mod extraction;
pub mod inspection;
pub mod path;
pub mod security;

pub use api::pack;
pub use api::pack_streams;
pub use api::unpack;
pub use api::unpack_with_report;
pub use charset::Charset;
pub use creation::PackOptions;
pub use creation::PackReport;
pub use creation::SourceSpec;
pub use error::ArchiveError;
pub use error::Result;
pub use extraction::UnpackOptions;
pub use extraction::UnpackReport;
pub use inspection::list_entries;
pub use inspection::read_entry;
