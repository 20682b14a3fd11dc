//! Directory archiving and one-shot upload library.
//!
//! `tarpush-core` packs a directory into a gzip-compressed TAR archive,
//! skipping version-control and dependency directories, and posts the result
//! to a local service at `{endpoint}/apis/{identifier}/upload`.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use tarpush_core::PushConfig;
//! use tarpush_core::tar_and_upload;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PushConfig::default();
//! let report = tar_and_upload(Path::new("."), "billing", &config)?;
//! println!("Uploaded {} files", report.archive.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod error;
pub mod io;
#[doc(hidden)]
pub mod test_utils;
pub mod upload;

// Re-export main API types
pub use api::PushConfig;
pub use api::PushReport;
pub use api::tar_and_upload;
pub use archive::ArchiveConfig;
pub use archive::ArchiveReport;
pub use archive::create_archive_file;
pub use archive::write_archive;
pub use error::PushError;
pub use error::Result;
pub use error::Stage;
pub use upload::UploadConfig;
pub use upload::UploadReport;
pub use upload::Uploader;
pub use upload::upload_file;
