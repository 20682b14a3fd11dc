//! Directory archiving.
//!
//! Walks a source directory, prunes excluded subtrees, and encodes every
//! regular file into a gzip-compressed tar stream that is fanned out to one
//! or more byte sinks.

pub mod config;
pub mod filters;
pub mod report;
pub mod tar;
pub mod walker;

pub use config::ArchiveConfig;
pub use report::ArchiveReport;
pub use self::tar::create_archive_file;
pub use self::tar::write_archive;
pub use walker::ArchiveEntry;
pub use walker::FilteredWalker;
