//! Byte plumbing shared by the archiver.
//!
//! Source files are read through an [`ExactReader`] so each entry body
//! matches its header size. The gzip stream goes to a [`FanOutWriter`], so
//! any number of sinks receive identical bytes and the compressed size is
//! known once encoding finishes.

pub mod exact;
pub mod fanout;

pub use exact::ExactReader;
pub use fanout::FanOutWriter;
