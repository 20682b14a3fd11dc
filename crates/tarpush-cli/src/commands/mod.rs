//! Command implementations.

pub mod push;
