//! Error handling for the cqlkit CQL type system
//!
//! This crate provides the error type shared by every cqlkit crate, the
//! structured error codes attached to it, and source locations used to point
//! at the offending byte of a malformed type string.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for cqlkit operations
pub type Result<T> = std::result::Result<T, CqlError>;
