//! Built-in codecs for the native types
//!
//! Each codec maps one native type to its default Rust representation.
//! Fixed-width types decode empty bytes as `NULL`; `text` and `blob` decode
//! them as an empty value.

mod big;
mod network;
mod numeric;
mod temporal;
mod text;

pub use big::{DecimalCodec, VarintCodec};
pub use network::{InetCodec, UuidCodec};
pub use numeric::{BooleanCodec, DoubleCodec, FloatCodec, IntCodec, LongCodec, SmallIntCodec, TinyIntCodec};
pub use temporal::{DateCodec, TimeCodec, TimestampCodec};
pub use text::{BlobCodec, StringCodec};

pub(crate) use temporal::{
    cql_date_to_days, days_to_cql_date, parse_date_literal, parse_timestamp_literal,
};

use cqlkit_diagnostics::{CQL0200, CqlError};

/// Literal for a `NULL` value
pub(crate) const NULL: &str = "NULL";

pub(crate) fn invalid_value(message: impl Into<String>) -> CqlError {
    CqlError::invalid_type(CQL0200, message)
}
