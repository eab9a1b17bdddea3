//! The codec trait

use cqlkit_diagnostics::Result;
use cqlkit_types::DataType;

/// Converts values of one CQL type to and from a Rust representation `T`
///
/// `None` stands for CQL `NULL` in every direction: absent wire bytes
/// deserialize to `None`, the literals `NULL` and the empty string parse to
/// `None`, and `format(None)` yields `NULL`.
pub trait TypeCodec<T>: Send + Sync {
    /// The CQL type this codec handles
    fn cql_type(&self) -> DataType;

    /// Encode a value to its wire bytes
    fn serialize(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode wire bytes
    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<T>>;

    /// Parse a CQL literal
    fn parse(&self, literal: &str) -> Result<Option<T>>;

    /// Render a value as a CQL literal
    fn format(&self, value: Option<&T>) -> Result<String>;
}
