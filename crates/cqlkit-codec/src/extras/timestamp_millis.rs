//! `timestamp` as a raw millisecond count

use crate::TypeCodec;
use crate::codecs::{NULL, parse_timestamp_literal};
use crate::wire::fixed;
use cqlkit_diagnostics::Result;
use cqlkit_types::{DataType, NativeType};

/// `timestamp` as an `i64` count of milliseconds since 1970-01-01T00:00:00Z
///
/// Accepts every value of the wire format, including instants chrono cannot
/// represent. Values are formatted as a bare long literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampMillisCodec;

impl TypeCodec<i64> for TimestampMillisCodec {
    fn cql_type(&self) -> DataType {
        DataType::timestamp()
    }

    fn serialize(&self, value: &i64) -> Result<Vec<u8>> {
        Ok(value.to_be_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<i64>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => Ok(Some(i64::from_be_bytes(fixed(bytes, NativeType::Timestamp)?))),
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<i64>> {
        parse_timestamp_literal(literal)
    }

    fn format(&self, value: Option<&i64>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), i64::to_string))
    }
}
