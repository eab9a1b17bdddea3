//! String and blob codecs

use super::{NULL, invalid_value};
use crate::TypeCodec;
use crate::literal::{is_null, is_quoted, malformed, quote, unquote};
use cqlkit_diagnostics::Result;
use cqlkit_types::{DataType, NativeType};

/// `ascii`, `text` and `varchar` as `String`
#[derive(Debug, Clone, Copy)]
pub struct StringCodec {
    native: NativeType,
}

impl StringCodec {
    pub const ASCII: Self = Self {
        native: NativeType::Ascii,
    };
    pub const TEXT: Self = Self {
        native: NativeType::Text,
    };
    pub const VARCHAR: Self = Self {
        native: NativeType::Varchar,
    };

    fn check(&self, value: &str) -> Result<()> {
        if self.native == NativeType::Ascii && !value.is_ascii() {
            return Err(invalid_value(format!("{value:?} is not a valid ascii string")));
        }
        Ok(())
    }
}

impl TypeCodec<String> for StringCodec {
    fn cql_type(&self) -> DataType {
        self.native.into()
    }

    fn serialize(&self, value: &String) -> Result<Vec<u8>> {
        self.check(value)?;
        Ok(value.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };
        let value = String::from_utf8(bytes.to_vec())
            .map_err(|e| invalid_value(format!("invalid {} bytes: {e}", self.native)))?;
        self.check(&value)?;
        Ok(Some(value))
    }

    fn parse(&self, literal: &str) -> Result<Option<String>> {
        if is_null(literal) {
            return Ok(None);
        }
        let literal = literal.trim();
        if !is_quoted(literal) {
            return Err(malformed(literal, "text values must be enclosed in single quotes"));
        }
        Ok(Some(unquote(literal)))
    }

    fn format(&self, value: Option<&String>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), |value| quote(value)))
    }
}

/// `blob` as `Vec<u8>`, written as `0x...` in literals
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobCodec;

impl TypeCodec<Vec<u8>> for BlobCodec {
    fn cql_type(&self) -> DataType {
        DataType::blob()
    }

    fn serialize(&self, value: &Vec<u8>) -> Result<Vec<u8>> {
        Ok(value.clone())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<Vec<u8>>> {
        Ok(bytes.map(<[u8]>::to_vec))
    }

    fn parse(&self, literal: &str) -> Result<Option<Vec<u8>>> {
        if is_null(literal) {
            return Ok(None);
        }
        let trimmed = literal.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| malformed(literal, "blob values must start with 0x"))?;
        hex::decode(digits)
            .map(Some)
            .map_err(|e| malformed(literal, e.to_string()))
    }

    fn format(&self, value: Option<&Vec<u8>>) -> Result<String> {
        Ok(value.map_or_else(
            || NULL.to_string(),
            |bytes| format!("0x{}", hex::encode(bytes)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqlkit_diagnostics::{CQL0200, CQL0203};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_text_literals() {
        let codec = StringCodec::TEXT;
        assert_eq!(codec.format(Some(&"it's".to_string())).unwrap(), "'it''s'");
        assert_eq!(codec.parse("'it''s'").unwrap(), Some("it's".to_string()));
        assert_eq!(codec.parse("''").unwrap(), Some(String::new()));
        assert_eq!(codec.parse("NULL").unwrap(), None);
        assert_eq!(codec.parse("abc").unwrap_err().code(), CQL0203);
    }

    #[test]
    fn test_empty_bytes_are_an_empty_string() {
        assert_eq!(StringCodec::VARCHAR.deserialize(Some(&[])).unwrap(), Some(String::new()));
        assert_eq!(StringCodec::VARCHAR.deserialize(None).unwrap(), None);
    }

    #[test]
    fn test_ascii_rejects_non_ascii() {
        let err = StringCodec::ASCII.serialize(&"héllo".to_string()).unwrap_err();
        assert_eq!(err.code(), CQL0200);
        assert!(StringCodec::TEXT.serialize(&"héllo".to_string()).is_ok());
        assert!(StringCodec::TEXT.deserialize(Some(&[0xff, 0xfe])).is_err());
    }

    #[test]
    fn test_blob_literals() {
        assert_eq!(BlobCodec.format(Some(&vec![0xca, 0xfe])).unwrap(), "0xcafe");
        assert_eq!(BlobCodec.parse("0xCAFE").unwrap(), Some(vec![0xca, 0xfe]));
        assert_eq!(BlobCodec.parse("0x").unwrap(), Some(Vec::new()));
        assert_eq!(BlobCodec.parse("cafe").unwrap_err().code(), CQL0203);
        assert_eq!(BlobCodec.deserialize(Some(&[])).unwrap(), Some(Vec::new()));
    }

    proptest! {
        #[test]
        fn text_round_trips(value in any::<String>()) {
            let codec = StringCodec::TEXT;
            let bytes = codec.serialize(&value).unwrap();
            prop_assert_eq!(codec.deserialize(Some(&bytes)).unwrap(), Some(value.clone()));
            let literal = codec.format(Some(&value)).unwrap();
            prop_assert_eq!(codec.parse(&literal).unwrap(), Some(value));
        }

        #[test]
        fn ascii_round_trips(value in "[\\x00-\\x7f]*") {
            let codec = StringCodec::ASCII;
            let bytes = codec.serialize(&value).unwrap();
            prop_assert_eq!(codec.deserialize(Some(&bytes)).unwrap(), Some(value.clone()));
            let literal = codec.format(Some(&value)).unwrap();
            prop_assert_eq!(codec.parse(&literal).unwrap(), Some(value));
        }

        #[test]
        fn blob_round_trips(value in prop::collection::vec(any::<u8>(), 0..64)) {
            let bytes = BlobCodec.serialize(&value).unwrap();
            prop_assert_eq!(BlobCodec.deserialize(Some(&bytes)).unwrap(), Some(value.clone()));
            let literal = BlobCodec.format(Some(&value)).unwrap();
            prop_assert_eq!(BlobCodec.parse(&literal).unwrap(), Some(value));
        }
    }
}
