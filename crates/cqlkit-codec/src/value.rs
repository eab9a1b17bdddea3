//! Dynamic CQL values
//!
//! [`CqlValue`] holds a value of any CQL type, composites included, so that
//! [`ValueCodec`](crate::ValueCodec) can encode columns whose type is only
//! known at runtime. `NULL` is expressed with `Option` at the edges: a codec
//! returns `Option<CqlValue>`, and tuple components and user type fields are
//! `Option` since those may hold `NULL`. Collection elements may not.

use chrono::{DateTime, NaiveDate, Utc};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// A value of any CQL type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CqlValue {
    // === Native Types ===
    Ascii(String),
    BigInt(i64),
    Blob(Vec<u8>),
    Boolean(bool),
    Counter(i64),
    Decimal(Decimal),
    Double(f64),
    Float(f32),
    Inet(IpAddr),
    Int(i32),
    /// `text` or `varchar`
    Text(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    /// Nanoseconds since midnight
    Time(i64),
    Uuid(Uuid),
    Varint(BigInt),
    TimeUuid(Uuid),
    TinyInt(i8),
    SmallInt(i16),

    // === Composite Types ===
    List(Vec<CqlValue>),
    /// Elements in iteration order; uniqueness is left to the server
    Set(Vec<CqlValue>),
    /// Entries in iteration order
    Map(Vec<(CqlValue, CqlValue)>),
    Tuple(Vec<Option<CqlValue>>),
    UserDefined {
        keyspace: String,
        type_name: String,
        fields: Vec<(String, Option<CqlValue>)>,
    },
}

impl CqlValue {
    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Ascii(_) => "ascii",
            Self::BigInt(_) => "bigint",
            Self::Blob(_) => "blob",
            Self::Boolean(_) => "boolean",
            Self::Counter(_) => "counter",
            Self::Decimal(_) => "decimal",
            Self::Double(_) => "double",
            Self::Float(_) => "float",
            Self::Inet(_) => "inet",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Uuid(_) => "uuid",
            Self::Varint(_) => "varint",
            Self::TimeUuid(_) => "timeuuid",
            Self::TinyInt(_) => "tinyint",
            Self::SmallInt(_) => "smallint",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Tuple(_) => "tuple",
            Self::UserDefined { .. } => "user type",
        }
    }

    /// Try to get as a string (ascii, text or varchar)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Ascii(s) | Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as Int
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the elements of a list or set
    pub fn as_elements(&self) -> Option<&[CqlValue]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get the entries of a map
    pub fn as_map(&self) -> Option<&[(CqlValue, CqlValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get the components of a tuple
    pub fn as_tuple(&self) -> Option<&[Option<CqlValue>]> {
        match self {
            Self::Tuple(components) => Some(components),
            _ => None,
        }
    }

    /// Get a user type field by its normalized name.
    ///
    /// Returns `None` for other values, unknown fields and `NULL` fields.
    pub fn field(&self, name: &str) -> Option<&CqlValue> {
        match self {
            Self::UserDefined { fields, .. } => fields
                .iter()
                .find(|(field, _)| field == name)
                .and_then(|(_, value)| value.as_ref()),
            _ => None,
        }
    }

    // === Constructors ===

    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create a user type value
    pub fn user_defined<N: Into<String>>(
        keyspace: impl Into<String>,
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, Option<CqlValue>)>,
    ) -> Self {
        Self::UserDefined {
            keyspace: keyspace.into(),
            type_name: type_name.into(),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl From<i32> for CqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for CqlValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<bool> for CqlValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for CqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accessors() {
        assert_eq!(CqlValue::from(7).as_int(), Some(7));
        assert_eq!(CqlValue::from(7i64).as_int(), None);
        assert_eq!(CqlValue::Ascii("a".into()).as_text(), Some("a"));
        assert_eq!(CqlValue::Set(vec![1.into()]).as_elements().map(<[_]>::len), Some(1));
        assert_eq!(CqlValue::Tuple(vec![None]).as_tuple().map(<[_]>::len), Some(1));
        assert_eq!(CqlValue::from("x").as_map(), None);
    }

    #[test]
    fn test_user_type_fields() {
        let address = CqlValue::user_defined(
            "ks",
            "address",
            [("street", Some("Main St".into())), ("zip", None)],
        );
        assert_eq!(address.field("street"), Some(&CqlValue::text("Main St")));
        assert_eq!(address.field("zip"), None);
        assert_eq!(address.field("city"), None);
        assert_eq!(address.kind_name(), "user type");
    }

    #[test]
    fn test_serde_is_adjacently_tagged() {
        let value = CqlValue::List(vec![CqlValue::Int(1), CqlValue::text("a")]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "List",
                "value": [{"type": "Int", "value": 1}, {"type": "Text", "value": "a"}]
            })
        );
        let back: CqlValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
