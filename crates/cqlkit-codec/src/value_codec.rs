//! Codec for any CQL type through [`CqlValue`]
//!
//! Natives delegate to the built-in codecs. Composites are framed per the
//! native protocol:
//! - list and set: element count, then length-prefixed elements
//! - map: entry count, then length-prefixed key and value per entry
//! - tuple and user type: one `[int]`-prefixed component per declared
//!   component, `-1` for `NULL`
//!
//! Counts and collection element lengths are 2 bytes under protocol V1 and
//! V2 and 4 bytes from V3 onwards. Tuples and user types need V3.

use crate::codecs::{
    BlobCodec, BooleanCodec, DateCodec, DecimalCodec, DoubleCodec, FloatCodec, InetCodec,
    IntCodec, LongCodec, NULL, SmallIntCodec, StringCodec, TimeCodec, TimestampCodec,
    TinyIntCodec, UuidCodec, VarintCodec, invalid_value,
};
use crate::literal::{is_null, malformed, skip_cql_id, skip_cql_value, skip_spaces};
use crate::wire::{Reader, write_component, write_element, write_size};
use crate::{CqlValue, ProtocolVersion, TypeCodec};
use cqlkit_diagnostics::{CQL0104, CQL0204, CQL0205, CqlError, Result};
use cqlkit_types::{CollectionKind, CollectionType, DataType, NativeType, UserType, escape_id};

macro_rules! native_codecs {
    ($($native:ident => $variant:ident, $codec:expr;)*) => {
        fn encode_native(native: NativeType, value: &CqlValue) -> Result<Vec<u8>> {
            match (native, value) {
                $((NativeType::$native, CqlValue::$variant(v)) => $codec.serialize(v),)*
                _ => Err(mismatch(&native.into(), value)),
            }
        }

        fn decode_native(native: NativeType, bytes: Option<&[u8]>) -> Result<Option<CqlValue>> {
            match native {
                $(NativeType::$native => Ok($codec.deserialize(bytes)?.map(CqlValue::$variant)),)*
            }
        }

        fn parse_native(native: NativeType, literal: &str) -> Result<Option<CqlValue>> {
            match native {
                $(NativeType::$native => Ok($codec.parse(literal)?.map(CqlValue::$variant)),)*
            }
        }

        fn format_native(native: NativeType, value: &CqlValue) -> Result<String> {
            match (native, value) {
                $((NativeType::$native, CqlValue::$variant(v)) => $codec.format(Some(v)),)*
                _ => Err(mismatch(&native.into(), value)),
            }
        }
    };
}

native_codecs! {
    Ascii => Ascii, StringCodec::ASCII;
    BigInt => BigInt, LongCodec::BIGINT;
    Blob => Blob, BlobCodec;
    Boolean => Boolean, BooleanCodec;
    Counter => Counter, LongCodec::COUNTER;
    Decimal => Decimal, DecimalCodec;
    Double => Double, DoubleCodec;
    Float => Float, FloatCodec;
    Inet => Inet, InetCodec;
    Int => Int, IntCodec;
    Text => Text, StringCodec::TEXT;
    Varchar => Text, StringCodec::VARCHAR;
    Timestamp => Timestamp, TimestampCodec;
    Date => Date, DateCodec;
    Time => Time, TimeCodec;
    Uuid => Uuid, UuidCodec::UUID;
    Varint => Varint, VarintCodec;
    TimeUuid => TimeUuid, UuidCodec::TIMEUUID;
    TinyInt => TinyInt, TinyIntCodec;
    SmallInt => SmallInt, SmallIntCodec;
}

fn mismatch(data_type: &DataType, value: &CqlValue) -> CqlError {
    invalid_value(format!(
        "cannot use a {} value for type {data_type}",
        value.kind_name()
    ))
}

fn null_element(data_type: &DataType) -> CqlError {
    CqlError::invalid_type(
        CQL0204,
        format!("collection elements of {data_type} cannot be null"),
    )
}

/// Codec for values of any CQL type
#[derive(Debug, Clone)]
pub struct ValueCodec {
    data_type: DataType,
    version: ProtocolVersion,
}

impl ValueCodec {
    /// Create a codec for `data_type` using the default protocol version
    pub fn new(data_type: DataType) -> Self {
        Self::with_protocol_version(data_type, ProtocolVersion::default())
    }

    /// Create a codec for `data_type` that frames composites for `version`
    pub fn with_protocol_version(data_type: DataType, version: ProtocolVersion) -> Self {
        Self { data_type, version }
    }

    /// Get the protocol version composites are framed for
    pub fn protocol_version(&self) -> ProtocolVersion {
        self.version
    }

    fn require_components(&self, data_type: &DataType) -> Result<()> {
        if self.version.supports_tuples() {
            Ok(())
        } else {
            Err(CqlError::invalid_type(
                CQL0205,
                format!("{data_type} values require protocol V3 or later, got {}", self.version),
            ))
        }
    }

    // === Wire encoding ===

    fn encode(&self, data_type: &DataType, value: &CqlValue) -> Result<Vec<u8>> {
        match data_type {
            DataType::Native(native) => encode_native(*native, value),
            DataType::Collection(collection) => self.encode_collection(data_type, collection, value),
            DataType::Tuple(components) => {
                self.require_components(data_type)?;
                let CqlValue::Tuple(values) = value else {
                    return Err(mismatch(data_type, value));
                };
                if values.len() != components.len() {
                    return Err(invalid_value(format!(
                        "{data_type} has {} components but the value has {}",
                        components.len(),
                        values.len()
                    )));
                }
                let mut out = Vec::new();
                for (component, value) in components.iter().zip(values) {
                    let bytes = value
                        .as_ref()
                        .map(|value| self.encode(component, value))
                        .transpose()?;
                    write_component(&mut out, bytes.as_deref())?;
                }
                Ok(out)
            }
            DataType::UserDefined(user_type) => {
                self.require_components(data_type)?;
                self.encode_user_type(data_type, user_type, value)
            }
        }
    }

    fn encode_collection(
        &self,
        data_type: &DataType,
        collection: &CollectionType,
        value: &CqlValue,
    ) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        match (collection.kind(), value) {
            (CollectionKind::List, CqlValue::List(items)) | (CollectionKind::Set, CqlValue::Set(items)) => {
                write_size(&mut out, items.len(), self.version)?;
                for item in items {
                    let bytes = self.encode(collection.element_type(), item)?;
                    write_element(&mut out, &bytes, self.version)?;
                }
            }
            (CollectionKind::Map, CqlValue::Map(entries)) => {
                let value_type = collection.value_type().ok_or_else(|| mismatch(data_type, value))?;
                write_size(&mut out, entries.len(), self.version)?;
                for (key, entry) in entries {
                    let key = self.encode(collection.element_type(), key)?;
                    write_element(&mut out, &key, self.version)?;
                    let entry = self.encode(value_type, entry)?;
                    write_element(&mut out, &entry, self.version)?;
                }
            }
            _ => return Err(mismatch(data_type, value)),
        }
        Ok(out)
    }

    fn encode_user_type(
        &self,
        data_type: &DataType,
        user_type: &UserType,
        value: &CqlValue,
    ) -> Result<Vec<u8>> {
        let CqlValue::UserDefined {
            keyspace,
            type_name,
            fields: values,
        } = value
        else {
            return Err(mismatch(data_type, value));
        };
        if *keyspace != user_type.keyspace() || *type_name != user_type.type_name() {
            return Err(invalid_value(format!(
                "cannot use a value of {}.{} for type {data_type}",
                escape_id(keyspace),
                escape_id(type_name)
            )));
        }

        let definition = user_type.definition()?;
        if let Some((unknown, _)) = values
            .iter()
            .find(|(name, _)| definition.index_of(&escape_id(name)).is_none())
        {
            return Err(CqlError::schema(
                CQL0104,
                format!("{data_type} has no field named {unknown}"),
            ));
        }

        let mut out = Vec::new();
        for field in definition.fields() {
            let bytes = values
                .iter()
                .find(|(name, _)| name == field.name())
                .and_then(|(_, value)| value.as_ref())
                .map(|value| self.encode(field.data_type(), value))
                .transpose()?;
            write_component(&mut out, bytes.as_deref())?;
        }
        Ok(out)
    }

    // === Wire decoding ===

    fn decode(&self, data_type: &DataType, bytes: Option<&[u8]>) -> Result<Option<CqlValue>> {
        let Some(bytes) = bytes else {
            return Ok(None);
        };

        let mut reader = Reader::new(bytes, self.version);
        let value = match data_type {
            DataType::Native(native) => return decode_native(*native, Some(bytes)),
            DataType::Collection(collection) => {
                if bytes.is_empty() {
                    return Ok(Some(Self::empty_collection(collection.kind())));
                }
                self.decode_collection(data_type, collection, &mut reader)?
            }
            DataType::Tuple(components) => {
                self.require_components(data_type)?;
                let mut values = Vec::with_capacity(components.len());
                for component in components {
                    values.push(self.decode_component(component, &mut reader)?);
                }
                CqlValue::Tuple(values)
            }
            DataType::UserDefined(user_type) => {
                self.require_components(data_type)?;
                let mut fields = Vec::new();
                for field in user_type.fields()? {
                    let value = self.decode_component(field.data_type(), &mut reader)?;
                    fields.push((field.name().to_string(), value));
                }
                CqlValue::UserDefined {
                    keyspace: user_type.keyspace().to_string(),
                    type_name: user_type.type_name().to_string(),
                    fields,
                }
            }
        };
        reader.finish()?;
        Ok(Some(value))
    }

    fn empty_collection(kind: CollectionKind) -> CqlValue {
        match kind {
            CollectionKind::List => CqlValue::List(Vec::new()),
            CollectionKind::Set => CqlValue::Set(Vec::new()),
            CollectionKind::Map => CqlValue::Map(Vec::new()),
        }
    }

    fn decode_collection(
        &self,
        data_type: &DataType,
        collection: &CollectionType,
        reader: &mut Reader<'_>,
    ) -> Result<CqlValue> {
        let size = reader.read_size()?;
        let element_type = collection.element_type();
        let mut decode_element = |element_type: &DataType| -> Result<CqlValue> {
            let bytes = reader.read_element()?;
            if bytes.is_none() {
                return Err(null_element(data_type));
            }
            self.decode(element_type, bytes)?
                .ok_or_else(|| null_element(data_type))
        };

        match collection.kind() {
            CollectionKind::List | CollectionKind::Set => {
                let mut items = Vec::new();
                for _ in 0..size {
                    items.push(decode_element(element_type)?);
                }
                Ok(match collection.kind() {
                    CollectionKind::Set => CqlValue::Set(items),
                    _ => CqlValue::List(items),
                })
            }
            CollectionKind::Map => {
                let value_type = collection
                    .value_type()
                    .ok_or_else(|| invalid_value(format!("{data_type} has no value type")))?;
                let mut entries = Vec::new();
                for _ in 0..size {
                    let key = decode_element(element_type)?;
                    let value = decode_element(value_type)?;
                    entries.push((key, value));
                }
                Ok(CqlValue::Map(entries))
            }
        }
    }

    /// Trailing components missing from the bytes decode as `NULL`
    fn decode_component(&self, data_type: &DataType, reader: &mut Reader<'_>) -> Result<Option<CqlValue>> {
        if reader.is_empty() {
            return Ok(None);
        }
        let bytes = reader.read_component()?;
        self.decode(data_type, bytes)
    }

    // === Literals ===

    fn parse_value(&self, data_type: &DataType, literal: &str) -> Result<Option<CqlValue>> {
        if is_null(literal) {
            return Ok(None);
        }

        let literal = literal.trim();
        let value = match data_type {
            DataType::Native(native) => return parse_native(*native, literal),
            DataType::Collection(collection) => match collection.kind() {
                CollectionKind::List => {
                    CqlValue::List(self.parse_elements(data_type, collection, literal, b'[', b']')?)
                }
                CollectionKind::Set => {
                    CqlValue::Set(self.parse_elements(data_type, collection, literal, b'{', b'}')?)
                }
                CollectionKind::Map => CqlValue::Map(self.parse_entries(data_type, collection, literal)?),
            },
            DataType::Tuple(components) => {
                let mut values = Vec::with_capacity(components.len());
                let mut remaining = components.iter();
                Self::scan(literal, b'(', b')', |item| {
                    let component = remaining
                        .next()
                        .ok_or_else(|| malformed(literal, format!("too many components for {data_type}")))?;
                    values.push(self.parse_value(component, item)?);
                    Ok(())
                })?;
                if values.len() != components.len() {
                    return Err(malformed(
                        literal,
                        format!("expected {} components for {data_type}", components.len()),
                    ));
                }
                CqlValue::Tuple(values)
            }
            DataType::UserDefined(user_type) => self.parse_user_type(data_type, user_type, literal)?,
        };
        Ok(Some(value))
    }

    /// Walk the comma separated items between `open` and `close`
    fn scan(
        literal: &str,
        open: u8,
        close: u8,
        mut on_item: impl FnMut(&str) -> Result<()>,
    ) -> Result<()> {
        let bytes = literal.as_bytes();
        if bytes.first() != Some(&open) || bytes.last() != Some(&close) || bytes.len() < 2 {
            return Err(malformed(
                literal,
                format!("expected a value enclosed in {}{}", char::from(open), char::from(close)),
            ));
        }
        let body_end = bytes.len() - 1;
        let mut idx = skip_spaces(literal, 1);
        if idx == body_end {
            return Ok(());
        }

        loop {
            let end = skip_cql_value(&literal[..body_end], idx)?;
            on_item(&literal[idx..end])?;
            idx = skip_spaces(literal, end);
            match bytes.get(idx) {
                Some(&b',') if idx < body_end => idx = skip_spaces(literal, idx + 1),
                _ if idx == body_end => return Ok(()),
                _ => {
                    return Err(malformed(
                        literal,
                        format!("expected ',' or '{}' at {idx}", char::from(close)),
                    ));
                }
            }
        }
    }

    fn parse_elements(
        &self,
        data_type: &DataType,
        collection: &CollectionType,
        literal: &str,
        open: u8,
        close: u8,
    ) -> Result<Vec<CqlValue>> {
        let mut items = Vec::new();
        Self::scan(literal, open, close, |item| {
            let value = self
                .parse_value(collection.element_type(), item)?
                .ok_or_else(|| null_element(data_type))?;
            items.push(value);
            Ok(())
        })?;
        Ok(items)
    }

    fn parse_entries(
        &self,
        data_type: &DataType,
        collection: &CollectionType,
        literal: &str,
    ) -> Result<Vec<(CqlValue, CqlValue)>> {
        let value_type = collection
            .value_type()
            .ok_or_else(|| invalid_value(format!("{data_type} has no value type")))?;
        let mut entries = Vec::new();
        Self::scan_pairs(literal, skip_cql_value, |key, value| {
            let key = self
                .parse_value(collection.element_type(), key)?
                .ok_or_else(|| null_element(data_type))?;
            let value = self
                .parse_value(value_type, value)?
                .ok_or_else(|| null_element(data_type))?;
            entries.push((key, value));
            Ok(())
        })?;
        Ok(entries)
    }

    fn parse_user_type(&self, data_type: &DataType, user_type: &UserType, literal: &str) -> Result<CqlValue> {
        let definition = user_type.definition()?;
        let mut values: Vec<Option<CqlValue>> = vec![None; definition.fields().len()];
        Self::scan_pairs(literal, skip_cql_id, |name, value| {
            let index = definition.index_of(name).ok_or_else(|| {
                CqlError::schema(CQL0104, format!("{data_type} has no field named {name}"))
            })?;
            values[index] = self.parse_value(definition.fields()[index].data_type(), value)?;
            Ok(())
        })?;

        Ok(CqlValue::UserDefined {
            keyspace: user_type.keyspace().to_string(),
            type_name: user_type.type_name().to_string(),
            fields: definition
                .fields()
                .iter()
                .map(|field| field.name().to_string())
                .zip(values)
                .collect(),
        })
    }

    /// Walk `{key: value, ...}` pairs, with `skip_key` delimiting each key
    fn scan_pairs(
        literal: &str,
        skip_key: fn(&str, usize) -> Result<usize>,
        mut on_pair: impl FnMut(&str, &str) -> Result<()>,
    ) -> Result<()> {
        let bytes = literal.as_bytes();
        if bytes.len() < 2 || bytes[0] != b'{' || bytes[bytes.len() - 1] != b'}' {
            return Err(malformed(literal, "expected a value enclosed in {}"));
        }
        let body_end = bytes.len() - 1;
        let body = &literal[..body_end];
        let mut idx = skip_spaces(literal, 1);
        if idx == body_end {
            return Ok(());
        }

        loop {
            let key_end = skip_key(body, idx)?;
            let key = &literal[idx..key_end];
            idx = skip_spaces(literal, key_end);
            if bytes.get(idx) != Some(&b':') {
                return Err(malformed(literal, format!("expected ':' at {idx}")));
            }
            idx = skip_spaces(literal, idx + 1);
            let value_end = skip_cql_value(body, idx)?;
            on_pair(key, &literal[idx..value_end])?;

            idx = skip_spaces(literal, value_end);
            match bytes.get(idx) {
                Some(&b',') if idx < body_end => idx = skip_spaces(literal, idx + 1),
                _ if idx == body_end => return Ok(()),
                _ => return Err(malformed(literal, format!("expected ',' or '}}' at {idx}"))),
            }
        }
    }

    fn format_value(&self, data_type: &DataType, value: &CqlValue) -> Result<String> {
        let joined = |parts: Vec<String>| parts.join(",");
        match (data_type, value) {
            (DataType::Native(native), value) => format_native(*native, value),
            (DataType::Collection(collection), CqlValue::List(items))
                if collection.kind() == CollectionKind::List =>
            {
                let parts = self.format_all(collection.element_type(), items)?;
                Ok(format!("[{}]", joined(parts)))
            }
            (DataType::Collection(collection), CqlValue::Set(items))
                if collection.kind() == CollectionKind::Set =>
            {
                let parts = self.format_all(collection.element_type(), items)?;
                Ok(format!("{{{}}}", joined(parts)))
            }
            (DataType::Collection(collection), CqlValue::Map(entries))
                if collection.kind() == CollectionKind::Map =>
            {
                let value_type = collection.value_type().ok_or_else(|| mismatch(data_type, value))?;
                let parts = entries
                    .iter()
                    .map(|(key, entry)| {
                        Ok(format!(
                            "{}:{}",
                            self.format_value(collection.element_type(), key)?,
                            self.format_value(value_type, entry)?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{{{}}}", joined(parts)))
            }
            (DataType::Tuple(components), CqlValue::Tuple(values)) if components.len() == values.len() => {
                let parts = components
                    .iter()
                    .zip(values)
                    .map(|(component, value)| self.format_optional(component, value.as_ref()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("({})", joined(parts)))
            }
            (DataType::UserDefined(user_type), CqlValue::UserDefined { fields: values, .. }) => {
                let parts = user_type
                    .fields()?
                    .iter()
                    .map(|field| {
                        let value = values
                            .iter()
                            .find(|(name, _)| name == field.name())
                            .and_then(|(_, value)| value.as_ref());
                        Ok(format!(
                            "{}:{}",
                            escape_id(field.name()),
                            self.format_optional(field.data_type(), value)?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{{{}}}", joined(parts)))
            }
            _ => Err(mismatch(data_type, value)),
        }
    }

    fn format_all(&self, data_type: &DataType, values: &[CqlValue]) -> Result<Vec<String>> {
        values
            .iter()
            .map(|value| self.format_value(data_type, value))
            .collect()
    }

    fn format_optional(&self, data_type: &DataType, value: Option<&CqlValue>) -> Result<String> {
        value.map_or_else(|| Ok(NULL.to_string()), |value| self.format_value(data_type, value))
    }
}

impl TypeCodec<CqlValue> for ValueCodec {
    fn cql_type(&self) -> DataType {
        self.data_type.clone()
    }

    fn serialize(&self, value: &CqlValue) -> Result<Vec<u8>> {
        self.encode(&self.data_type, value)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<CqlValue>> {
        self.decode(&self.data_type, bytes)
    }

    fn parse(&self, literal: &str) -> Result<Option<CqlValue>> {
        self.parse_value(&self.data_type, literal)
    }

    fn format(&self, value: Option<&CqlValue>) -> Result<String> {
        self.format_optional(&self.data_type, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqlkit_diagnostics::{CQL0200, CQL0201, CQL0203};
    use cqlkit_types::Field;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn address() -> DataType {
        UserType::new(
            "ks",
            "address",
            vec![
                Field::new("street", DataType::text()),
                Field::new("zip", DataType::int()),
                Field::new("Tags", DataType::frozen_set(DataType::text())),
            ],
            true,
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_list_wire_format_per_version() {
        let list = DataType::list(DataType::int());
        let value = CqlValue::List(vec![1.into(), 2.into()]);

        let v2 = ValueCodec::with_protocol_version(list.clone(), ProtocolVersion::V2);
        let bytes = v2.serialize(&value).unwrap();
        assert_eq!(bytes, vec![0, 2, 0, 4, 0, 0, 0, 1, 0, 4, 0, 0, 0, 2]);
        assert_eq!(v2.deserialize(Some(&bytes)).unwrap(), Some(value.clone()));

        let v4 = ValueCodec::new(list);
        let bytes = v4.serialize(&value).unwrap();
        assert_eq!(bytes.len(), 4 + 2 * (4 + 4));
        assert_eq!(v4.deserialize(Some(&bytes)).unwrap(), Some(value));
    }

    #[test]
    fn test_empty_and_absent_collections() {
        let codec = ValueCodec::new(DataType::map(DataType::text(), DataType::int()));
        assert_eq!(codec.deserialize(Some(&[])).unwrap(), Some(CqlValue::Map(Vec::new())));
        assert_eq!(codec.deserialize(None).unwrap(), None);
    }

    #[test]
    fn test_null_collection_element_is_rejected() {
        let codec = ValueCodec::new(DataType::list(DataType::int()));
        let bytes = [0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(codec.deserialize(Some(&bytes)).unwrap_err().code(), CQL0204);
        assert_eq!(codec.parse("[1, NULL]").unwrap_err().code(), CQL0204);
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let codec = ValueCodec::new(DataType::set(DataType::tinyint()));
        let bytes = [0, 0, 0, 1, 0, 0, 0, 1, 7, 9];
        assert_eq!(codec.deserialize(Some(&bytes)).unwrap_err().code(), CQL0201);
    }

    #[test]
    fn test_tuple_requires_v3() {
        let tuple = DataType::tuple(vec![DataType::int(), DataType::text()]);
        let value = CqlValue::Tuple(vec![Some(1.into()), None]);

        let v2 = ValueCodec::with_protocol_version(tuple.clone(), ProtocolVersion::V2);
        assert_eq!(v2.serialize(&value).unwrap_err().code(), CQL0205);

        let v3 = ValueCodec::with_protocol_version(tuple, ProtocolVersion::V3);
        let bytes = v3.serialize(&value).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 4, 0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(v3.deserialize(Some(&bytes)).unwrap(), Some(value));
    }

    #[test]
    fn test_user_type_round_trip() {
        let codec = ValueCodec::new(address());
        let value = CqlValue::user_defined(
            "ks",
            "address",
            [
                ("street", Some("Main St".into())),
                ("zip", None),
                ("Tags", Some(CqlValue::Set(vec!["home".into()]))),
            ],
        );
        let bytes = codec.serialize(&value).unwrap();
        assert_eq!(codec.deserialize(Some(&bytes)).unwrap(), Some(value.clone()));

        let literal = codec.format(Some(&value)).unwrap();
        assert_eq!(literal, "{street:'Main St',zip:NULL,\"Tags\":{'home'}}");
        assert_eq!(codec.parse(&literal).unwrap(), Some(value));
    }

    #[test]
    fn test_user_type_short_value_fills_nulls() {
        let codec = ValueCodec::new(address());
        let bytes = [0, 0, 0, 1, b'x'];
        let decoded = codec.deserialize(Some(&bytes)).unwrap().unwrap();
        assert_eq!(decoded.field("street"), Some(&CqlValue::text("x")));
        assert_eq!(decoded.field("zip"), None);
    }

    #[test]
    fn test_user_type_unknown_field() {
        let codec = ValueCodec::new(address());
        let value = CqlValue::user_defined("ks", "address", [("city", Some("Paris".into()))]);
        assert_eq!(codec.serialize(&value).unwrap_err().code(), CQL0104);
        assert_eq!(codec.parse("{city: 'Paris'}").unwrap_err().code(), CQL0104);

        let other = CqlValue::user_defined("ks", "phone", Vec::<(String, _)>::new());
        assert_eq!(codec.serialize(&other).unwrap_err().code(), CQL0200);
    }

    #[rstest]
    #[case(DataType::list(DataType::text()), "['a', 'b''c']", "['a','b''c']")]
    #[case(DataType::set(DataType::int()), "{ }", "{}")]
    #[case(DataType::map(DataType::text(), DataType::list(DataType::int())), "{'k' : [1, 2]}", "{'k':[1,2]}")]
    #[case(DataType::tuple(vec![DataType::int(), DataType::blob()]), "(1, NULL)", "(1,NULL)")]
    #[case(DataType::list(DataType::uuid()), "[fe2b4360-28c6-11e2-81c1-0800200c9a66]", "[fe2b4360-28c6-11e2-81c1-0800200c9a66]")]
    fn test_literals(#[case] data_type: DataType, #[case] literal: &str, #[case] formatted: &str) {
        let codec = ValueCodec::new(data_type);
        let value = codec.parse(literal).unwrap();
        assert_eq!(codec.format(value.as_ref()).unwrap(), formatted);
    }

    #[rstest]
    #[case(DataType::list(DataType::int()), "[1 2]")]
    #[case(DataType::list(DataType::int()), "{1}")]
    #[case(DataType::map(DataType::int(), DataType::int()), "{1 2}")]
    #[case(DataType::tuple(vec![DataType::int()]), "(1, 2)")]
    #[case(DataType::tuple(vec![DataType::int(), DataType::int()]), "(1)")]
    fn test_malformed_literals(#[case] data_type: DataType, #[case] literal: &str) {
        let codec = ValueCodec::new(data_type);
        assert_eq!(codec.parse(literal).unwrap_err().code(), CQL0203);
    }

    #[test]
    fn test_type_mismatch() {
        let codec = ValueCodec::new(DataType::int());
        assert_eq!(codec.serialize(&CqlValue::text("1")).unwrap_err().code(), CQL0200);
        let codec = ValueCodec::new(DataType::list(DataType::int()));
        assert_eq!(
            codec.serialize(&CqlValue::Set(Vec::new())).unwrap_err().code(),
            CQL0200
        );
    }
}
