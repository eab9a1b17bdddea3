//! Codec registry
//!
//! Selects the codec for a `(DataType, Rust representation)` pair. User
//! codecs take precedence over built-ins; `CqlValue` is served for every
//! type by [`ValueCodec`].

use crate::codecs::{
    BlobCodec, BooleanCodec, DateCodec, DecimalCodec, DoubleCodec, FloatCodec, InetCodec,
    IntCodec, LongCodec, SmallIntCodec, StringCodec, TimeCodec, TimestampCodec, TinyIntCodec,
    UuidCodec, VarintCodec,
};
use crate::{CqlValue, ProtocolVersion, TypeCodec, ValueCodec};
use chrono::{DateTime, NaiveDate, Utc};
use cqlkit_diagnostics::{CqlError, Result};
use cqlkit_types::{DataType, NativeType};
use log::warn;
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

/// An `Arc<dyn TypeCodec<T>>` with `T` erased
type ErasedCodec = Arc<dyn Any + Send + Sync>;

fn erase<T: 'static>(codec: Arc<dyn TypeCodec<T>>) -> ErasedCodec {
    Arc::new(codec)
}

fn restore<T: 'static>(codec: &ErasedCodec) -> Option<Arc<dyn TypeCodec<T>>> {
    codec.downcast_ref::<Arc<dyn TypeCodec<T>>>().cloned()
}

fn builtin<T: 'static>(native: NativeType, codec: impl TypeCodec<T> + 'static) -> ((NativeType, TypeId), ErasedCodec) {
    ((native, TypeId::of::<T>()), erase::<T>(Arc::new(codec)))
}

/// Codecs for the default representation of every native type
static BUILTIN_CODECS: Lazy<HashMap<(NativeType, TypeId), ErasedCodec>> = Lazy::new(|| {
    HashMap::from([
        builtin::<String>(NativeType::Ascii, StringCodec::ASCII),
        builtin::<i64>(NativeType::BigInt, LongCodec::BIGINT),
        builtin::<Vec<u8>>(NativeType::Blob, BlobCodec),
        builtin::<bool>(NativeType::Boolean, BooleanCodec),
        builtin::<i64>(NativeType::Counter, LongCodec::COUNTER),
        builtin::<Decimal>(NativeType::Decimal, DecimalCodec),
        builtin::<f64>(NativeType::Double, DoubleCodec),
        builtin::<f32>(NativeType::Float, FloatCodec),
        builtin::<IpAddr>(NativeType::Inet, InetCodec),
        builtin::<i32>(NativeType::Int, IntCodec),
        builtin::<String>(NativeType::Text, StringCodec::TEXT),
        builtin::<String>(NativeType::Varchar, StringCodec::VARCHAR),
        builtin::<DateTime<Utc>>(NativeType::Timestamp, TimestampCodec),
        builtin::<NaiveDate>(NativeType::Date, DateCodec),
        builtin::<i64>(NativeType::Time, TimeCodec),
        builtin::<Uuid>(NativeType::Uuid, UuidCodec::UUID),
        builtin::<BigInt>(NativeType::Varint, VarintCodec),
        builtin::<Uuid>(NativeType::TimeUuid, UuidCodec::TIMEUUID),
        builtin::<i8>(NativeType::TinyInt, TinyIntCodec),
        builtin::<i16>(NativeType::SmallInt, SmallIntCodec),
    ])
});

/// Result of [`CodecRegistry::lookup`]
pub enum CodecLookup<T> {
    /// A codec producing the requested representation
    Specific(Arc<dyn TypeCodec<T>>),
    /// No codec for the representation; values go through `CqlValue`
    Default(ValueCodec),
}

impl<T> CodecLookup<T> {
    /// Check if a codec for the requested representation was found
    pub fn is_specific(&self) -> bool {
        matches!(self, Self::Specific(_))
    }
}

/// Codec registry for one protocol version
///
/// # Example
///
/// ```
/// use cqlkit_codec::{CodecRegistry, DateIntCodec, TypeCodec};
/// use cqlkit_types::DataType;
///
/// let registry = CodecRegistry::new();
/// registry.register::<i32>(DateIntCodec);
///
/// let codec = registry.codec_for::<i32>(&DataType::date()).unwrap();
/// assert_eq!(codec.parse("'1970-01-01'").unwrap(), Some(0));
/// ```
pub struct CodecRegistry {
    version: ProtocolVersion,
    user: RwLock<HashMap<TypeId, Vec<(DataType, ErasedCodec)>>>,
}

impl CodecRegistry {
    /// Create a registry for the default protocol version
    pub fn new() -> Self {
        Self::with_protocol_version(ProtocolVersion::default())
    }

    /// Create a registry whose composite codecs frame values for `version`
    pub fn with_protocol_version(version: ProtocolVersion) -> Self {
        Self {
            version,
            user: RwLock::new(HashMap::new()),
        }
    }

    /// Get the protocol version
    pub fn protocol_version(&self) -> ProtocolVersion {
        self.version
    }

    /// Register a user codec for its CQL type and representation `T`.
    ///
    /// A codec already registered for the same pair is kept and the new one
    /// is ignored.
    pub fn register<T: 'static>(&self, codec: impl TypeCodec<T> + 'static) {
        let cql_type = codec.cql_type();
        let mut user = self.user.write();
        let codecs = user.entry(TypeId::of::<T>()).or_default();
        if codecs.iter().any(|(registered, _)| *registered == cql_type) {
            warn!(
                "a codec for {cql_type} <-> {} is already registered; ignoring the new one",
                type_name::<T>()
            );
            return;
        }
        codecs.push((cql_type, erase::<T>(Arc::new(codec))));
    }

    /// Get the codec converting `data_type` values to and from `T`.
    ///
    /// User codecs are consulted first, then the built-in codecs. `CqlValue`
    /// is available for every type.
    pub fn codec_for<T: 'static>(&self, data_type: &DataType) -> Result<Arc<dyn TypeCodec<T>>> {
        if let Some(codec) = self.user_codec::<T>(data_type) {
            return Ok(codec);
        }

        if let Some(native) = data_type.native_type() {
            if let Some(codec) = BUILTIN_CODECS
                .get(&(native, TypeId::of::<T>()))
                .and_then(restore::<T>)
            {
                return Ok(codec);
            }
        }

        if TypeId::of::<T>() == TypeId::of::<CqlValue>() {
            let codec: Arc<dyn TypeCodec<CqlValue>> = Arc::new(self.value_codec(data_type));
            if let Some(codec) = restore::<T>(&erase(codec)) {
                return Ok(codec);
            }
        }

        Err(CqlError::codec_not_found(
            data_type.to_string(),
            type_name::<T>(),
        ))
    }

    /// Get the codec for `T`, or the `CqlValue` codec when there is none
    pub fn lookup<T: 'static>(&self, data_type: &DataType) -> CodecLookup<T> {
        match self.codec_for::<T>(data_type) {
            Ok(codec) => CodecLookup::Specific(codec),
            Err(_) => CodecLookup::Default(self.value_codec(data_type)),
        }
    }

    /// Get the `CqlValue` codec for `data_type` at this registry's protocol version
    pub fn value_codec(&self, data_type: &DataType) -> ValueCodec {
        ValueCodec::with_protocol_version(data_type.clone(), self.version)
    }

    fn user_codec<T: 'static>(&self, data_type: &DataType) -> Option<Arc<dyn TypeCodec<T>>> {
        let user = self.user.read();
        user.get(&TypeId::of::<T>())?
            .iter()
            .find(|(registered, _)| registered == data_type)
            .and_then(|(_, codec)| restore::<T>(codec))
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateIntCodec;
    use cqlkit_diagnostics::{CQL0205, CQL0300};
    use pretty_assertions::assert_eq;

    /// Text as its length, to check precedence over built-ins
    struct TextLengthCodec;

    impl TypeCodec<String> for TextLengthCodec {
        fn cql_type(&self) -> DataType {
            DataType::text()
        }

        fn serialize(&self, value: &String) -> Result<Vec<u8>> {
            Ok(value.len().to_string().into_bytes())
        }

        fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<String>> {
            Ok(bytes.map(|bytes| bytes.len().to_string()))
        }

        fn parse(&self, literal: &str) -> Result<Option<String>> {
            Ok(Some(literal.len().to_string()))
        }

        fn format(&self, value: Option<&String>) -> Result<String> {
            Ok(value.cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_builtin_codecs() {
        let registry = CodecRegistry::new();
        let codec = registry.codec_for::<i64>(&DataType::counter()).unwrap();
        assert_eq!(codec.cql_type(), DataType::counter());
        assert_eq!(codec.serialize(&1).unwrap(), vec![0, 0, 0, 0, 0, 0, 0, 1]);

        let codec = registry.codec_for::<i64>(&DataType::time()).unwrap();
        assert_eq!(codec.cql_type(), DataType::time());

        for native in NativeType::ALL {
            let codec = registry.codec_for::<CqlValue>(&native.into()).unwrap();
            assert_eq!(codec.cql_type(), DataType::from(native));
        }
    }

    #[test]
    fn test_missing_representation() {
        let registry = CodecRegistry::new();
        let err = registry.codec_for::<i32>(&DataType::date()).err().unwrap();
        assert_eq!(err.code(), CQL0300);
        assert!(err.to_string().contains("date"));

        let lookup = registry.lookup::<String>(&DataType::list(DataType::int()));
        assert!(!lookup.is_specific());
    }

    #[test]
    fn test_user_codecs_take_precedence() {
        let registry = CodecRegistry::new();
        registry.register::<String>(TextLengthCodec);
        registry.register::<i32>(DateIntCodec);

        let text = registry.codec_for::<String>(&DataType::text()).unwrap();
        assert_eq!(text.serialize(&"abcd".to_string()).unwrap(), b"4".to_vec());
        let varchar = registry.codec_for::<String>(&DataType::varchar()).unwrap();
        assert_eq!(varchar.serialize(&"abcd".to_string()).unwrap(), b"abcd".to_vec());

        let date = registry.codec_for::<i32>(&DataType::date()).unwrap();
        assert_eq!(date.format(Some(&0)).unwrap(), "'2147483648'");
        assert!(registry.lookup::<i32>(&DataType::date()).is_specific());
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = CodecRegistry::new();
        registry.register::<String>(TextLengthCodec);
        registry.register::<String>(StringCodec::TEXT);
        let text = registry.codec_for::<String>(&DataType::text()).unwrap();
        assert_eq!(text.parse("'abc'").unwrap(), Some("5".to_string()));
    }

    #[test]
    fn test_value_codec_uses_registry_version() {
        let registry = CodecRegistry::with_protocol_version(ProtocolVersion::V2);
        let tuple = DataType::tuple(vec![DataType::int()]);
        let codec = registry.codec_for::<CqlValue>(&tuple).unwrap();
        let err = codec.serialize(&CqlValue::Tuple(vec![None])).unwrap_err();
        assert_eq!(err.code(), CQL0205);
        assert_eq!(registry.value_codec(&tuple).protocol_version(), ProtocolVersion::V2);
    }
}
