//! Integer, floating point and boolean codecs

use super::NULL;
use crate::TypeCodec;
use crate::literal::{is_null, malformed};
use crate::wire::fixed;
use cqlkit_diagnostics::Result;
use cqlkit_types::{DataType, NativeType};

macro_rules! integer_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $native:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl TypeCodec<$ty> for $name {
            fn cql_type(&self) -> DataType {
                NativeType::$native.into()
            }

            fn serialize(&self, value: &$ty) -> Result<Vec<u8>> {
                Ok(value.to_be_bytes().to_vec())
            }

            fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<$ty>> {
                match bytes {
                    None | Some([]) => Ok(None),
                    Some(bytes) => Ok(Some(<$ty>::from_be_bytes(fixed(
                        bytes,
                        NativeType::$native,
                    )?))),
                }
            }

            fn parse(&self, literal: &str) -> Result<Option<$ty>> {
                if is_null(literal) {
                    return Ok(None);
                }
                literal.trim().parse::<$ty>().map(Some).map_err(|e| {
                    malformed(literal, format!("invalid {} value: {e}", NativeType::$native))
                })
            }

            fn format(&self, value: Option<&$ty>) -> Result<String> {
                Ok(value.map_or_else(|| NULL.to_string(), ToString::to_string))
            }
        }
    };
}

integer_codec!(
    /// `tinyint` as `i8`
    TinyIntCodec,
    i8,
    TinyInt
);
integer_codec!(
    /// `smallint` as `i16`
    SmallIntCodec,
    i16,
    SmallInt
);
integer_codec!(
    /// `int` as `i32`
    IntCodec,
    i32,
    Int
);

/// `bigint` and `counter` as `i64`
#[derive(Debug, Clone, Copy)]
pub struct LongCodec {
    native: NativeType,
}

impl LongCodec {
    pub const BIGINT: Self = Self {
        native: NativeType::BigInt,
    };
    pub const COUNTER: Self = Self {
        native: NativeType::Counter,
    };
}

impl TypeCodec<i64> for LongCodec {
    fn cql_type(&self) -> DataType {
        self.native.into()
    }

    fn serialize(&self, value: &i64) -> Result<Vec<u8>> {
        Ok(value.to_be_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<i64>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => Ok(Some(i64::from_be_bytes(fixed(bytes, self.native)?))),
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<i64>> {
        if is_null(literal) {
            return Ok(None);
        }
        literal
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| malformed(literal, format!("invalid {} value: {e}", self.native)))
    }

    fn format(&self, value: Option<&i64>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), ToString::to_string))
    }
}

macro_rules! float_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $native:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl TypeCodec<$ty> for $name {
            fn cql_type(&self) -> DataType {
                NativeType::$native.into()
            }

            fn serialize(&self, value: &$ty) -> Result<Vec<u8>> {
                Ok(value.to_be_bytes().to_vec())
            }

            fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<$ty>> {
                match bytes {
                    None | Some([]) => Ok(None),
                    Some(bytes) => Ok(Some(<$ty>::from_be_bytes(fixed(
                        bytes,
                        NativeType::$native,
                    )?))),
                }
            }

            fn parse(&self, literal: &str) -> Result<Option<$ty>> {
                if is_null(literal) {
                    return Ok(None);
                }
                match literal.trim() {
                    "NaN" => Ok(Some(<$ty>::NAN)),
                    "Infinity" => Ok(Some(<$ty>::INFINITY)),
                    "-Infinity" => Ok(Some(<$ty>::NEG_INFINITY)),
                    other => other.parse::<$ty>().map(Some).map_err(|e| {
                        malformed(literal, format!("invalid {} value: {e}", NativeType::$native))
                    }),
                }
            }

            fn format(&self, value: Option<&$ty>) -> Result<String> {
                Ok(match value {
                    None => NULL.to_string(),
                    Some(v) if v.is_nan() => "NaN".to_string(),
                    Some(v) if *v == <$ty>::INFINITY => "Infinity".to_string(),
                    Some(v) if *v == <$ty>::NEG_INFINITY => "-Infinity".to_string(),
                    Some(v) => format!("{v:?}"),
                })
            }
        }
    };
}

float_codec!(
    /// `float` as `f32`
    FloatCodec,
    f32,
    Float
);
float_codec!(
    /// `double` as `f64`
    DoubleCodec,
    f64,
    Double
);

/// `boolean` as `bool`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanCodec;

impl TypeCodec<bool> for BooleanCodec {
    fn cql_type(&self) -> DataType {
        DataType::boolean()
    }

    fn serialize(&self, value: &bool) -> Result<Vec<u8>> {
        Ok(vec![u8::from(*value)])
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<bool>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => {
                let [byte] = fixed::<1>(bytes, NativeType::Boolean)?;
                Ok(Some(byte != 0))
            }
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<bool>> {
        if is_null(literal) {
            return Ok(None);
        }
        match literal.trim() {
            value if value.eq_ignore_ascii_case("true") => Ok(Some(true)),
            value if value.eq_ignore_ascii_case("false") => Ok(Some(false)),
            _ => Err(malformed(literal, "boolean values are true or false")),
        }
    }

    fn format(&self, value: Option<&bool>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), ToString::to_string))
    }
}
