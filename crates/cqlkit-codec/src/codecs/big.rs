//! Arbitrary precision codecs

use super::NULL;
use crate::TypeCodec;
use crate::literal::{is_null, malformed};
use crate::wire::fixed;
use cqlkit_diagnostics::{CQL0201, CQL0202, CqlError, Result};
use cqlkit_types::{DataType, NativeType};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest power of ten that keeps a rescaled mantissa within `i128`
const MAX_RESCALE: u32 = 38;

/// `decimal` as `rust_decimal::Decimal`
///
/// On the wire a decimal is a 4-byte scale followed by the unscaled value
/// as a two's complement varint. Values whose scale or mantissa exceed what
/// `Decimal` can hold (28 digits of scale, 96 bits of mantissa) are rejected
/// when decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalCodec;

impl TypeCodec<Decimal> for DecimalCodec {
    fn cql_type(&self) -> DataType {
        DataType::decimal()
    }

    fn serialize(&self, value: &Decimal) -> Result<Vec<u8>> {
        let scale = i32::try_from(value.scale()).map_err(|_| out_of_range(value))?;
        let mut bytes = scale.to_be_bytes().to_vec();
        bytes.extend(BigInt::from(value.mantissa()).to_signed_bytes_be());
        Ok(bytes)
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<Decimal>> {
        let bytes = match bytes {
            None | Some([]) => return Ok(None),
            Some(bytes) if bytes.len() < 5 => {
                return Err(CqlError::invalid_type(
                    CQL0201,
                    format!(
                        "invalid decimal value, expecting at least 5 bytes but got {}",
                        bytes.len()
                    ),
                ));
            }
            Some(bytes) => bytes,
        };
        let (scale, unscaled) = bytes.split_at(4);
        let scale = i32::from_be_bytes(fixed(scale, NativeType::Decimal)?);
        decimal_from_parts(BigInt::from_signed_bytes_be(unscaled), scale).map(Some)
    }

    fn parse(&self, literal: &str) -> Result<Option<Decimal>> {
        if is_null(literal) {
            return Ok(None);
        }
        let value = literal.trim();
        let parsed = if value.contains(['e', 'E']) {
            Decimal::from_scientific(value)
        } else {
            Decimal::from_str_exact(value)
        };
        parsed
            .map(Some)
            .map_err(|e| malformed(literal, format!("invalid decimal value: {e}")))
    }

    fn format(&self, value: Option<&Decimal>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), ToString::to_string))
    }
}

fn decimal_from_parts(unscaled: BigInt, scale: i32) -> Result<Decimal> {
    let (mantissa, scale) = if scale < 0 {
        let exponent = scale.unsigned_abs();
        if exponent > MAX_RESCALE {
            return Err(decimal_range_error(&unscaled, scale));
        }
        (unscaled * BigInt::from(10).pow(exponent), 0)
    } else {
        (unscaled, scale.unsigned_abs())
    };

    i128::try_from(&mantissa)
        .ok()
        .and_then(|m| Decimal::try_from_i128_with_scale(m, scale).ok())
        .ok_or_else(|| decimal_range_error(&mantissa, -i64::from(scale)))
}

fn decimal_range_error(unscaled: &BigInt, scale: impl std::fmt::Display) -> CqlError {
    CqlError::invalid_type(
        CQL0202,
        format!("decimal {unscaled}E{scale} is out of range"),
    )
}

fn out_of_range(value: &Decimal) -> CqlError {
    CqlError::invalid_type(CQL0202, format!("decimal {value} is out of range"))
}

/// `varint` as `num_bigint::BigInt`
#[derive(Debug, Clone, Copy, Default)]
pub struct VarintCodec;

impl TypeCodec<BigInt> for VarintCodec {
    fn cql_type(&self) -> DataType {
        DataType::varint()
    }

    fn serialize(&self, value: &BigInt) -> Result<Vec<u8>> {
        Ok(value.to_signed_bytes_be())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<BigInt>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => Ok(Some(BigInt::from_signed_bytes_be(bytes))),
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<BigInt>> {
        if is_null(literal) {
            return Ok(None);
        }
        BigInt::from_str(literal.trim())
            .map(Some)
            .map_err(|e| malformed(literal, format!("invalid varint value: {e}")))
    }

    fn format(&self, value: Option<&BigInt>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), ToString::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqlkit_diagnostics::CQL0203;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_decimal_wire_format() {
        let value = Decimal::from_str("-1.50").unwrap();
        let bytes = DecimalCodec.serialize(&value).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 2, 0xff, 0x6a]);
        assert_eq!(DecimalCodec.deserialize(Some(&bytes)).unwrap(), Some(value));
        assert_eq!(DecimalCodec.format(Some(&value)).unwrap(), "-1.50");
    }

    #[test]
    fn test_decimal_negative_scale_is_rescaled() {
        // 12E+3
        let decoded = DecimalCodec
            .deserialize(Some(&[0xff, 0xff, 0xff, 0xfd, 12]))
            .unwrap()
            .unwrap();
        assert_eq!(decoded, Decimal::from(12_000));
    }

    #[test]
    fn test_decimal_out_of_range() {
        let err = DecimalCodec
            .deserialize(Some(&[0, 0, 0, 40, 1]))
            .unwrap_err();
        assert_eq!(err.code(), CQL0202);
        assert_eq!(DecimalCodec.deserialize(Some(&[0, 0])).unwrap_err().code(), CQL0201);
    }

    #[rstest]
    #[case("1.5", Decimal::new(15, 1))]
    #[case("1.2E3", Decimal::from(1200))]
    #[case("-0.001", Decimal::new(-1, 3))]
    fn test_decimal_literals(#[case] literal: &str, #[case] expected: Decimal) {
        assert_eq!(DecimalCodec.parse(literal).unwrap(), Some(expected));
        assert_eq!(DecimalCodec.parse("1.5.1").unwrap_err().code(), CQL0203);
    }

    #[test]
    fn test_varint() {
        let value = BigInt::from_str("-129").unwrap();
        assert_eq!(VarintCodec.serialize(&value).unwrap(), vec![0xff, 0x7f]);
        assert_eq!(VarintCodec.deserialize(Some(&[0x00, 0x80])).unwrap(), Some(BigInt::from(128)));
        assert_eq!(VarintCodec.parse("12x").unwrap_err().code(), CQL0203);
    }

    proptest! {
        #[test]
        fn decimal_round_trips(mantissa in any::<i64>(), scale in 0u32..=18) {
            let value = Decimal::new(mantissa, scale);
            let bytes = DecimalCodec.serialize(&value).unwrap();
            prop_assert_eq!(DecimalCodec.deserialize(Some(&bytes)).unwrap(), Some(value));
            let literal = DecimalCodec.format(Some(&value)).unwrap();
            prop_assert_eq!(DecimalCodec.parse(&literal).unwrap(), Some(value));
        }

        #[test]
        fn varint_round_trips(magnitude in prop::collection::vec(any::<u8>(), 1..32)) {
            let value = BigInt::from_signed_bytes_be(&magnitude);
            let bytes = VarintCodec.serialize(&value).unwrap();
            prop_assert_eq!(VarintCodec.deserialize(Some(&bytes)).unwrap(), Some(value.clone()));
            let literal = VarintCodec.format(Some(&value)).unwrap();
            prop_assert_eq!(VarintCodec.parse(&literal).unwrap(), Some(value));
        }
    }
}
