//! `date` as a signed day offset

use crate::TypeCodec;
use crate::codecs::{NULL, cql_date_to_days, days_to_cql_date, parse_date_literal};
use crate::literal::quote;
use crate::wire::fixed;
use cqlkit_diagnostics::Result;
use cqlkit_types::{DataType, NativeType};

/// `date` as an `i32` count of days since 1970-01-01
///
/// Covers the full range of the wire format, including dates chrono cannot
/// represent. Literals are written as the raw unsigned wire value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateIntCodec;

impl TypeCodec<i32> for DateIntCodec {
    fn cql_type(&self) -> DataType {
        DataType::date()
    }

    fn serialize(&self, value: &i32) -> Result<Vec<u8>> {
        Ok(days_to_cql_date(*value).to_be_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<i32>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => {
                let raw = u32::from_be_bytes(fixed(bytes, NativeType::Date)?);
                cql_date_to_days(i64::from(raw)).map(Some)
            }
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<i32>> {
        parse_date_literal(literal)
    }

    fn format(&self, value: Option<&i32>) -> Result<String> {
        Ok(value.map_or_else(
            || NULL.to_string(),
            |days| quote(&days_to_cql_date(*days).to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqlkit_diagnostics::{CQL0201, CQL0202};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", i32::MIN)]
    #[case("'2147483648'", 0)]
    #[case("4294967295", i32::MAX)]
    #[case("'1970-01-01'", 0)]
    #[case("'2014-01-01'", 16071)]
    #[case("'1969-12-31'", -1)]
    fn test_literals(#[case] literal: &str, #[case] days: i32) {
        assert_eq!(DateIntCodec.parse(literal).unwrap(), Some(days));
    }

    #[test]
    fn test_format() {
        assert_eq!(DateIntCodec.format(Some(&0)).unwrap(), "'2147483648'");
        assert_eq!(DateIntCodec.format(Some(&i32::MIN)).unwrap(), "'0'");
        assert_eq!(DateIntCodec.format(None).unwrap(), "NULL");
        assert_eq!(DateIntCodec.parse("NULL").unwrap(), None);
    }

    #[test]
    fn test_wire_covers_full_range() {
        assert_eq!(DateIntCodec.serialize(&i32::MIN).unwrap(), vec![0, 0, 0, 0]);
        assert_eq!(DateIntCodec.serialize(&-1).unwrap(), vec![0x7f, 0xff, 0xff, 0xff]);
        assert_eq!(
            DateIntCodec.deserialize(Some(&[0xff, 0xff, 0xff, 0xff])).unwrap(),
            Some(i32::MAX)
        );
        assert_eq!(DateIntCodec.deserialize(Some(&[])).unwrap(), None);
        assert_eq!(DateIntCodec.deserialize(Some(&[0; 8])).unwrap_err().code(), CQL0201);
        assert_eq!(DateIntCodec.parse("-1").unwrap_err().code(), CQL0202);
    }

    proptest! {
        #[test]
        fn date_int_round_trips(days in any::<i32>()) {
            let bytes = DateIntCodec.serialize(&days).unwrap();
            prop_assert_eq!(DateIntCodec.deserialize(Some(&bytes)).unwrap(), Some(days));
            let literal = DateIntCodec.format(Some(&days)).unwrap();
            prop_assert_eq!(DateIntCodec.parse(&literal).unwrap(), Some(days));
        }
    }
}
