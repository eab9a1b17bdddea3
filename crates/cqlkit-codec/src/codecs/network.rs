//! Address and identifier codecs

use super::{NULL, invalid_value};
use crate::TypeCodec;
use crate::literal::{is_null, is_quoted, malformed, quote, unquote};
use crate::wire::fixed;
use cqlkit_diagnostics::{CQL0201, CqlError, Result};
use cqlkit_types::{DataType, NativeType};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// `inet` as `std::net::IpAddr`
#[derive(Debug, Clone, Copy, Default)]
pub struct InetCodec;

impl TypeCodec<IpAddr> for InetCodec {
    fn cql_type(&self) -> DataType {
        DataType::inet()
    }

    fn serialize(&self, value: &IpAddr) -> Result<Vec<u8>> {
        Ok(match value {
            IpAddr::V4(addr) => addr.octets().to_vec(),
            IpAddr::V6(addr) => addr.octets().to_vec(),
        })
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<IpAddr>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => match bytes.len() {
                4 => Ok(Some(Ipv4Addr::from(fixed::<4>(bytes, NativeType::Inet)?).into())),
                16 => Ok(Some(Ipv6Addr::from(fixed::<16>(bytes, NativeType::Inet)?).into())),
                len => Err(CqlError::invalid_type(
                    CQL0201,
                    format!("invalid inet value, expecting 4 or 16 bytes but got {len}"),
                )),
            },
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<IpAddr>> {
        if is_null(literal) {
            return Ok(None);
        }
        let trimmed = literal.trim();
        if !is_quoted(trimmed) {
            return Err(malformed(literal, "inet values must be enclosed in single quotes"));
        }
        unquote(trimmed)
            .trim()
            .parse::<IpAddr>()
            .map(Some)
            .map_err(|e| malformed(literal, format!("invalid inet value: {e}")))
    }

    fn format(&self, value: Option<&IpAddr>) -> Result<String> {
        Ok(value.map_or_else(|| NULL.to_string(), |addr| quote(&addr.to_string())))
    }
}

/// `uuid` and `timeuuid` as `uuid::Uuid`
///
/// The `timeuuid` codec only accepts version 1 (time-based) identifiers.
#[derive(Debug, Clone, Copy)]
pub struct UuidCodec {
    native: NativeType,
}

impl UuidCodec {
    pub const UUID: Self = Self {
        native: NativeType::Uuid,
    };
    pub const TIMEUUID: Self = Self {
        native: NativeType::TimeUuid,
    };

    fn check(&self, value: Uuid) -> Result<Uuid> {
        if self.native == NativeType::TimeUuid && value.get_version_num() != 1 {
            return Err(invalid_value(format!(
                "{value} is not a time-based uuid (version {})",
                value.get_version_num()
            )));
        }
        Ok(value)
    }
}

impl TypeCodec<Uuid> for UuidCodec {
    fn cql_type(&self) -> DataType {
        self.native.into()
    }

    fn serialize(&self, value: &Uuid) -> Result<Vec<u8>> {
        Ok(self.check(*value)?.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<Uuid>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => self
                .check(Uuid::from_bytes(fixed(bytes, self.native)?))
                .map(Some),
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<Uuid>> {
        if is_null(literal) {
            return Ok(None);
        }
        let value = unquote(literal.trim());
        let parsed = Uuid::parse_str(value.trim())
            .map_err(|e| malformed(literal, format!("invalid {} value: {e}", self.native)))?;
        self.check(parsed).map(Some)
    }

    fn format(&self, value: Option<&Uuid>) -> Result<String> {
        match value {
            None => Ok(NULL.to_string()),
            Some(value) => Ok(self.check(*value)?.hyphenated().to_string()),
        }
    }
}
