//! Date and time codecs
//!
//! `date` values travel as an unsigned 32-bit day count where `2^31` is
//! 1970-01-01, so day 0 is the earliest representable date. Calendar dates
//! outside chrono's range cannot be decoded to `NaiveDate`; use
//! [`crate::DateIntCodec`] to work with the raw day offset instead.

use super::NULL;
use crate::TypeCodec;
use crate::literal::{is_long_literal, is_null, is_quoted, malformed, quote, unquote};
use crate::wire::fixed;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use cqlkit_diagnostics::{CQL0202, CqlError, Result};
use cqlkit_types::{DataType, NativeType};

/// Wire value of 1970-01-01
const EPOCH_OFFSET: i64 = 1 << 31;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;

const DATE_PATTERN: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

const ZONED_PATTERNS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const LOCAL_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Convert an unsigned wire date to a signed day offset from the epoch
pub fn cql_date_to_days(raw: i64) -> Result<i32> {
    if !(0..=i64::from(u32::MAX)).contains(&raw) {
        return Err(CqlError::invalid_type(
            CQL0202,
            format!("date value {raw} is outside the unsigned 32-bit range"),
        ));
    }
    i32::try_from(raw - EPOCH_OFFSET)
        .map_err(|_| CqlError::invalid_type(CQL0202, format!("date value {raw} is out of range")))
}

/// Convert a signed day offset from the epoch to its unsigned wire form
pub fn days_to_cql_date(days: i32) -> u32 {
    // i32 + 2^31 always fits u32
    u32::try_from(i64::from(days) + EPOCH_OFFSET).unwrap_or(u32::MAX)
}

fn epoch() -> NaiveDate {
    DateTime::UNIX_EPOCH.date_naive()
}

fn date_from_days(days: i32) -> Result<NaiveDate> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|delta| epoch().checked_add_signed(delta))
        .ok_or_else(|| {
            CqlError::invalid_type(
                CQL0202,
                format!("day {days} relative to 1970-01-01 is outside the supported date range"),
            )
        })
}

fn days_from_date(date: NaiveDate) -> Result<i32> {
    let days = date.signed_duration_since(epoch()).num_days();
    i32::try_from(days)
        .map_err(|_| CqlError::invalid_type(CQL0202, format!("date {date} is out of range")))
}

/// Strip optional single quotes; they are mandatory only for patterns
fn strip_quotes(literal: &str) -> String {
    let trimmed = literal.trim();
    if is_quoted(trimmed) {
        unquote(trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Days since the epoch from a date literal: raw wire value or `yyyy-mm-dd`
pub fn parse_date_literal(literal: &str) -> Result<Option<i32>> {
    if is_null(literal) {
        return Ok(None);
    }
    let value = strip_quotes(literal);
    if is_long_literal(&value) {
        let raw = value
            .parse::<i64>()
            .map_err(|e| malformed(literal, format!("invalid date value: {e}")))?;
        return cql_date_to_days(raw).map(Some);
    }
    let date = NaiveDate::parse_from_str(&value, DATE_PATTERN)
        .map_err(|e| malformed(literal, format!("invalid date value: {e}")))?;
    days_from_date(date).map(Some)
}

/// `date` as `chrono::NaiveDate`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateCodec;

impl TypeCodec<NaiveDate> for DateCodec {
    fn cql_type(&self) -> DataType {
        DataType::date()
    }

    fn serialize(&self, value: &NaiveDate) -> Result<Vec<u8>> {
        Ok(days_to_cql_date(days_from_date(*value)?).to_be_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<NaiveDate>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => {
                let raw = u32::from_be_bytes(fixed(bytes, NativeType::Date)?);
                date_from_days(cql_date_to_days(i64::from(raw))?).map(Some)
            }
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<NaiveDate>> {
        parse_date_literal(literal)?.map(date_from_days).transpose()
    }

    fn format(&self, value: Option<&NaiveDate>) -> Result<String> {
        Ok(value.map_or_else(
            || NULL.to_string(),
            |date| quote(&date.format(DATE_PATTERN).to_string()),
        ))
    }
}

/// Milliseconds since the epoch of `value`, which must not carry a finer
/// fraction
pub fn timestamp_to_millis(value: &DateTime<Utc>) -> Result<i64> {
    if value.timestamp_subsec_nanos() % 1_000_000 != 0 {
        return Err(CqlError::invalid_type(
            CQL0202,
            format!("timestamp {value} is more precise than a millisecond"),
        ));
    }
    Ok(value.timestamp_millis())
}

/// Milliseconds since the epoch from a timestamp literal: a raw long or one
/// of the accepted date-time patterns
pub fn parse_timestamp_literal(literal: &str) -> Result<Option<i64>> {
    if is_null(literal) {
        return Ok(None);
    }
    let value = strip_quotes(literal);
    if is_long_literal(&value) {
        return value
            .parse::<i64>()
            .map(Some)
            .map_err(|e| malformed(literal, format!("invalid timestamp value: {e}")));
    }
    let timestamp = TimestampCodec::parse_pattern(&value)
        .ok_or_else(|| malformed(literal, "unrecognized timestamp format"))?;
    timestamp_to_millis(&timestamp).map(Some)
}

/// `timestamp` as `chrono::DateTime<Utc>`, millisecond precision
///
/// Values with a sub-millisecond fraction are rejected. Wire values beyond
/// chrono's range (about 262,000 years around the epoch) fail to decode; use
/// [`crate::TimestampMillisCodec`] to work with the raw millisecond count.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampCodec;

impl TimestampCodec {
    fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            CqlError::invalid_type(CQL0202, format!("timestamp {millis} is out of range"))
        })
    }

    fn parse_pattern(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Utc));
        }
        for pattern in ZONED_PATTERNS {
            if let Ok(parsed) = DateTime::parse_from_str(value, pattern) {
                return Some(parsed.with_timezone(&Utc));
            }
        }
        for pattern in LOCAL_PATTERNS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(value, pattern) {
                return Some(parsed.and_utc());
            }
        }
        NaiveDate::parse_from_str(value, DATE_PATTERN)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    }
}

impl TypeCodec<DateTime<Utc>> for TimestampCodec {
    fn cql_type(&self) -> DataType {
        DataType::timestamp()
    }

    fn serialize(&self, value: &DateTime<Utc>) -> Result<Vec<u8>> {
        Ok(timestamp_to_millis(value)?.to_be_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<DateTime<Utc>>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => {
                let millis = i64::from_be_bytes(fixed(bytes, NativeType::Timestamp)?);
                Self::from_millis(millis).map(Some)
            }
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<DateTime<Utc>>> {
        parse_timestamp_literal(literal)?.map(Self::from_millis).transpose()
    }

    fn format(&self, value: Option<&DateTime<Utc>>) -> Result<String> {
        let Some(timestamp) = value else {
            return Ok(NULL.to_string());
        };
        timestamp_to_millis(timestamp)?;
        Ok(quote(&timestamp.format(TIMESTAMP_FORMAT).to_string()))
    }
}

/// `time` as `i64` nanoseconds since midnight
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCodec;

impl TimeCodec {
    fn check(nanos: i64) -> Result<i64> {
        if (0..NANOS_PER_DAY).contains(&nanos) {
            Ok(nanos)
        } else {
            Err(CqlError::invalid_type(
                CQL0202,
                format!("time value {nanos} is not within a day"),
            ))
        }
    }

    /// `hh:mm:ss[.fffffffff]`
    fn parse_time_of_day(value: &str) -> Option<i64> {
        let (clock, fraction) = match value.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (value, None),
        };
        let mut parts = clock.split(':');
        let mut component = |max: i64| -> Option<i64> {
            let part = parts.next()?;
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse::<i64>().ok().filter(|v| *v < max)
        };
        let hours = component(24)?;
        let minutes = component(60)?;
        let seconds = component(60)?;
        if parts.next().is_some() {
            return None;
        }

        let nanos = match fraction {
            None => 0,
            Some(digits)
                if !digits.is_empty()
                    && digits.len() <= 9
                    && digits.bytes().all(|b| b.is_ascii_digit()) =>
            {
                format!("{digits:0<9}").parse::<i64>().ok()?
            }
            Some(_) => return None,
        };
        Some(((hours * 60 + minutes) * 60 + seconds) * NANOS_PER_SECOND + nanos)
    }
}

impl TypeCodec<i64> for TimeCodec {
    fn cql_type(&self) -> DataType {
        DataType::time()
    }

    fn serialize(&self, value: &i64) -> Result<Vec<u8>> {
        Ok(Self::check(*value)?.to_be_bytes().to_vec())
    }

    fn deserialize(&self, bytes: Option<&[u8]>) -> Result<Option<i64>> {
        match bytes {
            None | Some([]) => Ok(None),
            Some(bytes) => Self::check(i64::from_be_bytes(fixed(bytes, NativeType::Time)?)).map(Some),
        }
    }

    fn parse(&self, literal: &str) -> Result<Option<i64>> {
        if is_null(literal) {
            return Ok(None);
        }
        let value = strip_quotes(literal);
        if is_long_literal(&value) {
            let nanos = value
                .parse::<i64>()
                .map_err(|e| malformed(literal, format!("invalid time value: {e}")))?;
            return Self::check(nanos).map(Some);
        }
        Self::parse_time_of_day(&value)
            .map(Some)
            .ok_or_else(|| malformed(literal, "time values are hh:mm:ss[.fffffffff]"))
    }

    fn format(&self, value: Option<&i64>) -> Result<String> {
        let Some(&nanos) = value else {
            return Ok(NULL.to_string());
        };
        let nanos = Self::check(nanos)?;
        let seconds = nanos / NANOS_PER_SECOND;
        Ok(quote(&format!(
            "{:02}:{:02}:{:02}.{:09}",
            seconds / 3600,
            seconds / 60 % 60,
            seconds % 60,
            nanos % NANOS_PER_SECOND
        )))
    }
}
