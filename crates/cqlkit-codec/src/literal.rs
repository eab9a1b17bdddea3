//! CQL literal scanning
//!
//! Helpers shared by the codecs to quote and unquote strings and to walk
//! over composite literals such as `[1,2]`, `{'a':1}` or `{f1:(1,'x')}`.
//! Positions are byte offsets; every delimiter is ASCII so scanning bytes is
//! safe on UTF-8 input.

use cqlkit_diagnostics::{CQL0203, CqlError, Result};

/// Wrap `value` in single quotes, doubling any embedded quote
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Strip enclosing single quotes and undouble embedded ones.
///
/// Values that are not single-quoted are returned unchanged.
pub fn unquote(value: &str) -> String {
    if is_quoted(value) {
        value[1..value.len() - 1].replace("''", "'")
    } else {
        value.to_string()
    }
}

/// Check if `value` is enclosed in single quotes
pub fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'')
}

/// Check if `value` is an optionally negative run of decimal digits
pub fn is_long_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Check if a literal stands for CQL `NULL`
pub fn is_null(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("NULL")
}

/// Characters allowed in an unquoted literal token
pub fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'+' | b'.' | b'_' | b'&')
}

/// Index of the first non-whitespace byte at or after `idx`
pub fn skip_spaces(value: &str, idx: usize) -> usize {
    let bytes = value.as_bytes();
    let mut idx = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

/// Index just past the CQL value starting at `idx`.
///
/// A value is a quoted string, a quoted identifier, a bracketed composite
/// (nesting and quoted content are honored) or a bare token.
pub fn skip_cql_value(value: &str, idx: usize) -> Result<usize> {
    let bytes = value.as_bytes();
    let Some(&first) = bytes.get(idx) else {
        return Err(malformed(value, "expected a value but reached the end"));
    };

    match first {
        b'\'' | b'"' => skip_quoted(value, idx),
        b'[' | b'{' | b'(' => {
            let mut depth = 0usize;
            let mut i = idx;
            while i < bytes.len() {
                match bytes[i] {
                    b'\'' | b'"' => {
                        i = skip_quoted(value, i)?;
                        continue;
                    }
                    b'[' | b'{' | b'(' => depth += 1,
                    b']' | b'}' | b')' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(i + 1);
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            Err(malformed(value, "unterminated composite value"))
        }
        _ => {
            let end = idx
                + bytes[idx..]
                    .iter()
                    .take_while(|&&b| is_identifier_char(b))
                    .count();
            if end == idx {
                Err(malformed(
                    value,
                    format!("unexpected character '{}' at {idx}", char::from(first)),
                ))
            } else {
                Ok(end)
            }
        }
    }
}

/// Index just past the identifier starting at `idx`, quoted or bare
pub fn skip_cql_id(value: &str, idx: usize) -> Result<usize> {
    let bytes = value.as_bytes();
    match bytes.get(idx) {
        Some(b'"') => skip_quoted(value, idx),
        Some(_) => {
            let end = idx
                + bytes[idx..]
                    .iter()
                    .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_')
                    .count();
            if end == idx {
                Err(malformed(value, format!("expected an identifier at {idx}")))
            } else {
                Ok(end)
            }
        }
        None => Err(malformed(value, "expected an identifier but reached the end")),
    }
}

fn skip_quoted(value: &str, idx: usize) -> Result<usize> {
    let bytes = value.as_bytes();
    let quote = bytes[idx];
    let mut i = idx + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return Ok(i + 1);
        }
        i += 1;
    }
    Err(malformed(value, "unterminated quoted string"))
}

pub(crate) fn malformed(literal: &str, message: impl AsRef<str>) -> CqlError {
    CqlError::invalid_type(
        CQL0203,
        format!("cannot parse \"{literal}\": {}", message.as_ref()),
    )
}
