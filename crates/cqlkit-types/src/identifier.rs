//! CQL identifier rules
//!
//! Unquoted identifiers are case-insensitive and stored lower-cased; double
//! quoted identifiers keep their exact case and may contain any character,
//! with `""` standing for a literal `"`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static LOWERCASE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("static identifier pattern"));

static RESERVED_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "add", "allow", "alter", "and", "apply", "asc", "authorize", "batch", "begin", "by",
        "columnfamily", "create", "delete", "desc", "describe", "drop", "entries", "execute",
        "from", "full", "grant", "if", "in", "index", "infinity", "insert", "into", "keyspace",
        "limit", "modify", "nan", "norecursive", "not", "null", "of", "on", "or", "order",
        "primary", "rename", "replace", "revoke", "schema", "select", "set", "table", "to",
        "token", "truncate", "unlogged", "update", "use", "using", "where", "with",
    ]
    .into_iter()
    .collect()
});

/// Check whether `id` can be written without quotes
pub fn is_lowercase_identifier(id: &str) -> bool {
    LOWERCASE_IDENTIFIER.is_match(id) && !RESERVED_KEYWORDS.contains(id)
}

/// Normalize an identifier the way the server stores it.
///
/// Bare identifiers are folded to lower case, double-quoted identifiers are
/// unquoted and keep their case.
pub fn handle_id(id: &str) -> String {
    let mut lowercase = true;
    let mut alphanumeric = true;
    for c in id.chars() {
        if c.is_ascii_uppercase() {
            lowercase = false;
        } else if !(c.is_ascii_digit() || c == '_' || c.is_ascii_lowercase()) {
            lowercase = false;
            alphanumeric = false;
            break;
        }
    }

    if lowercase {
        id.to_string()
    } else if alphanumeric {
        id.to_ascii_lowercase()
    } else {
        unquote_double(id)
    }
}

/// Render an identifier so that it reads back as itself in CQL text
pub fn escape_id(id: &str) -> String {
    if is_lowercase_identifier(id) {
        id.to_string()
    } else {
        double_quote(id)
    }
}

/// Wrap `value` in double quotes, doubling any embedded quote
pub fn double_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Strip enclosing double quotes and undouble embedded ones.
///
/// Values that are not double-quoted are returned unchanged.
pub fn unquote_double(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].replace("\"\"", "\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("address", "address")]
    #[case("Address", "address")]
    #[case("ADDRESS_2", "address_2")]
    #[case("\"Address\"", "Address")]
    #[case("\"my \"\"quoted\"\" type\"", "my \"quoted\" type")]
    fn test_handle_id(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(handle_id(input), expected);
    }

    #[rstest]
    #[case("address", "address")]
    #[case("Address", "\"Address\"")]
    #[case("1st", "\"1st\"")]
    #[case("select", "\"select\"")]
    #[case("a\"b", "\"a\"\"b\"")]
    fn test_escape_id(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_id(input), expected);
    }

    #[test]
    fn test_escape_then_handle_is_identity() {
        for id in ["plain", "MixedCase", "with space", "quote\"inside", "order"] {
            assert_eq!(handle_id(&escape_id(id)), id);
        }
    }
}
