//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - CQL0001-CQL0099: Syntax errors (type grammar)
//! - CQL0100-CQL0199: Schema errors (user types, resolution)
//! - CQL0200-CQL0299: Value errors (wire bytes, literals)
//! - CQL0300-CQL0399: Codec lookup errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a syntax error (0001-0099)
    pub const fn is_syntax_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a schema error (0100-0199)
    pub const fn is_schema_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a value error (0200-0299)
    pub const fn is_value_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Syntax errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Unexpected end of input"));
    map.insert(4, ErrorInfo::new("Wrong number of type arguments")
        .with_help("list and set take one type, map takes two, tuple takes at least one"));
    map.insert(5, ErrorInfo::new("Invalid frozen type")
        .with_help("frozen<...> only applies to collections, tuples and user types"));
    map.insert(6, ErrorInfo::new("Unknown type name"));
    map.insert(7, ErrorInfo::new("Unterminated quoted identifier"));

    // Schema errors (0100-0199)
    map.insert(100, ErrorInfo::new("Unresolved user type")
        .with_help("The keyspace metadata does not define the referenced type"));
    map.insert(101, ErrorInfo::new("Duplicate field name"));
    map.insert(102, ErrorInfo::new("Duplicate user type"));
    map.insert(103, ErrorInfo::new("Keyspace mismatch"));
    map.insert(104, ErrorInfo::new("Unknown field"));
    map.insert(105, ErrorInfo::new("Deferred user type cannot be registered")
        .with_help("Only fully defined user types can be added to a registry"));
    map.insert(106, ErrorInfo::new("Malformed user type definition")
        .with_help("Every field name needs exactly one field type"));

    // Value errors (0200-0299)
    map.insert(200, ErrorInfo::new("Invalid value for type"));
    map.insert(201, ErrorInfo::new("Invalid byte length"));
    map.insert(202, ErrorInfo::new("Value out of range"));
    map.insert(203, ErrorInfo::new("Malformed literal"));
    map.insert(204, ErrorInfo::new("Null element in collection"));
    map.insert(205, ErrorInfo::new("Unsupported protocol version"));

    // Codec lookup errors (0300-0399)
    map.insert(300, ErrorInfo::new("Codec not found"));

    map
});

// Syntax errors
pub const CQL0001: ErrorCode = ErrorCode::new(1);
pub const CQL0002: ErrorCode = ErrorCode::new(2);
pub const CQL0004: ErrorCode = ErrorCode::new(4);
pub const CQL0005: ErrorCode = ErrorCode::new(5);
pub const CQL0006: ErrorCode = ErrorCode::new(6);
pub const CQL0007: ErrorCode = ErrorCode::new(7);

// Schema errors
pub const CQL0100: ErrorCode = ErrorCode::new(100);
pub const CQL0101: ErrorCode = ErrorCode::new(101);
pub const CQL0102: ErrorCode = ErrorCode::new(102);
pub const CQL0103: ErrorCode = ErrorCode::new(103);
pub const CQL0104: ErrorCode = ErrorCode::new(104);
pub const CQL0105: ErrorCode = ErrorCode::new(105);
pub const CQL0106: ErrorCode = ErrorCode::new(106);

// Value errors
pub const CQL0200: ErrorCode = ErrorCode::new(200);
pub const CQL0201: ErrorCode = ErrorCode::new(201);
pub const CQL0202: ErrorCode = ErrorCode::new(202);
pub const CQL0203: ErrorCode = ErrorCode::new(203);
pub const CQL0204: ErrorCode = ErrorCode::new(204);
pub const CQL0205: ErrorCode = ErrorCode::new(205);

// Codec lookup errors
pub const CQL0300: ErrorCode = ErrorCode::new(300);
