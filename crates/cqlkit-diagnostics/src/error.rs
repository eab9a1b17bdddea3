//! cqlkit error types

use crate::{CQL0100, CQL0300, ErrorCode};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Byte range of a token in a type string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span, for errors at a single position
    pub const fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Where a syntax error occurred, 1-based line and column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    /// Byte offset of the offending token
    pub offset: usize,
    /// Byte length of the offending token
    pub length: usize,
}

impl SourceLocation {
    /// Locate `span` in `source`. Columns count characters, not bytes.
    pub fn locate(span: Span, source: &str) -> Self {
        let before = source.get(..span.start).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
        Self {
            line,
            column: before[line_start..].chars().count() + 1,
            offset: span.start,
            length: span.end.saturating_sub(span.start),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Main cqlkit error type
///
/// The type is `Clone` because a failed user type resolution is memoized and
/// handed back to every later caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CqlError {
    /// Malformed type definition string
    #[error("{code}: {message}")]
    Syntax {
        code: ErrorCode,
        message: String,
        input: String,
        location: Option<SourceLocation>,
        context: Option<String>,
    },

    /// A user type reference whose definition is absent from the keyspace
    #[error("CQL0100: cannot resolve user type {keyspace}.{type_name}")]
    UnresolvedType { keyspace: String, type_name: String },

    /// A value outside the representable domain of its CQL type
    #[error("{code}: {message}")]
    InvalidType { code: ErrorCode, message: String },

    /// No codec handles the requested type and representation
    #[error("CQL0300: codec not found for CQL type {cql_type} <-> {representation}")]
    CodecNotFound {
        cql_type: String,
        representation: String,
    },

    /// Inconsistent schema metadata (duplicate names, wrong keyspace)
    #[error("{code}: {message}")]
    Schema { code: ErrorCode, message: String },
}

impl CqlError {
    /// Create a syntax error
    pub fn syntax(code: ErrorCode, message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Syntax {
            code,
            message: message.into(),
            input: input.into(),
            location: None,
            context: None,
        }
    }

    /// Create an unresolved user type error
    pub fn unresolved_type(keyspace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnresolvedType {
            keyspace: keyspace.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_type(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InvalidType {
            code,
            message: message.into(),
        }
    }

    /// Create a codec lookup error
    pub fn codec_not_found(
        cql_type: impl Into<String>,
        representation: impl Into<String>,
    ) -> Self {
        Self::CodecNotFound {
            cql_type: cql_type.into(),
            representation: representation.into(),
        }
    }

    /// Create a schema error
    pub fn schema(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Schema {
            code,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Syntax { code, .. } => *code,
            Self::UnresolvedType { .. } => CQL0100,
            Self::InvalidType { code, .. } => *code,
            Self::CodecNotFound { .. } => CQL0300,
            Self::Schema { code, .. } => *code,
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Syntax { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Check if this is a syntax error
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Check if this is an unresolved user type error
    pub fn is_unresolved_type(&self) -> bool {
        matches!(self, Self::UnresolvedType { .. })
    }

    /// Check if this is an invalid value error
    pub fn is_invalid_type(&self) -> bool {
        matches!(self, Self::InvalidType { .. })
    }
}

/// Builder for syntax errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    location: Option<SourceLocation>,
    context: Option<String>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            context: None,
        }
    }

    /// Point the error at `span` of `source`
    pub fn span(mut self, span: Span, source: &str) -> Self {
        self.location = Some(SourceLocation::locate(span, source));
        self
    }

    /// Add context information
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build a syntax error
    pub fn syntax(self, input: impl Into<String>) -> CqlError {
        CqlError::Syntax {
            code: self.code,
            message: self.message,
            input: input.into(),
            location: self.location,
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CQL0001, CQL0201};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_builder() {
        let err = ErrorBuilder::new(CQL0001, "Unexpected '>'")
            .span(Span::new(5, 6), "list<>")
            .context("expected a type name")
            .syntax("list<>");

        assert!(err.is_syntax());
        assert_eq!(err.code(), CQL0001);
        let location = err.location().unwrap();
        assert_eq!(location.to_string(), "1:6");
        assert_eq!(location.length, 1);
    }

    #[test]
    fn test_locate_across_lines() {
        let source = "map<int,\n text>";
        assert_eq!(SourceLocation::locate(Span::point(0), source).to_string(), "1:1");
        assert_eq!(SourceLocation::locate(Span::point(4), source).to_string(), "1:5");
        assert_eq!(SourceLocation::locate(Span::new(10, 14), source).to_string(), "2:2");
        assert_eq!(SourceLocation::locate(Span::point(2), "é<").column, 2);
    }

    #[test]
    fn test_unresolved_type_display() {
        let err = CqlError::unresolved_type("ks", "address");
        assert_eq!(err.code(), CQL0100);
        assert_eq!(err.to_string(), "CQL0100: cannot resolve user type ks.address");
    }

    #[test]
    fn test_invalid_type_display() {
        let err = CqlError::invalid_type(CQL0201, "expected 4 bytes but got 3");
        assert!(err.is_invalid_type());
        assert!(err.to_string().starts_with("CQL0201"));
    }

    #[test]
    fn test_codec_not_found_display() {
        let err = CqlError::codec_not_found("date", "i32");
        assert_eq!(err.code(), CQL0300);
        assert!(err.to_string().contains("date <-> i32"));
    }
}
