//! Raw type grammar using winnow
//!
//! ```text
//! type       := name ( "<" type ( "," type )* ">" )?
//! name       := quoted | bare
//! quoted     := '"' ( '""' | [^"] )* '"'
//! bare       := [A-Za-z] [A-Za-z0-9_]*
//! ```
//!
//! Whitespace is allowed around every token. This layer knows nothing about
//! which names are native types or collections; it only produces the tree
//! that [`crate::DataTypeParser`] validates.

use cqlkit_diagnostics::{CQL0001, CQL0002, CQL0007, CqlError, ErrorBuilder, Span};
use winnow::ascii::multispace0;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::LocatingSlice;
use winnow::token::{none_of, one_of, take_while};

pub type Input<'a> = LocatingSlice<&'a str>;
pub type PResult<T> = ModalResult<T>;

const CLOSING_QUOTE: &str = "closing quote";

/// One node of a type string before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawType {
    /// Name as written, with quotes removed for quoted names
    pub name: String,
    /// Whether the name was double-quoted
    pub quoted: bool,
    /// Type arguments, `None` when no `<...>` followed the name
    pub arguments: Option<Vec<RawType>>,
    /// Byte range of the name in the input
    pub span: Span,
}

impl RawType {
    /// Collect the leaves of the tree; only leaves can name a user type
    pub fn collect_names<'a>(&'a self, names: &mut Vec<&'a RawType>) {
        match &self.arguments {
            Some(arguments) => {
                for argument in arguments {
                    argument.collect_names(names);
                }
            }
            None => names.push(self),
        }
    }
}

/// Parse a complete type string into its raw tree
pub fn parse_raw(source: &str) -> Result<RawType, CqlError> {
    log::trace!("parsing type string {source:?}");
    raw_type
        .parse(LocatingSlice::new(source))
        .map_err(|e| syntax_error(source, e.offset(), e.inner()))
}

fn syntax_error(source: &str, offset: usize, inner: &winnow::error::ContextError) -> CqlError {
    let unterminated = inner
        .context()
        .any(|c| matches!(c, StrContext::Label(label) if *label == CLOSING_QUOTE));

    let builder = if unterminated {
        ErrorBuilder::new(CQL0007, "unterminated quoted identifier")
    } else {
        match source[offset..].chars().next() {
            None => ErrorBuilder::new(CQL0002, "unexpected end of type string"),
            Some(c) => ErrorBuilder::new(CQL0001, format!("unexpected character '{c}'")),
        }
    };

    let expected: Vec<String> = inner
        .context()
        .filter_map(|c| match c {
            StrContext::Expected(value) => Some(value.to_string()),
            _ => None,
        })
        .collect();
    let builder = if expected.is_empty() {
        builder
    } else {
        builder.context(format!("expected {}", expected.join(" or ")))
    };

    builder.span(Span::point(offset), source).syntax(source)
}

fn raw_type(input: &mut Input<'_>) -> PResult<RawType> {
    multispace0.parse_next(input)?;
    let ((name, quoted), range) = type_name.with_span().parse_next(input)?;
    multispace0.parse_next(input)?;
    let arguments = opt(preceded('<', cut_err(type_arguments))).parse_next(input)?;
    multispace0.parse_next(input)?;

    Ok(RawType {
        name,
        quoted,
        arguments,
        span: Span::from(range),
    })
}

fn type_arguments(input: &mut Input<'_>) -> PResult<Vec<RawType>> {
    let arguments = separated(1.., raw_type, ',').parse_next(input)?;
    '>'.context(StrContext::Expected(StrContextValue::CharLiteral('>')))
        .context(StrContext::Expected(StrContextValue::CharLiteral(',')))
        .parse_next(input)?;
    Ok(arguments)
}

fn type_name(input: &mut Input<'_>) -> PResult<(String, bool)> {
    alt((
        quoted_name.map(|name| (name, true)),
        bare_name.map(|name: &str| (name.to_string(), false)),
    ))
    .context(StrContext::Expected(StrContextValue::Description("type name")))
    .parse_next(input)
}

fn bare_name<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn quoted_name(input: &mut Input<'_>) -> PResult<String> {
    '"'.parse_next(input)?;
    let name: String = repeat(0.., alt(("\"\"".value('"'), none_of('"')))).parse_next(input)?;
    cut_err('"')
        .context(StrContext::Label(CLOSING_QUOTE))
        .parse_next(input)?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape(raw: &RawType) -> String {
        match &raw.arguments {
            None if raw.quoted => format!("\"{}\"", raw.name),
            None => raw.name.clone(),
            Some(arguments) => format!(
                "{}<{}>",
                raw.name,
                arguments.iter().map(shape).collect::<Vec<_>>().join(",")
            ),
        }
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let raw = parse_raw("  map  <  date  ,  \"My Type\"  >  ").unwrap();
        assert_eq!(shape(&raw), "map<date,\"My Type\">");
        assert_eq!(raw.span, Span::new(2, 5));
    }

    #[test]
    fn test_quoted_name_unescapes_quotes() {
        let raw = parse_raw("\"a\"\"b\"").unwrap();
        assert_eq!(raw.name, "a\"b");
        assert!(raw.quoted);
    }

    #[test]
    fn test_collect_names_visits_leaves() {
        let raw = parse_raw("frozen<map<\"E\", tuple<int, d>>>").unwrap();
        let mut names = Vec::new();
        raw.collect_names(&mut names);
        let names: Vec<&str> = names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["E", "int", "d"]);
    }

    #[test]
    fn test_errors_carry_codes_and_locations() {
        let err = parse_raw("list<int").unwrap_err();
        assert_eq!(err.code(), CQL0002);

        let err = parse_raw("list<int>>").unwrap_err();
        assert_eq!(err.code(), CQL0001);
        assert_eq!(err.location().map(|l| l.offset), Some(9));

        let err = parse_raw("list<>").unwrap_err();
        assert_eq!(err.code(), CQL0001);

        let err = parse_raw("\"abc").unwrap_err();
        assert_eq!(err.code(), CQL0007);

        assert_eq!(parse_raw("").unwrap_err().code(), CQL0002);
    }

    #[test]
    fn test_bare_names_start_with_a_letter() {
        let err = parse_raw("1abc").unwrap_err();
        assert_eq!(err.code(), CQL0001);
        assert_eq!(err.location().map(|l| l.offset), Some(0));

        let err = parse_raw("list<_tmp>").unwrap_err();
        assert_eq!(err.code(), CQL0001);
        assert_eq!(err.location().map(|l| l.offset), Some(5));

        assert_eq!(parse_raw("a1_b").unwrap().name, "a1_b");
        assert_eq!(parse_raw("\"1abc\"").unwrap().name, "1abc");
    }
}
