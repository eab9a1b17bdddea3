//! Type string parser
//!
//! Turns the raw tree produced by the grammar into a [`DataType`], checking
//! collection arity and `frozen` placement and resolving user type names.

use crate::grammar::{RawType, parse_raw};
use cqlkit_diagnostics::{CQL0004, CQL0005, CQL0006, CqlError, ErrorBuilder, ErrorCode, Result};
use cqlkit_types::{
    DataType, NativeType, UnresolvedUserType, UserType, UserTypeLookup, escape_id,
};
use std::sync::Arc;

const COMPOSITE_KEYWORDS: [&str; 5] = ["frozen", "list", "set", "map", "tuple"];

/// Parser for CQL type strings as found in schema metadata
///
/// Without a registry only native types and composites of them are
/// accepted. With a registry, any other name is a user type of the
/// registry's keyspace; names the registry does not know yet become deferred
/// user types that resolve on first use.
#[derive(Clone, Default)]
pub struct DataTypeParser {
    lookup: Option<Arc<dyn UserTypeLookup>>,
}

impl DataTypeParser {
    /// Create a parser for native and composite types only
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that resolves user type names against `lookup`
    pub fn with_registry(lookup: Arc<dyn UserTypeLookup>) -> Self {
        Self {
            lookup: Some(lookup),
        }
    }

    /// Parse `input` into a type.
    ///
    /// When `frozen` is set a composite result is marked frozen, as if it
    /// had been written inside `frozen<...>`.
    pub fn parse(&self, input: &str, frozen: bool) -> Result<DataType> {
        let raw = parse_raw(input)?;
        let data_type = self.build(&raw, input)?;
        Ok(if frozen {
            data_type.with_frozen(true)
        } else {
            data_type
        })
    }

    pub(crate) fn build(&self, raw: &RawType, source: &str) -> Result<DataType> {
        if raw.quoted {
            if raw.arguments.is_some() {
                return Err(error_at(
                    CQL0006,
                    format!("unknown parameterized type \"{}\"", raw.name),
                    raw,
                    source,
                ));
            }
            return self.user_type(&raw.name, raw, source);
        }

        let keyword = raw.name.to_ascii_lowercase();
        let Some(arguments) = &raw.arguments else {
            if let Some(native) = NativeType::from_name(&keyword) {
                return Ok(native.into());
            }
            if COMPOSITE_KEYWORDS.contains(&keyword.as_str()) {
                return Err(error_at(
                    CQL0004,
                    format!("{keyword} requires type arguments"),
                    raw,
                    source,
                ));
            }
            return self.user_type(&keyword, raw, source);
        };

        match (keyword.as_str(), arguments.as_slice()) {
            ("frozen", [inner]) => {
                let inner_type = self.build(inner, source)?;
                if inner_type.is_native() {
                    return Err(error_at(
                        CQL0005,
                        format!("cannot freeze native type {inner_type}"),
                        inner,
                        source,
                    ));
                }
                Ok(inner_type.with_frozen(true))
            }
            ("list", [element]) => Ok(DataType::list(self.build(element, source)?)),
            ("set", [element]) => Ok(DataType::set(self.build(element, source)?)),
            ("map", [key, value]) => Ok(DataType::map(
                self.build(key, source)?,
                self.build(value, source)?,
            )),
            ("tuple", components) => Ok(DataType::tuple(
                components
                    .iter()
                    .map(|component| self.build(component, source))
                    .collect::<Result<_>>()?,
            )),
            ("frozen" | "list" | "set" | "map", _) => Err(error_at(
                CQL0004,
                format!(
                    "{keyword} expects {} type argument(s) but got {}",
                    if keyword == "map" { 2 } else { 1 },
                    arguments.len()
                ),
                raw,
                source,
            )),
            _ => Err(error_at(
                CQL0006,
                format!("unknown parameterized type '{}'", raw.name),
                raw,
                source,
            )),
        }
    }

    fn user_type(&self, name: &str, raw: &RawType, source: &str) -> Result<DataType> {
        let Some(lookup) = &self.lookup else {
            return Err(error_at(
                CQL0006,
                format!("unknown type '{}'", raw.name),
                raw,
                source,
            ));
        };

        let user_type = match lookup.user_type(&escape_id(name)) {
            Some(user_type) => user_type.with_frozen(false),
            None => {
                log::trace!(
                    "deferring user type {}.{} referenced before its definition",
                    lookup.keyspace(),
                    name
                );
                UserType::deferred(UnresolvedUserType::new(lookup, name), false)
            }
        };
        Ok(user_type.into())
    }
}

/// Parse a type string, resolving user types against `registry`
pub fn parse<R: UserTypeLookup + 'static>(
    input: &str,
    registry: &Arc<R>,
    frozen: bool,
) -> Result<DataType> {
    let lookup: Arc<dyn UserTypeLookup> = registry.clone();
    DataTypeParser::with_registry(lookup).parse(input, frozen)
}

/// Name of the user type a leaf refers to, normalized, if it is not native
pub fn referenced_user_type(raw: &RawType) -> Option<String> {
    if raw.quoted {
        return Some(raw.name.clone());
    }
    let keyword = raw.name.to_ascii_lowercase();
    if NativeType::from_name(&keyword).is_some() || COMPOSITE_KEYWORDS.contains(&keyword.as_str())
    {
        None
    } else {
        Some(keyword)
    }
}

fn error_at(code: ErrorCode, message: String, raw: &RawType, source: &str) -> CqlError {
    ErrorBuilder::new(code, message)
        .span(raw.span, source)
        .syntax(source)
}
