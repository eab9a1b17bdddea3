//! CQL type system
//!
//! This crate defines the model of CQL column types:
//! - Native types (int, text, uuid, ...)
//! - Collections (list, set, map), tuples and user-defined types
//! - The keyspace-scoped registry of user types
//! - Deferred user types that resolve against the registry on first use

pub mod data_type;
pub mod identifier;
pub mod registry;
pub mod user_type;

pub use data_type::*;
pub use identifier::{double_quote, escape_id, handle_id, is_lowercase_identifier, unquote_double};
pub use registry::*;
pub use user_type::*;
