//! CQL type string parser using Winnow
//!
//! This crate parses the type strings found in schema metadata, such as
//! `frozen<map<"E", list<int>>>`, into [`cqlkit_types::DataType`] values,
//! and loads the user types of a keyspace in dependency order.

mod grammar;
mod parser;
mod schema;

pub use parser::{DataTypeParser, parse};
pub use schema::{UserTypeDefinition, load_user_types};
