//! The CQL type system for Rust
//!
//! This crate bundles:
//! - The column type model (`DataType`, user types and their keyspace registry)
//! - Parsing of type strings as found in schema metadata
//! - Codecs between Rust values, wire bytes and CQL literals
//!
//! # Example
//!
//! ```
//! use cqlkit::codec::{CodecRegistry, CqlValue, TypeCodec};
//! use cqlkit::parse;
//! use cqlkit::types::TypeRegistry;
//!
//! let keyspace = TypeRegistry::new("ks");
//! let data_type = parse("map<text, frozen<list<int>>>", &keyspace, false)?;
//!
//! let codec = CodecRegistry::new().codec_for::<CqlValue>(&data_type)?;
//! let value = codec.parse("{'a': [1, 2]}")?;
//! let bytes = codec.serialize(value.as_ref().unwrap())?;
//! assert_eq!(codec.deserialize(Some(&bytes))?, value);
//! # Ok::<(), cqlkit::CqlError>(())
//! ```

// Re-export all public APIs from internal crates
pub use cqlkit_codec as codec;
pub use cqlkit_diagnostics as diagnostics;
pub use cqlkit_parser as parser;
pub use cqlkit_types as types;

// Convenience re-exports
pub use cqlkit_codec::{CodecRegistry, CqlValue, ProtocolVersion, TypeCodec};
pub use cqlkit_diagnostics::{CqlError, Result};
pub use cqlkit_parser::{DataTypeParser, load_user_types, parse};
pub use cqlkit_types::{DataType, NativeType, TypeRegistry, UserType};
