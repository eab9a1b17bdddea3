//! Codecs for alternative Rust representations
//!
//! These are not registered by default; add them to a
//! [`CodecRegistry`](crate::CodecRegistry) with
//! [`register`](crate::CodecRegistry::register).

mod date_int;
mod timestamp_millis;

pub use date_int::DateIntCodec;
pub use timestamp_millis::TimestampMillisCodec;
