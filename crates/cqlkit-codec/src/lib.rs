//! CQL value codecs
//!
//! This crate converts values between three forms:
//! - Rust values (`i32`, `String`, `NaiveDate`, [`CqlValue`], ...)
//! - the binary wire format of the native protocol
//! - CQL literal text as written in query strings
//!
//! Every native type has a built-in codec for its default Rust
//! representation. [`ValueCodec`] handles any type, composites included,
//! through the dynamic [`CqlValue`]. [`CodecRegistry`] selects a codec for
//! a `(type, representation)` pair and accepts user codecs.

pub mod codec;
pub mod codecs;
pub mod extras;
pub mod literal;
pub mod protocol;
pub mod registry;
pub mod value;
pub mod value_codec;
mod wire;

pub use codec::TypeCodec;
pub use codecs::{
    BlobCodec, BooleanCodec, DateCodec, DecimalCodec, DoubleCodec, FloatCodec, InetCodec,
    IntCodec, LongCodec, SmallIntCodec, StringCodec, TimeCodec, TimestampCodec, TinyIntCodec,
    UuidCodec, VarintCodec,
};
pub use extras::{DateIntCodec, TimestampMillisCodec};
pub use protocol::ProtocolVersion;
pub use registry::{CodecLookup, CodecRegistry};
pub use value::CqlValue;
pub use value_codec::ValueCodec;
