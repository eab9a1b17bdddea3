//! Native protocol versions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the native protocol values are encoded for
///
/// Only collection framing depends on the version: V1 and V2 use unsigned
/// 16-bit sizes, V3 and later signed 32-bit sizes. Tuples and user type
/// values require V3.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ProtocolVersion {
    V1,
    V2,
    V3,
    #[default]
    V4,
    V5,
}

impl ProtocolVersion {
    /// Get the version number
    pub const fn number(&self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
        }
    }

    /// Check if collection sizes are encoded on two bytes
    pub const fn uses_short_sizes(&self) -> bool {
        matches!(self, Self::V1 | Self::V2)
    }

    /// Check if tuple and user type values can be encoded
    pub const fn supports_tuples(&self) -> bool {
        !self.uses_short_sizes()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.number())
    }
}
