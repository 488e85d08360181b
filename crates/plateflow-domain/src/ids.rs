//! Identifiers for samples, parts and plates
//!
//! All three are opaque 128-bit UUIDv7 values:
//! - Chronological sortability (parts created later sort later)
//! - No coordination required between protocol runs
//! - Displayed and serialized as the standard hyphenated UUID string

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based identifier
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an identifier from a raw u128 value
            ///
            /// Used by inventory adapters and tests that need stable ids.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an identifier from its UUID string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} string: {}", stringify!($name), e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_string(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a biological sample
    ///
    /// A sample is abstract: the same sample can be physically present as
    /// several parts spread over several plates.
    SampleId
);

uuid_id!(
    /// Identifier of a part, one physical instance of a sample in one slot
    PartId
);

uuid_id!(
    /// Identifier of a plate (collection)
    PlateId
);
