//! Typed identifier newtypes for vendor components.
//!
//! The vendor hands out opaque string identifiers (`"Control_ZO1"` for a
//! zone, `"1"` for a room). They are kept as-is; the newtypes only prevent
//! passing a room id where a zone id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a vendor identifier.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::EmptyId`] when `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(ValidationError::EmptyId);
                }
                Ok(Self(value))
            }

            /// Access the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`Room`](crate::component::Room).
    RoomId
);

define_id!(
    /// Identifier of a [`Zone`](crate::component::Zone).
    ZoneId
);
