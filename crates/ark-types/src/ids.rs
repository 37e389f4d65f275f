//! Type-safe identifier wrappers.
//!
//! Layers and quantum cores are numbered from 1 in creation order, so their
//! IDs wrap a `u32`. A whole run is identified by a UUID v7 so exported
//! histories sort by the time they were produced.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a `u32` sequence number.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the inner sequence number.
            pub const fn into_inner(self) -> u32 {
                self.0
            }

            /// Return the identifier that follows this one.
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifier of a simulation layer. The seed layer is `LayerId(1)`.
    LayerId
}

define_id! {
    /// Identifier of a quantum core aboard the probe.
    CoreId
}

/// Unique identifier for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_ids_order_by_creation() {
        let first = LayerId(1);
        let second = first.next();
        assert_eq!(second, LayerId(2));
        assert!(first < second);
    }

    #[test]
    fn layer_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&LayerId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }

    #[test]
    fn run_ids_are_distinct() {
        let a = RunId::new();
        let b = RunId::new();
        assert_ne!(a, b);
        assert_ne!(a.0, Uuid::nil());
    }

    #[test]
    fn id_display_matches_inner() {
        assert_eq!(CoreId(3).to_string(), "3");
    }
}
