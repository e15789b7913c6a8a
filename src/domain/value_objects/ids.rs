//! Strongly-typed identifiers for domain entities
//!
//! Campaign records are keyed by opaque text ids assigned by the record store,
//! so these wrap a `String` rather than generating their own values.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(CampaignId);
define_id!(CharacterId);
define_id!(MonsterId);
define_id!(EncounterId);
define_id!(MapId);
// Character id or monster instance id
define_id!(CombatantId);

impl From<&CharacterId> for CombatantId {
    fn from(id: &CharacterId) -> Self {
        Self(id.0.clone())
    }
}
