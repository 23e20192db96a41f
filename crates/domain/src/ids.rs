use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Storage-assigned numeric identifiers. Callers treat the inner value as opaque.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Creature IDs
define_id!(CreatureId);
define_id!(PropertiesId);
define_id!(CreatureTypeId);
define_id!(InventoryId);

// Item catalog IDs
define_id!(EquipmentId);
define_id!(ConsumableId);
define_id!(CurrencyId);

// Treasure IDs
define_id!(TreasureTypeId);
define_id!(TreasureId);

// Game aggregate IDs
define_id!(GameId);
define_id!(GameMapId);
define_id!(PartyId);
define_id!(PlayerId);
define_id!(DungeonMasterId);

// Combat IDs
define_id!(CombatId);
define_id!(CombatantId);

/// Opaque identity of an external user (issued by the auth provider, never by us).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a user id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is empty after trimming.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("User id cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> String {
        id.0
    }
}
