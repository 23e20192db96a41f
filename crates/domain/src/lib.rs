//! Game model for the delver RPG engine.
//!
//! Pure data and rules: no I/O, no async and no owned randomness. Anything
//! random takes a range sampler `FnMut(min, max) -> value` from the caller.

pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use entities::*;
pub use error::DomainError;
pub use events::{CombatResolution, FaintedCombatant, TurnOutcome};
pub use ids::{
    CombatId, CombatantId, ConsumableId, CreatureId, CreatureTypeId, CurrencyId, DungeonMasterId,
    EquipmentId, GameId, GameMapId, InventoryId, PartyId, PlayerId, PropertiesId, TreasureId,
    TreasureTypeId, UserId,
};
pub use value_objects::{
    pick_integer_from_range, CreatureName, Direction, DisplayName, ItemName, Location, Range,
};
