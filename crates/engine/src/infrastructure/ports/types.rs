//! Write-set types passed to storage ports.
//!
//! Each type describes one multi-row write that storage must apply as a unit.

use delver_domain::{Inventory, Location, TreasureId};

/// Mutable scalar state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStateUpdate {
    pub active: bool,
    pub party_location: Location,
}

/// Everything written when a treasure is opened.
///
/// Storage flips `opened` only if it is still false, then saves the item lists
/// of every touched inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreasureOpening {
    pub treasure_id: TreasureId,
    pub inventories: Vec<Inventory>,
}
