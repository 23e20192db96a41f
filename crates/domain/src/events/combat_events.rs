//! Combat-related domain events
//!
//! These types communicate what happened during a combat turn, allowing the
//! caller to persist the result and react to a finished fight.

use serde::{Deserialize, Serialize};

use crate::entities::{Combat, CombatantSide};
use crate::ids::{CombatantId, CreatureId};

/// How a finished combat ended, from the party's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResolution {
    /// Every monster fainted
    PartyVictory,
    /// Every character fainted
    PartyDefeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaintedCombatant {
    pub combatant_id: CombatantId,
    pub creature_id: CreatureId,
    pub side: CombatantSide,
}

/// Result of one resolved attack.
///
/// `combat` is the state after the turn. When `resolution` is set the combat
/// is over and must be deleted rather than saved.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub roll: i32,
    pub attack_power: i32,
    pub defend_power: i32,
    pub hit: bool,
    pub damage: i32,
    pub defender_creature_id: CreatureId,
    pub defender_hp: i32,
    pub fainted: Option<FaintedCombatant>,
    pub resolution: Option<CombatResolution>,
    pub combat: Combat,
}

impl TurnOutcome {
    pub fn is_final(&self) -> bool {
        self.resolution.is_some()
    }
}
