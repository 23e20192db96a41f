//! Turn-based combat.
//!
//! Turn order is fixed when combat begins: combatants sorted by ascending
//! dexterity, equal dexterity keeping insertion order (monsters in tile order,
//! then characters in party order). [`Combat::take_turn`] is the only state
//! transition; it returns the next state instead of mutating in place so a
//! rejected turn can never leave partial changes behind.

use serde::{Deserialize, Serialize};

use crate::entities::creature::{Ability, Creature, CreatureKind};
use crate::error::DomainError;
use crate::events::{CombatResolution, FaintedCombatant, TurnOutcome};
use crate::ids::{CombatId, CombatantId, CreatureId, GameId};

/// Sides of a fight. NPCs never take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantSide {
    Monster,
    Character,
}

impl CombatantSide {
    pub fn for_kind(kind: CreatureKind) -> Option<Self> {
        match kind {
            CreatureKind::Monster => Some(Self::Monster),
            CreatureKind::Character => Some(Self::Character),
            CreatureKind::Npc => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub creature: Creature,
    pub side: CombatantSide,
}

/// A combatant before storage assigns its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCombatant {
    pub creature: Creature,
    pub side: CombatantSide,
}

/// Build the turn order for a new combat.
///
/// Fainted creatures are left out.
///
/// # Errors
///
/// Returns `DomainError::Validation` if either side has nobody left standing.
pub fn order_combatants(
    monsters: Vec<Creature>,
    characters: Vec<Creature>,
) -> Result<Vec<NewCombatant>, DomainError> {
    let monsters: Vec<Creature> = monsters.into_iter().filter(|c| !c.is_fainted()).collect();
    let characters: Vec<Creature> = characters.into_iter().filter(|c| !c.is_fainted()).collect();

    if monsters.is_empty() {
        return Err(DomainError::validation("No monsters in the vicinity"));
    }
    if characters.is_empty() {
        return Err(DomainError::validation("No characters able to fight"));
    }

    let mut combatants: Vec<NewCombatant> = monsters
        .into_iter()
        .map(|creature| NewCombatant {
            creature,
            side: CombatantSide::Monster,
        })
        .chain(characters.into_iter().map(|creature| NewCombatant {
            creature,
            side: CombatantSide::Character,
        }))
        .collect();

    // sort_by_key is stable
    combatants.sort_by_key(|c| c.creature.ability(Ability::Dexterity));
    Ok(combatants)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combat {
    pub id: CombatId,
    pub game_id: GameId,
    pub turn_index: usize,
    pub combatants: Vec<Combatant>,
    pub fainted_monster_ids: Vec<CreatureId>,
    pub fainted_character_ids: Vec<CreatureId>,
}

impl Combat {
    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn_index)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    fn side_remaining(&self, side: CombatantSide) -> bool {
        self.combatants.iter().any(|c| c.side == side)
    }

    /// Resolve one attack with the given d20 `roll`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when it is not `attacker_id`'s turn,
    /// the defender is not in this combat, or both are on the same side.
    pub fn take_turn(
        &self,
        attacker_id: CombatantId,
        defender_id: CombatantId,
        roll: i32,
    ) -> Result<TurnOutcome, DomainError> {
        let attacker = self
            .current()
            .filter(|c| c.id == attacker_id)
            .ok_or_else(|| {
                DomainError::validation(format!("It is not combatant {}'s turn", attacker_id))
            })?;
        let defender_index = self
            .combatants
            .iter()
            .position(|c| c.id == defender_id)
            .ok_or_else(|| {
                DomainError::validation(format!("Combatant {} is not in this combat", defender_id))
            })?;
        let defender = &self.combatants[defender_index];
        if defender.side == attacker.side {
            return Err(DomainError::validation("Combatants cannot attack their own side"));
        }

        let attack_power = roll + attacker.creature.ability(Ability::Strength);
        let defend_power = defender.creature.ability(Ability::Dexterity);
        let hit = attack_power > defend_power;
        let damage = if hit { attack_power - defend_power } else { 0 };

        let mut next = self.clone();
        let defender_side = defender.side;
        let defender_creature_id = defender.creature.id;
        let defender_hp = next.combatants[defender_index]
            .creature
            .properties
            .take_damage(damage);

        let mut fainted = None;
        let mut resolution = None;
        if defender_hp == 0 {
            next.combatants.remove(defender_index);
            match defender_side {
                CombatantSide::Monster => next.fainted_monster_ids.push(defender_creature_id),
                CombatantSide::Character => next.fainted_character_ids.push(defender_creature_id),
            }
            fainted = Some(FaintedCombatant {
                combatant_id: defender_id,
                creature_id: defender_creature_id,
                side: defender_side,
            });

            if !next.side_remaining(defender_side) {
                resolution = Some(match defender_side {
                    CombatantSide::Monster => CombatResolution::PartyVictory,
                    CombatantSide::Character => CombatResolution::PartyDefeat,
                });
            } else if defender_index < next.turn_index {
                next.turn_index -= 1;
            }
        }

        if resolution.is_none() {
            next.turn_index = (next.turn_index + 1) % next.combatants.len();
        }

        Ok(TurnOutcome {
            roll,
            attack_power,
            defend_power,
            hit,
            damage,
            defender_creature_id,
            defender_hp,
            fainted,
            resolution,
            combat: next,
        })
    }
}
