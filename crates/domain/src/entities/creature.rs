//! Creatures - characters, monsters and NPCs share one stat model.
//!
//! A creature is stored as four rows (properties, type, inventory, creature)
//! that are created together. Arrays indexed by [`Ability`] and
//! [`EquipmentSlot`] are positional and sized by the enum's variant count.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::inventory::{Equipment, Inventory};
use crate::error::DomainError;
use crate::ids::{
    ConsumableId, CreatureId, CreatureTypeId, CurrencyId, EquipmentId, InventoryId, PropertiesId,
};
use crate::value_objects::CreatureName;

/// Number of entries in an [`AbilityScores`] array.
pub const ABILITY_COUNT: usize = 6;

/// Number of equipment slots on a creature.
pub const EQUIPMENT_SLOT_COUNT: usize = 7;

/// Level assigned to every freshly created creature.
pub const STARTING_LEVEL: u32 = 1;

// ============================================================================
// Vocabulary
// ============================================================================

/// Ability scores, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; ABILITY_COUNT] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Equipment slots, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Head,
    Torso,
    Legs,
    Hands,
    Feet,
    Ring,
    Necklace,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; EQUIPMENT_SLOT_COUNT] = [
        EquipmentSlot::Head,
        EquipmentSlot::Torso,
        EquipmentSlot::Legs,
        EquipmentSlot::Hands,
        EquipmentSlot::Feet,
        EquipmentSlot::Ring,
        EquipmentSlot::Necklace,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureKind {
    Character,
    Monster,
    Npc,
}

impl CreatureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CreatureKind::Character => "character",
            CreatureKind::Monster => "monster",
            CreatureKind::Npc => "npc",
        }
    }
}

impl fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatureClass {
    Fighter,
    Monk,
    Rogue,
    Ranger,
    Wizard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    Dwarf,
    Elf,
    Human,
    Orc,
}

// ============================================================================
// Ability scores
// ============================================================================

/// Fixed-size ability array indexed by [`Ability`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityScores([i32; ABILITY_COUNT]);

impl AbilityScores {
    pub const fn new(scores: [i32; ABILITY_COUNT]) -> Self {
        Self(scores)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        self.0[ability.index()]
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        self.0[ability.index()] = value;
    }

    pub fn as_array(&self) -> &[i32; ABILITY_COUNT] {
        &self.0
    }
}

// ============================================================================
// Creature rows
// ============================================================================

/// Properties that change as a creature levels up or takes damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureProperties {
    pub id: PropertiesId,
    pub level: u32,
    pub xp: u32,
    pub hp: i32,
    pub abilities: AbilityScores,
}

impl CreatureProperties {
    /// Apply damage, flooring hp at zero. Returns the remaining hp.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        self.hp = (self.hp - damage.max(0)).max(0);
        self.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }
}

/// The class x race x kind triple that defines what a creature is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureType {
    pub id: CreatureTypeId,
    pub class: CreatureClass,
    pub race: Race,
    pub kind: CreatureKind,
}

/// Positional equip array; `None` is an empty slot.
pub type EquippedSlots = [Option<Equipment>; EQUIPMENT_SLOT_COUNT];

/// A fully resolved creature with its nested rows and items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub name: CreatureName,
    pub kind: CreatureKind,
    pub properties: CreatureProperties,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub inventory: Inventory,
    pub equipped: EquippedSlots,
}

impl Creature {
    pub fn ability(&self, ability: Ability) -> i32 {
        self.properties.abilities.get(ability)
    }

    pub fn hp(&self) -> i32 {
        self.properties.hp
    }

    pub fn is_fainted(&self) -> bool {
        self.properties.is_fainted()
    }

    pub fn equipped_in(&self, slot: EquipmentSlot) -> Option<&Equipment> {
        self.equipped[slot.index()].as_ref()
    }
}

/// Everything needed to create a creature and its sub-rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCreature {
    pub name: CreatureName,
    pub hp: i32,
    pub abilities: AbilityScores,
    pub class: CreatureClass,
    pub race: Race,
    pub kind: CreatureKind,
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
}

impl NewCreature {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for negative hp.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.hp < 0 {
            return Err(DomainError::validation("Creature hp cannot be negative"));
        }
        Ok(())
    }

    /// Check the requested kind against the kind an operation expects.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming both kinds on mismatch.
    pub fn expect_kind(&self, expected: CreatureKind) -> Result<(), DomainError> {
        if self.kind != expected {
            return Err(DomainError::validation(format!(
                "Could not create {} because type was {}",
                expected, self.kind
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Full-replace update
// ============================================================================

/// Replacement values for an existing creature.
///
/// Sub-row ids are optional on the wire but required here: an update can rewire
/// or rewrite existing rows, never create new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureUpdate {
    pub name: CreatureName,
    pub kind: CreatureKind,
    pub properties: PropertiesUpdate,
    pub creature_type: CreatureTypeUpdate,
    pub inventory: InventoryUpdate,
    pub equipped: [Option<EquipmentId>; EQUIPMENT_SLOT_COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesUpdate {
    pub id: Option<PropertiesId>,
    pub level: u32,
    pub xp: u32,
    pub hp: i32,
    pub abilities: AbilityScores,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureTypeUpdate {
    pub id: Option<CreatureTypeId>,
    pub class: CreatureClass,
    pub race: Race,
    pub kind: CreatureKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub id: Option<InventoryId>,
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
    pub equipment_ids: Vec<EquipmentId>,
    pub consumable_ids: Vec<ConsumableId>,
    pub currency_ids: Vec<CurrencyId>,
}

/// Sub-row ids an update is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTargets {
    pub properties_id: PropertiesId,
    pub type_id: CreatureTypeId,
    pub inventory_id: InventoryId,
}

impl CreatureUpdate {
    /// Validate the update and extract the sub-row ids it targets.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a sub-row id is missing, hp is
    /// negative, or the item lists exceed the inventory capacities.
    pub fn validate(&self) -> Result<UpdateTargets, DomainError> {
        let properties_id = self.properties.id.ok_or_else(|| {
            DomainError::validation("Could not update creature because properties id was missing")
        })?;
        let type_id = self.creature_type.id.ok_or_else(|| {
            DomainError::validation("Could not update creature because type id was missing")
        })?;
        let inventory_id = self.inventory.id.ok_or_else(|| {
            DomainError::validation("Could not update creature because inventory id was missing")
        })?;

        if self.properties.hp < 0 {
            return Err(DomainError::validation("Creature hp cannot be negative"));
        }
        if self.inventory.equipment_ids.len() > self.inventory.equipment_capacity as usize {
            return Err(DomainError::validation(format!(
                "Inventory holds {} equipment but capacity is {}",
                self.inventory.equipment_ids.len(),
                self.inventory.equipment_capacity
            )));
        }
        if self.inventory.consumable_ids.len() > self.inventory.consumables_capacity as usize {
            return Err(DomainError::validation(format!(
                "Inventory holds {} consumables but capacity is {}",
                self.inventory.consumable_ids.len(),
                self.inventory.consumables_capacity
            )));
        }

        Ok(UpdateTargets {
            properties_id,
            type_id,
            inventory_id,
        })
    }
}
