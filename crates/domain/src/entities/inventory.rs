//! Items and the capacity-limited inventory that holds them.

use serde::{Deserialize, Serialize};

use crate::entities::creature::{Ability, EquipmentSlot, ABILITY_COUNT};
use crate::error::DomainError;
use crate::ids::{ConsumableId, CurrencyId, EquipmentId, InventoryId};
use crate::value_objects::ItemName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableKind {
    Potion,
    Revive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    Gold,
    Silver,
}

/// A wearable item. Modifiers are positional by [`Ability`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: ItemName,
    pub slot: EquipmentSlot,
    pub ability_modifiers: [i32; ABILITY_COUNT],
}

impl Equipment {
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.ability_modifiers[ability.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: ConsumableId,
    pub name: ItemName,
    pub kind: ConsumableKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub kind: CurrencyKind,
    pub total: u32,
}

/// Catalog entries before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewItem {
    Equipment {
        name: ItemName,
        slot: EquipmentSlot,
        ability_modifiers: [i32; ABILITY_COUNT],
    },
    Consumable {
        name: ItemName,
        kind: ConsumableKind,
    },
    Currency {
        kind: CurrencyKind,
        total: u32,
    },
}

/// A catalog entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum CatalogItem {
    Equipment(Equipment),
    Consumable(Consumable),
    Currency(Currency),
}

impl CatalogItem {
    pub fn raw_id(&self) -> i64 {
        match self {
            CatalogItem::Equipment(item) => item.id.get(),
            CatalogItem::Consumable(item) => item.id.get(),
            CatalogItem::Currency(item) => item.id.get(),
        }
    }
}

/// A creature's item containers.
///
/// Equipment and consumables are bounded by their capacities; currency is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub id: InventoryId,
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
    pub equipment: Vec<Equipment>,
    pub consumables: Vec<Consumable>,
    pub currencies: Vec<Currency>,
}

impl Inventory {
    pub fn empty(id: InventoryId, equipment_capacity: u32, consumables_capacity: u32) -> Self {
        Self {
            id,
            equipment_capacity,
            consumables_capacity,
            equipment: Vec::new(),
            consumables: Vec::new(),
            currencies: Vec::new(),
        }
    }

    pub fn has_equipment_room(&self) -> bool {
        self.equipment.len() < self.equipment_capacity as usize
    }

    pub fn has_consumable_room(&self) -> bool {
        self.consumables.len() < self.consumables_capacity as usize
    }

    /// # Errors
    ///
    /// Returns `DomainError::ContainerFull` when the equipment list is at capacity.
    pub fn add_equipment(&mut self, item: Equipment) -> Result<(), DomainError> {
        if !self.has_equipment_room() {
            return Err(DomainError::container_full(
                self.equipment.len() as u32,
                self.equipment_capacity,
            ));
        }
        self.equipment.push(item);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DomainError::ContainerFull` when the consumable list is at capacity.
    pub fn add_consumable(&mut self, item: Consumable) -> Result<(), DomainError> {
        if !self.has_consumable_room() {
            return Err(DomainError::container_full(
                self.consumables.len() as u32,
                self.consumables_capacity,
            ));
        }
        self.consumables.push(item);
        Ok(())
    }

    pub fn add_currency(&mut self, item: Currency) {
        self.currencies.push(item);
    }

    pub fn equipment_ids(&self) -> Vec<EquipmentId> {
        self.equipment.iter().map(|e| e.id).collect()
    }

    pub fn consumable_ids(&self) -> Vec<ConsumableId> {
        self.consumables.iter().map(|c| c.id).collect()
    }

    pub fn currency_ids(&self) -> Vec<CurrencyId> {
        self.currencies.iter().map(|c| c.id).collect()
    }
}
