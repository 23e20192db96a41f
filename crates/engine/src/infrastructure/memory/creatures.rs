//! Creature and item catalog tables.

use async_trait::async_trait;
use delver_domain::{
    CatalogItem, Consumable, ConsumableId, Creature, CreatureId, CreatureKind, CreatureProperties,
    CreatureType, CreatureUpdate, Currency, CurrencyId, Equipment, EquipmentId, Inventory,
    InventoryId, NewCreature, NewItem, UpdateTargets, STARTING_LEVEL,
};

use super::{CreatureRow, CreatureTypeRow, InventoryRow, MemoryStore, PropertiesRow, Tables};
use crate::infrastructure::ports::{CreatureRepo, ItemRepo, RepoError};

impl Tables {
    pub(super) fn insert_creature(&mut self, new: &NewCreature) -> Result<CreatureId, RepoError> {
        self.before_insert("properties")?;
        let properties_id = self.next_id();
        self.properties.insert(
            properties_id,
            PropertiesRow {
                level: STARTING_LEVEL,
                xp: 0,
                hp: new.hp,
                abilities: new.abilities,
            },
        );

        self.before_insert("creature_types")?;
        let type_id = self.next_id();
        self.creature_types.insert(
            type_id,
            CreatureTypeRow {
                class: new.class,
                race: new.race,
                kind: new.kind,
            },
        );

        self.before_insert("inventories")?;
        let inventory_id = self.next_id();
        self.inventories.insert(
            inventory_id,
            InventoryRow {
                equipment_capacity: new.equipment_capacity,
                consumables_capacity: new.consumables_capacity,
                equipment_ids: Vec::new(),
                consumable_ids: Vec::new(),
                currency_ids: Vec::new(),
            },
        );

        self.before_insert("creatures")?;
        let id = self.next_id();
        self.creatures.insert(
            id,
            CreatureRow {
                name: new.name.clone(),
                kind: new.kind,
                properties_id,
                type_id,
                inventory_id,
                equipped: Default::default(),
            },
        );
        Ok(id)
    }

    pub(super) fn creature(&self, id: CreatureId) -> Result<Option<Creature>, RepoError> {
        let Some(row) = self.creatures.get(&id) else {
            return Ok(None);
        };
        let properties = self
            .properties
            .get(&row.properties_id)
            .ok_or_else(|| RepoError::not_found("CreatureProperties", row.properties_id))?;
        let creature_type = self
            .creature_types
            .get(&row.type_id)
            .ok_or_else(|| RepoError::not_found("CreatureType", row.type_id))?;

        let mut equipped: [Option<Equipment>; delver_domain::EQUIPMENT_SLOT_COUNT] =
            Default::default();
        for (slot, equipment_id) in row.equipped.iter().enumerate() {
            if let Some(equipment_id) = equipment_id {
                equipped[slot] = Some(self.equipment_item(*equipment_id)?);
            }
        }

        Ok(Some(Creature {
            id,
            name: row.name.clone(),
            kind: row.kind,
            properties: CreatureProperties {
                id: row.properties_id,
                level: properties.level,
                xp: properties.xp,
                hp: properties.hp,
                abilities: properties.abilities,
            },
            creature_type: CreatureType {
                id: row.type_id,
                class: creature_type.class,
                race: creature_type.race,
                kind: creature_type.kind,
            },
            inventory: self.inventory(row.inventory_id)?,
            equipped,
        }))
    }

    pub(super) fn inventory(&self, id: InventoryId) -> Result<Inventory, RepoError> {
        let row = self
            .inventories
            .get(&id)
            .ok_or_else(|| RepoError::not_found("Inventory", id))?;
        Ok(Inventory {
            id,
            equipment_capacity: row.equipment_capacity,
            consumables_capacity: row.consumables_capacity,
            equipment: self.equipment_items(&row.equipment_ids)?,
            consumables: self.consumable_items(&row.consumable_ids)?,
            currencies: self.currency_items(&row.currency_ids)?,
        })
    }

    /// Overwrite an inventory's item lists with those of `inventory`.
    pub(super) fn save_inventory_items(&mut self, inventory: &Inventory) -> Result<(), RepoError> {
        let row = self
            .inventories
            .get_mut(&inventory.id)
            .ok_or_else(|| RepoError::not_found("Inventory", inventory.id))?;
        row.equipment_ids = inventory.equipment_ids();
        row.consumable_ids = inventory.consumable_ids();
        row.currency_ids = inventory.currency_ids();
        Ok(())
    }

    pub(super) fn set_hp(&mut self, creature_id: CreatureId, hp: i32) -> Result<(), RepoError> {
        let properties_id = self
            .creatures
            .get(&creature_id)
            .map(|row| row.properties_id)
            .ok_or_else(|| RepoError::not_found("Creature", creature_id))?;
        let properties = self
            .properties
            .get_mut(&properties_id)
            .ok_or_else(|| RepoError::not_found("CreatureProperties", properties_id))?;
        properties.hp = hp;
        Ok(())
    }

    fn equipment_item(&self, id: EquipmentId) -> Result<Equipment, RepoError> {
        self.equipment
            .get(&id)
            .cloned()
            .ok_or_else(|| RepoError::not_found("Equipment", id))
    }

    fn equipment_items(&self, ids: &[EquipmentId]) -> Result<Vec<Equipment>, RepoError> {
        ids.iter().map(|id| self.equipment_item(*id)).collect()
    }

    fn consumable_items(&self, ids: &[ConsumableId]) -> Result<Vec<Consumable>, RepoError> {
        ids.iter()
            .map(|id| {
                self.consumables
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RepoError::not_found("Consumable", id))
            })
            .collect()
    }

    fn currency_items(&self, ids: &[CurrencyId]) -> Result<Vec<Currency>, RepoError> {
        ids.iter()
            .map(|id| {
                self.currencies
                    .get(id)
                    .cloned()
                    .ok_or_else(|| RepoError::not_found("Currency", id))
            })
            .collect()
    }

    fn apply_creature_update(
        &mut self,
        id: CreatureId,
        update: &CreatureUpdate,
        targets: UpdateTargets,
    ) -> Result<(), RepoError> {
        if !self.creatures.contains_key(&id) {
            return Err(RepoError::not_found("Creature", id));
        }
        // Referenced items must exist before any row is touched.
        self.equipment_items(&update.inventory.equipment_ids)?;
        self.consumable_items(&update.inventory.consumable_ids)?;
        self.currency_items(&update.inventory.currency_ids)?;
        for equipment_id in update.equipped.iter().flatten() {
            self.equipment_item(*equipment_id)?;
        }

        let properties = self
            .properties
            .get_mut(&targets.properties_id)
            .ok_or_else(|| RepoError::not_found("CreatureProperties", targets.properties_id))?;
        properties.level = update.properties.level;
        properties.xp = update.properties.xp;
        properties.hp = update.properties.hp;
        properties.abilities = update.properties.abilities;

        let creature_type = self
            .creature_types
            .get_mut(&targets.type_id)
            .ok_or_else(|| RepoError::not_found("CreatureType", targets.type_id))?;
        creature_type.class = update.creature_type.class;
        creature_type.race = update.creature_type.race;
        creature_type.kind = update.creature_type.kind;

        let inventory = self
            .inventories
            .get_mut(&targets.inventory_id)
            .ok_or_else(|| RepoError::not_found("Inventory", targets.inventory_id))?;
        inventory.equipment_capacity = update.inventory.equipment_capacity;
        inventory.consumables_capacity = update.inventory.consumables_capacity;
        inventory.equipment_ids = update.inventory.equipment_ids.clone();
        inventory.consumable_ids = update.inventory.consumable_ids.clone();
        inventory.currency_ids = update.inventory.currency_ids.clone();

        let row = self
            .creatures
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Creature", id))?;
        row.name = update.name.clone();
        row.kind = update.kind;
        row.properties_id = targets.properties_id;
        row.type_id = targets.type_id;
        row.inventory_id = targets.inventory_id;
        row.equipped = update.equipped;
        Ok(())
    }
}

#[async_trait]
impl CreatureRepo for MemoryStore {
    async fn create(&self, creature: &NewCreature) -> Result<Creature, RepoError> {
        self.transact("create_creature", |tables| {
            let id = tables.insert_creature(creature)?;
            tables
                .creature(id)?
                .ok_or_else(|| RepoError::not_found("Creature", id))
        })
        .await
    }

    async fn get(&self, id: CreatureId) -> Result<Option<Creature>, RepoError> {
        self.read("get_creature", |tables| tables.creature(id)).await
    }

    async fn list(
        &self,
        ids: &[CreatureId],
        kind: Option<CreatureKind>,
    ) -> Result<Vec<Creature>, RepoError> {
        self.read("list_creatures", |tables| {
            let mut selected: Vec<CreatureId> = if ids.is_empty() {
                let mut all: Vec<CreatureId> = tables.creatures.keys().copied().collect();
                all.sort();
                all
            } else {
                ids.to_vec()
            };
            selected.retain(|id| {
                tables
                    .creatures
                    .get(id)
                    .is_some_and(|row| kind.map_or(true, |k| row.kind == k))
            });

            let mut creatures = Vec::with_capacity(selected.len());
            for id in selected {
                if let Some(creature) = tables.creature(id)? {
                    creatures.push(creature);
                }
            }
            Ok(creatures)
        })
        .await
    }

    async fn update(
        &self,
        id: CreatureId,
        update: &CreatureUpdate,
        targets: UpdateTargets,
    ) -> Result<Creature, RepoError> {
        self.transact("update_creature", |tables| {
            tables.apply_creature_update(id, update, targets)?;
            tables
                .creature(id)?
                .ok_or_else(|| RepoError::not_found("Creature", id))
        })
        .await
    }

    async fn delete(&self, id: CreatureId) -> Result<(), RepoError> {
        self.transact("delete_creature", |tables| {
            if tables.combatants.values().any(|c| c.creature_id == id) {
                return Err(RepoError::conflict(format!(
                    "Creature {} is fighting in a combat",
                    id
                )));
            }
            let row = tables
                .creatures
                .remove(&id)
                .ok_or_else(|| RepoError::not_found("Creature", id))?;
            tables.properties.remove(&row.properties_id);
            tables.creature_types.remove(&row.type_id);
            tables.inventories.remove(&row.inventory_id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ItemRepo for MemoryStore {
    async fn create(&self, item: &NewItem) -> Result<CatalogItem, RepoError> {
        self.transact("create_item", |tables| {
            let created = match item {
                NewItem::Equipment {
                    name,
                    slot,
                    ability_modifiers,
                } => {
                    tables.before_insert("equipment")?;
                    let equipment = Equipment {
                        id: tables.next_id(),
                        name: name.clone(),
                        slot: *slot,
                        ability_modifiers: *ability_modifiers,
                    };
                    tables.equipment.insert(equipment.id, equipment.clone());
                    CatalogItem::Equipment(equipment)
                }
                NewItem::Consumable { name, kind } => {
                    tables.before_insert("consumables")?;
                    let consumable = Consumable {
                        id: tables.next_id(),
                        name: name.clone(),
                        kind: *kind,
                    };
                    tables.consumables.insert(consumable.id, consumable.clone());
                    CatalogItem::Consumable(consumable)
                }
                NewItem::Currency { kind, total } => {
                    tables.before_insert("currencies")?;
                    let currency = Currency {
                        id: tables.next_id(),
                        kind: *kind,
                        total: *total,
                    };
                    tables.currencies.insert(currency.id, currency.clone());
                    CatalogItem::Currency(currency)
                }
            };
            Ok(created)
        })
        .await
    }

    async fn get_equipment(&self, ids: &[EquipmentId]) -> Result<Vec<Equipment>, RepoError> {
        self.read("get_equipment", |tables| tables.equipment_items(ids))
            .await
    }

    async fn get_consumables(&self, ids: &[ConsumableId]) -> Result<Vec<Consumable>, RepoError> {
        self.read("get_consumables", |tables| tables.consumable_items(ids))
            .await
    }

    async fn get_currencies(&self, ids: &[CurrencyId]) -> Result<Vec<Currency>, RepoError> {
        self.read("get_currencies", |tables| tables.currency_items(ids))
            .await
    }
}
