//! In-memory storage adapter.
//!
//! Rows mirror a relational layout: a creature is four rows, the interaction
//! grid is stored flattened, inventories and combats store id lists. Every
//! port method runs inside [`MemoryStore::transact`], which stages changes on
//! a copy of the tables and swaps it in only when the whole write succeeds.

mod combats;
mod creatures;
mod games;
mod treasures;

use std::collections::HashMap;

use delver_domain::{
    AbilityScores, CombatId, CombatantId, CombatantSide, Consumable, ConsumableId, CreatureClass,
    CreatureId, CreatureKind, CreatureName, CreatureTypeId, Currency, CurrencyId, DisplayName, DungeonMasterId,
    Equipment, EquipmentId, GameId, GameMapId, InventoryId, Location, LootTable, PartyId,
    PlayerId, PropertiesId, Race, TreasureId, TreasureTypeId, UserId, EQUIPMENT_SLOT_COUNT,
};
use tokio::sync::RwLock;

use crate::infrastructure::ports::RepoError;

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone)]
pub(super) struct PropertiesRow {
    pub level: u32,
    pub xp: u32,
    pub hp: i32,
    pub abilities: AbilityScores,
}

#[derive(Debug, Clone)]
pub(super) struct CreatureTypeRow {
    pub class: CreatureClass,
    pub race: Race,
    pub kind: CreatureKind,
}

#[derive(Debug, Clone)]
pub(super) struct InventoryRow {
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
    pub equipment_ids: Vec<EquipmentId>,
    pub consumable_ids: Vec<ConsumableId>,
    pub currency_ids: Vec<CurrencyId>,
}

#[derive(Debug, Clone)]
pub(super) struct CreatureRow {
    pub name: CreatureName,
    pub kind: CreatureKind,
    pub properties_id: PropertiesId,
    pub type_id: CreatureTypeId,
    pub inventory_id: InventoryId,
    pub equipped: [Option<EquipmentId>; EQUIPMENT_SLOT_COUNT],
}

#[derive(Debug, Clone)]
pub(super) struct TreasureRow {
    pub treasure_type_id: TreasureTypeId,
    pub opened: bool,
}

#[derive(Debug, Clone)]
pub(super) struct PlayerRow {
    pub user_id: UserId,
    pub user_name: DisplayName,
    pub character_id: Option<CreatureId>,
}

#[derive(Debug, Clone)]
pub(super) struct DungeonMasterRow {
    pub user_id: UserId,
    pub user_name: DisplayName,
}

#[derive(Debug, Clone)]
pub(super) struct PartyRow {
    pub player_ids: Vec<PlayerId>,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub(super) struct MapRow {
    pub num_rows: i32,
    pub num_cols: i32,
    /// Flattened `(row, col, id, type)` quadruples.
    pub interactions: Vec<i64>,
}

#[derive(Debug, Clone)]
pub(super) struct GameRow {
    pub party_id: PartyId,
    pub dungeon_master_id: Option<DungeonMasterId>,
    pub map_id: GameMapId,
    pub combat_id: Option<CombatId>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub(super) struct CombatRow {
    pub game_id: GameId,
    pub turn_index: usize,
    pub combatant_ids: Vec<CombatantId>,
    pub fainted_monster_ids: Vec<CreatureId>,
    pub fainted_character_ids: Vec<CreatureId>,
}

#[derive(Debug, Clone)]
pub(super) struct CombatantRow {
    pub creature_id: CreatureId,
    pub side: CombatantSide,
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Default)]
pub(super) struct Tables {
    sequence: i64,
    pub properties: HashMap<PropertiesId, PropertiesRow>,
    pub creature_types: HashMap<CreatureTypeId, CreatureTypeRow>,
    pub inventories: HashMap<InventoryId, InventoryRow>,
    pub creatures: HashMap<CreatureId, CreatureRow>,
    pub equipment: HashMap<EquipmentId, Equipment>,
    pub consumables: HashMap<ConsumableId, Consumable>,
    pub currencies: HashMap<CurrencyId, Currency>,
    pub treasure_types: HashMap<TreasureTypeId, LootTable>,
    pub treasures: HashMap<TreasureId, TreasureRow>,
    pub players: HashMap<PlayerId, PlayerRow>,
    pub dungeon_masters: HashMap<DungeonMasterId, DungeonMasterRow>,
    pub parties: HashMap<PartyId, PartyRow>,
    pub maps: HashMap<GameMapId, MapRow>,
    pub games: HashMap<GameId, GameRow>,
    pub combats: HashMap<CombatId, CombatRow>,
    pub combatants: HashMap<CombatantId, CombatantRow>,
    #[cfg(test)]
    fail_on_insert: Option<&'static str>,
}

impl Tables {
    /// Next id from the shared sequence. Ids are unique across tables.
    pub fn next_id<T: From<i64>>(&mut self) -> T {
        self.sequence += 1;
        T::from(self.sequence)
    }

    /// Hook for injecting a storage failure on insert into `table`.
    #[cfg(test)]
    pub fn before_insert(&self, table: &'static str) -> Result<(), RepoError> {
        if self.fail_on_insert == Some(table) {
            return Err(RepoError::database("insert", format!("injected failure on {}", table)));
        }
        Ok(())
    }

    #[cfg(not(test))]
    pub fn before_insert(&self, _table: &'static str) -> Result<(), RepoError> {
        Ok(())
    }
}

// =============================================================================
// Store
// =============================================================================

/// Process-local storage implementing every repository port.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn read<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Tables) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let tables = self.tables.read().await;
        f(&tables).inspect_err(|e| tracing::debug!(operation, error = %e, "Storage read failed"))
    }

    /// Run `f` against a staged copy of the tables; commit only on success.
    async fn transact<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Tables) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();
        match f(&mut staged) {
            Ok(value) => {
                *tables = staged;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(operation, error = %e, "Storage write rolled back");
                Err(e)
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn fail_inserts_into(&self, table: Option<&'static str>) {
        self.tables.write().await.fail_on_insert = table;
    }

    #[cfg(test)]
    pub(crate) async fn row_counts(&self) -> RowCounts {
        let t = self.tables.read().await;
        RowCounts {
            properties: t.properties.len(),
            creature_types: t.creature_types.len(),
            inventories: t.inventories.len(),
            creatures: t.creatures.len(),
            treasures: t.treasures.len(),
            games: t.games.len(),
            combats: t.combats.len(),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RowCounts {
    pub properties: usize,
    pub creature_types: usize,
    pub inventories: usize,
    pub creatures: usize,
    pub treasures: usize,
    pub games: usize,
    pub combats: usize,
}

/// Map a domain rule broken by stored data to a storage error.
fn corrupt(e: delver_domain::DomainError) -> RepoError {
    RepoError::serialization(e)
}
