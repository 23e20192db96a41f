//! Repository port traits for storage access.

use async_trait::async_trait;
use delver_domain::*;

use super::error::RepoError;
use super::types::{GameStateUpdate, TreasureOpening};

// =============================================================================
// Creatures and items
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreatureRepo: Send + Sync {
    /// Insert properties, type, inventory and creature rows as one unit.
    async fn create(&self, creature: &NewCreature) -> Result<Creature, RepoError>;
    async fn get(&self, id: CreatureId) -> Result<Option<Creature>, RepoError>;
    /// Bulk fetch. An empty `ids` slice means every creature (of `kind`, if given).
    async fn list(
        &self,
        ids: &[CreatureId],
        kind: Option<CreatureKind>,
    ) -> Result<Vec<Creature>, RepoError>;
    /// Rewrite an existing creature and the sub-rows named by `targets`.
    async fn update(
        &self,
        id: CreatureId,
        update: &CreatureUpdate,
        targets: UpdateTargets,
    ) -> Result<Creature, RepoError>;
    async fn delete(&self, id: CreatureId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn create(&self, item: &NewItem) -> Result<CatalogItem, RepoError>;
    /// Items in request order; a repeated id yields a repeated item.
    async fn get_equipment(&self, ids: &[EquipmentId]) -> Result<Vec<Equipment>, RepoError>;
    async fn get_consumables(&self, ids: &[ConsumableId]) -> Result<Vec<Consumable>, RepoError>;
    async fn get_currencies(&self, ids: &[CurrencyId]) -> Result<Vec<Currency>, RepoError>;
}

// =============================================================================
// Treasure
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TreasureRepo: Send + Sync {
    async fn create_type(&self, loot: &LootTable) -> Result<TreasureType, RepoError>;
    async fn get_type(&self, id: TreasureTypeId) -> Result<Option<TreasureType>, RepoError>;
    async fn list_types(&self) -> Result<Vec<TreasureType>, RepoError>;
    async fn update_type(&self, treasure_type: &TreasureType) -> Result<(), RepoError>;
    /// Returns `false` when no such type exists.
    async fn delete_type(&self, id: TreasureTypeId) -> Result<bool, RepoError>;

    async fn get(&self, id: TreasureId) -> Result<Option<Treasure>, RepoError>;
    /// Mark the treasure opened and save the loot, or fail with `Conflict`
    /// if it was opened in the meantime.
    async fn commit_opening(&self, opening: &TreasureOpening) -> Result<(), RepoError>;
}

// =============================================================================
// Games
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepo: Send + Sync {
    /// Persist a generated game, including its monsters and treasures, as one unit.
    async fn create(&self, game: &NewGame) -> Result<Game, RepoError>;
    async fn get(&self, id: GameId) -> Result<Option<Game>, RepoError>;
    async fn list_summaries(&self) -> Result<Vec<GameSummary>, RepoError>;
    async fn get_party(&self, id: PartyId) -> Result<Option<Party>, RepoError>;

    async fn add_player(&self, game_id: GameId, player: &NewPlayer) -> Result<Player, RepoError>;
    async fn assign_dungeon_master(
        &self,
        game_id: GameId,
        dungeon_master: &NewDungeonMaster,
    ) -> Result<DungeonMaster, RepoError>;
    async fn update_state(&self, game_id: GameId, state: GameStateUpdate) -> Result<(), RepoError>;
}

// =============================================================================
// Combat
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CombatRepo: Send + Sync {
    /// Create the combat, its combatants and the game link as one unit.
    async fn create(
        &self,
        game_id: GameId,
        combatants: &[NewCombatant],
    ) -> Result<Combat, RepoError>;
    async fn get(&self, id: CombatId) -> Result<Option<Combat>, RepoError>;
    /// Save the defender's hp together with the next combat state, or delete
    /// the combat when the outcome is final.
    async fn record_turn(&self, outcome: &TurnOutcome) -> Result<(), RepoError>;
}
