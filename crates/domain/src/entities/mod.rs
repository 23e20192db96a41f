//! Domain entities - Core business objects with identity

mod combat;
mod creature;
mod game;
mod game_map;
mod inventory;
mod party;
mod treasure;

pub use combat::{order_combatants, Combat, Combatant, CombatantSide, NewCombatant};
pub use creature::{
    Ability, AbilityScores, Creature, CreatureClass, CreatureKind, CreatureProperties,
    CreatureType, CreatureTypeUpdate, CreatureUpdate, EquipmentSlot, EquippedSlots,
    InventoryUpdate, NewCreature, PropertiesUpdate, Race, UpdateTargets, ABILITY_COUNT,
    EQUIPMENT_SLOT_COUNT, STARTING_LEVEL,
};
pub use game::{
    monster_template, Game, GameSettings, GameSummary, NewGame, PlacedMonster, PlacedTreasure,
    MAX_MONSTERS_ON_MAP, MAX_TREASURES_ON_MAP, MONSTER_HP_MAX, MONSTER_HP_MIN,
};
pub use game_map::{
    GameMap, Interaction, InteractionGrid, InteractionType, MapDimensions, INTERACTION_STRIDE,
    MAX_MAP_DIMENSION,
};
pub use inventory::{
    CatalogItem, Consumable, ConsumableKind, Currency, CurrencyKind, Equipment, Inventory, NewItem,
};
pub use party::{DungeonMaster, NewDungeonMaster, NewPlayer, Party, Player, MAX_PLAYERS};
pub use treasure::{
    distribute_loot, roll_loot, DistributionReport, LootTable, ResolvedLoot, RolledLoot,
    Treasure, TreasureType,
};
