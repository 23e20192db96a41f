//! Request bodies, one module per feature area.

mod combat;
mod creature;
mod game;
mod item;
mod treasure;

pub use combat::{BeginCombatData, TakeTurnData};
pub use creature::{
    CreateCreatureData, CreatureTypeData, InventoryData, ListCreaturesQuery, PropertiesData,
    UpdateCreatureData,
};
pub use game::{
    CreateGameData, DungeonMasterData, LocationData, MovePartyData, PlayerData, UpdateGameData,
};
pub use item::{CreateConsumableData, CreateCurrencyData, CreateEquipmentData};
pub use treasure::{OpenTreasureData, RangeData, TreasureTypeData};
