use serde::{Deserialize, Serialize};

use delver_domain::Direction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub character_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonMasterData {
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameData {
    pub num_rows: i32,
    pub num_cols: i32,
    pub min_monsters: i32,
    pub max_monsters: i32,
    pub min_treasures: i32,
    pub max_treasures: i32,
    #[serde(default)]
    pub player: Option<PlayerData>,
    #[serde(default)]
    pub dungeon_master: Option<DungeonMasterData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub row: i32,
    pub col: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpdateGameData {
    pub active: bool,
    pub party_location: LocationData,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovePartyData {
    pub player_id: i64,
    pub direction: Direction,
}
