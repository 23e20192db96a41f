use serde::{Deserialize, Serialize};

use super::LocationData;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeginCombatData {
    pub location: LocationData,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TakeTurnData {
    pub attacker_id: i64,
    pub defender_id: i64,
}
