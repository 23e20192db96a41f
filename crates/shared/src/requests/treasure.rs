use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeData {
    pub min: i32,
    pub max: i32,
}

/// Body for creating or replacing a treasure type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasureTypeData {
    #[serde(default)]
    pub equipment_ids: Vec<i64>,
    #[serde(default)]
    pub consumable_ids: Vec<i64>,
    #[serde(default)]
    pub currency_ids: Vec<i64>,
    #[serde(default)]
    pub num_equipment: Option<RangeData>,
    #[serde(default)]
    pub num_consumables: Option<RangeData>,
    #[serde(default)]
    pub num_currencies: Option<RangeData>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpenTreasureData {
    pub party_id: i64,
}
