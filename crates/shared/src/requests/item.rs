use serde::{Deserialize, Serialize};

use delver_domain::{ConsumableKind, CurrencyKind, EquipmentSlot, ABILITY_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEquipmentData {
    pub name: String,
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub ability_modifiers: [i32; ABILITY_COUNT],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConsumableData {
    pub name: String,
    pub kind: ConsumableKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCurrencyData {
    pub kind: CurrencyKind,
    pub total: u32,
}
