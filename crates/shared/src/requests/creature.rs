use serde::{Deserialize, Serialize};

use delver_domain::{CreatureClass, CreatureKind, Race, ABILITY_COUNT, EQUIPMENT_SLOT_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCreatureData {
    pub name: String,
    pub hp: i32,
    pub abilities: [i32; ABILITY_COUNT],
    pub class: CreatureClass,
    pub race: Race,
    pub creature_type: CreatureKind,
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
}

/// Full replacement of a creature. Sub-object ids must reference existing rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCreatureData {
    pub name: String,
    pub creature_type: CreatureKind,
    pub properties: PropertiesData,
    #[serde(rename = "type")]
    pub type_data: CreatureTypeData,
    pub inventory: InventoryData,
    #[serde(default)]
    pub equipped: [Option<i64>; EQUIPMENT_SLOT_COUNT],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertiesData {
    #[serde(default)]
    pub id: Option<i64>,
    pub level: u32,
    pub xp: u32,
    pub hp: i32,
    pub abilities: [i32; ABILITY_COUNT],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureTypeData {
    #[serde(default)]
    pub id: Option<i64>,
    pub class: CreatureClass,
    pub race: Race,
    pub creature_type: CreatureKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryData {
    #[serde(default)]
    pub id: Option<i64>,
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
    #[serde(default)]
    pub equipment_ids: Vec<i64>,
    #[serde(default)]
    pub consumable_ids: Vec<i64>,
    #[serde(default)]
    pub currency_ids: Vec<i64>,
}

/// `?ids=1,2,3` filter for creature listings. Absent or empty means all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCreaturesQuery {
    #[serde(default)]
    pub ids: Option<String>,
}

impl ListCreaturesQuery {
    /// Parse the comma separated id list.
    pub fn parse_ids(&self) -> Result<Vec<i64>, String> {
        let Some(raw) = self.ids.as_deref() else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<i64>().map_err(|_| format!("Invalid id '{}'", s)))
            .collect()
    }
}
