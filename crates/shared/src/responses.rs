//! Response bodies and the error envelope.
//!
//! Every domain aggregate the HTTP surface returns has a wire twin here with
//! raw ids, plus a `From` conversion from the domain type.

use serde::{Deserialize, Serialize};

use delver_domain::{
    Combat, Combatant, CombatantSide, CombatResolution, Consumable, ConsumableKind, Creature,
    CreatureClass, CreatureKind, Currency, CurrencyKind, DistributionReport, DungeonMaster,
    Equipment, EquipmentSlot, Game, GameMap, GameSummary, InteractionType, Inventory, Party,
    Player, Race, TreasureType, TurnOutcome, ABILITY_COUNT, EQUIPMENT_SLOT_COUNT,
};

use crate::requests::{LocationData, RangeData};

// =============================================================================
// Envelopes
// =============================================================================

/// `{ "errors": [ { "message": ... } ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorMessage {
                message: message.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// =============================================================================
// Items and inventory
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentResponse {
    pub id: i64,
    pub name: String,
    pub slot: EquipmentSlot,
    pub ability_modifiers: [i32; ABILITY_COUNT],
}

impl From<&Equipment> for EquipmentResponse {
    fn from(item: &Equipment) -> Self {
        Self {
            id: item.id.get(),
            name: item.name.to_string(),
            slot: item.slot,
            ability_modifiers: item.ability_modifiers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumableResponse {
    pub id: i64,
    pub name: String,
    pub kind: ConsumableKind,
}

impl From<&Consumable> for ConsumableResponse {
    fn from(item: &Consumable) -> Self {
        Self {
            id: item.id.get(),
            name: item.name.to_string(),
            kind: item.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyResponse {
    pub id: i64,
    pub kind: CurrencyKind,
    pub total: u32,
}

impl From<&Currency> for CurrencyResponse {
    fn from(item: &Currency) -> Self {
        Self {
            id: item.id.get(),
            kind: item.kind,
            total: item.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub id: i64,
    pub equipment_capacity: u32,
    pub consumables_capacity: u32,
    pub equipment: Vec<EquipmentResponse>,
    pub consumables: Vec<ConsumableResponse>,
    pub currencies: Vec<CurrencyResponse>,
}

impl From<&Inventory> for InventoryResponse {
    fn from(inventory: &Inventory) -> Self {
        Self {
            id: inventory.id.get(),
            equipment_capacity: inventory.equipment_capacity,
            consumables_capacity: inventory.consumables_capacity,
            equipment: inventory.equipment.iter().map(Into::into).collect(),
            consumables: inventory.consumables.iter().map(Into::into).collect(),
            currencies: inventory.currencies.iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Creatures
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesResponse {
    pub id: i64,
    pub level: u32,
    pub xp: u32,
    pub hp: i32,
    pub abilities: [i32; ABILITY_COUNT],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureTypeResponse {
    pub id: i64,
    pub class: CreatureClass,
    pub race: Race,
    pub creature_type: CreatureKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureResponse {
    pub id: i64,
    pub name: String,
    pub creature_type: CreatureKind,
    pub properties: PropertiesResponse,
    #[serde(rename = "type")]
    pub type_info: CreatureTypeResponse,
    pub inventory: InventoryResponse,
    pub equipped: [Option<EquipmentResponse>; EQUIPMENT_SLOT_COUNT],
}

impl From<&Creature> for CreatureResponse {
    fn from(creature: &Creature) -> Self {
        Self {
            id: creature.id.get(),
            name: creature.name.to_string(),
            creature_type: creature.kind,
            properties: PropertiesResponse {
                id: creature.properties.id.get(),
                level: creature.properties.level,
                xp: creature.properties.xp,
                hp: creature.properties.hp,
                abilities: *creature.properties.abilities.as_array(),
            },
            type_info: CreatureTypeResponse {
                id: creature.creature_type.id.get(),
                class: creature.creature_type.class,
                race: creature.creature_type.race,
                creature_type: creature.creature_type.kind,
            },
            inventory: (&creature.inventory).into(),
            equipped: std::array::from_fn(|slot| {
                creature.equipped[slot].as_ref().map(EquipmentResponse::from)
            }),
        }
    }
}

// =============================================================================
// Treasure
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureTypeResponse {
    pub id: i64,
    pub equipment_ids: Vec<i64>,
    pub consumable_ids: Vec<i64>,
    pub currency_ids: Vec<i64>,
    pub num_equipment: Option<RangeData>,
    pub num_consumables: Option<RangeData>,
    pub num_currencies: Option<RangeData>,
}

impl From<&TreasureType> for TreasureTypeResponse {
    fn from(treasure_type: &TreasureType) -> Self {
        let range = |r: Option<delver_domain::Range>| {
            r.map(|r| RangeData {
                min: r.min(),
                max: r.max(),
            })
        };
        let loot = &treasure_type.loot;
        Self {
            id: treasure_type.id.get(),
            equipment_ids: loot.equipment_ids.iter().map(|id| id.get()).collect(),
            consumable_ids: loot.consumable_ids.iter().map(|id| id.get()).collect(),
            currency_ids: loot.currency_ids.iter().map(|id| id.get()).collect(),
            num_equipment: range(loot.num_equipment),
            num_consumables: range(loot.num_consumables),
            num_currencies: range(loot.num_currencies),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResponse {
    pub delivered: usize,
    pub dropped: usize,
}

impl From<DistributionReport> for DistributionResponse {
    fn from(report: DistributionReport) -> Self {
        Self {
            delivered: report.delivered,
            dropped: report.dropped,
        }
    }
}

// =============================================================================
// Games
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
    pub character_id: Option<i64>,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.get(),
            user_id: player.user_id.to_string(),
            user_name: player.user_name.to_string(),
            character_id: player.character_id.map(|id| id.get()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonMasterResponse {
    pub id: i64,
    pub user_id: String,
    pub user_name: String,
}

impl From<&DungeonMaster> for DungeonMasterResponse {
    fn from(dm: &DungeonMaster) -> Self {
        Self {
            id: dm.id.get(),
            user_id: dm.user_id.to_string(),
            user_name: dm.user_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyResponse {
    pub id: i64,
    pub players: Vec<PlayerResponse>,
    pub location: LocationData,
}

impl From<&Party> for PartyResponse {
    fn from(party: &Party) -> Self {
        Self {
            id: party.id.get(),
            players: party.players.iter().map(Into::into).collect(),
            location: LocationData {
                row: party.location.row,
                col: party.location.col,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub row: i32,
    pub col: i32,
    pub id: i64,
    pub interaction_type: InteractionType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResponse {
    pub id: i64,
    pub num_rows: i32,
    pub num_cols: i32,
    pub interactions: Vec<InteractionResponse>,
}

impl From<&GameMap> for MapResponse {
    fn from(map: &GameMap) -> Self {
        let mut interactions: Vec<InteractionResponse> = map
            .interactions
            .iter()
            .map(|(location, interaction)| InteractionResponse {
                row: location.row,
                col: location.col,
                id: interaction.id,
                interaction_type: interaction.interaction_type,
            })
            .collect();
        // Stable output; tile order within one tile is preserved by the stable sort.
        interactions.sort_by_key(|i| (i.row, i.col));
        Self {
            id: map.id.get(),
            num_rows: map.num_rows,
            num_cols: map.num_cols,
            interactions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: i64,
    pub active: bool,
    pub party: PartyResponse,
    pub dungeon_master: Option<DungeonMasterResponse>,
    pub map: MapResponse,
    pub combat_id: Option<i64>,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id.get(),
            active: game.active,
            party: (&game.party).into(),
            dungeon_master: game.dungeon_master.as_ref().map(Into::into),
            map: (&game.map).into(),
            combat_id: game.combat_id.map(|id| id.get()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyEntryResponse {
    pub game_id: i64,
    pub player_count: usize,
    pub has_dungeon_master: bool,
}

impl From<&GameSummary> for LobbyEntryResponse {
    fn from(summary: &GameSummary) -> Self {
        Self {
            game_id: summary.game_id.get(),
            player_count: summary.player_ids.len(),
            has_dungeon_master: summary.dungeon_master_id.is_some(),
        }
    }
}

// =============================================================================
// Combat
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantResponse {
    pub id: i64,
    pub side: CombatantSide,
    pub creature: CreatureResponse,
}

impl From<&Combatant> for CombatantResponse {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id.get(),
            side: combatant.side,
            creature: (&combatant.creature).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResponse {
    pub id: i64,
    pub game_id: i64,
    pub combatant_turn_index: usize,
    pub combatants: Vec<CombatantResponse>,
    pub fainted_monster_ids: Vec<i64>,
    pub fainted_character_ids: Vec<i64>,
}

impl From<&Combat> for CombatResponse {
    fn from(combat: &Combat) -> Self {
        Self {
            id: combat.id.get(),
            game_id: combat.game_id.get(),
            combatant_turn_index: combat.turn_index,
            combatants: combat.combatants.iter().map(Into::into).collect(),
            fainted_monster_ids: combat.fainted_monster_ids.iter().map(|id| id.get()).collect(),
            fainted_character_ids: combat
                .fainted_character_ids
                .iter()
                .map(|id| id.get())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub roll: i32,
    pub attack_power: i32,
    pub defend_power: i32,
    pub hit: bool,
    pub damage: i32,
    pub defender_hp: i32,
    pub fainted_creature_id: Option<i64>,
    pub resolution: Option<CombatResolution>,
    /// Absent once the combat has been resolved and deleted.
    pub combat: Option<CombatResponse>,
}

impl From<&TurnOutcome> for TurnResponse {
    fn from(outcome: &TurnOutcome) -> Self {
        Self {
            roll: outcome.roll,
            attack_power: outcome.attack_power,
            defend_power: outcome.defend_power,
            hit: outcome.hit,
            damage: outcome.damage,
            defender_hp: outcome.defender_hp,
            fainted_creature_id: outcome.fainted.map(|f| f.creature_id.get()),
            resolution: outcome.resolution,
            combat: (!outcome.is_final()).then(|| (&outcome.combat).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let body = serde_json::to_value(ErrorResponse::single("Game not found")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "errors": [ { "message": "Game not found" } ] })
        );
    }
}
