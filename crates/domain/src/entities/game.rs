//! The game aggregate and procedural game generation.
//!
//! A game owns its party, its map and (while one runs) its combat. Creation
//! is planned here as pure data: counts, monster stats and tiles are rolled
//! up front, and storage persists the whole plan in one unit.

use serde::{Deserialize, Serialize};

use crate::entities::creature::{AbilityScores, CreatureClass, CreatureKind, NewCreature, Race};
use crate::entities::game_map::{GameMap, MapDimensions};
use crate::entities::party::{DungeonMaster, NewDungeonMaster, NewPlayer, Party};
use crate::error::DomainError;
use crate::ids::{CombatId, DungeonMasterId, GameId, PlayerId, TreasureTypeId, UserId};
use crate::value_objects::{pick_integer_from_range, CreatureName, Direction, Location, Range};

pub const MAX_MONSTERS_ON_MAP: i32 = 20;
pub const MAX_TREASURES_ON_MAP: i32 = 20;

/// Inclusive hp bounds for generated monsters.
pub const MONSTER_HP_MIN: i32 = 50;
pub const MONSTER_HP_MAX: i32 = 200;

const MONSTER_NAME: &str = "Monster";
const MONSTER_ABILITIES: AbilityScores = AbilityScores::new([10, 8, 12, 4, 6, 3]);
const MONSTER_CAPACITY: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub party: Party,
    pub dungeon_master: Option<DungeonMaster>,
    pub map: GameMap,
    pub combat_id: Option<CombatId>,
    pub active: bool,
}

impl Game {
    pub fn in_combat(&self) -> bool {
        self.combat_id.is_some()
    }

    pub fn is_dungeon_master(&self, user_id: &UserId) -> bool {
        self.dungeon_master
            .as_ref()
            .is_some_and(|dm| &dm.user_id == user_id)
    }

    pub fn dungeon_master_id(&self) -> Option<DungeonMasterId> {
        self.dungeon_master.as_ref().map(|dm| dm.id)
    }

    /// Flip the game to active. Returns `false` when it was already active.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` without a dungeon master or players.
    pub fn start(&mut self) -> Result<bool, DomainError> {
        if self.active {
            return Ok(false);
        }
        if self.dungeon_master.is_none() {
            return Err(DomainError::validation(
                "Cannot start a game without a dungeon master",
            ));
        }
        if self.party.is_empty() {
            return Err(DomainError::validation("Cannot start a game without players"));
        }
        self.active = true;
        Ok(true)
    }

    /// Where the party ends up after `player_id` moves it one tile.
    ///
    /// # Errors
    ///
    /// Fails when the game is inactive or in combat, the party is empty, the
    /// player is not a member, or the step leaves the map.
    pub fn plan_move(&self, player_id: PlayerId, direction: Direction) -> Result<Location, DomainError> {
        if !self.active {
            return Err(DomainError::invalid_state_transition(
                "Cannot move while the game is inactive",
            ));
        }
        if self.in_combat() {
            return Err(DomainError::invalid_state_transition(
                "Cannot move while in combat",
            ));
        }
        if self.party.is_empty() {
            return Err(DomainError::validation("Cannot move a party with no players"));
        }
        if !self.party.contains_player(player_id) {
            return Err(DomainError::validation(format!(
                "Player {} is not in this party",
                player_id
            )));
        }
        self.map.step(self.party.location, direction)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            game_id: self.id,
            active: self.active,
            player_ids: self.party.players.iter().map(|p| p.id).collect(),
            dungeon_master_id: self.dungeon_master_id(),
        }
    }
}

/// Lobby projection of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub active: bool,
    pub player_ids: Vec<PlayerId>,
    pub dungeon_master_id: Option<DungeonMasterId>,
}

impl GameSummary {
    pub fn has_open_player_slot(&self) -> bool {
        !self.active && self.player_ids.len() < crate::entities::party::MAX_PLAYERS
    }

    pub fn needs_dungeon_master(&self) -> bool {
        !self.active && self.dungeon_master_id.is_none()
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Requested shape of a new game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub num_rows: i32,
    pub num_cols: i32,
    pub min_monsters: i32,
    pub max_monsters: i32,
    pub min_treasures: i32,
    pub max_treasures: i32,
    pub player: Option<NewPlayer>,
    pub dungeon_master: Option<NewDungeonMaster>,
}

impl GameSettings {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for bad map dimensions or count bounds.
    pub fn validate(&self) -> Result<(MapDimensions, Range, Range), DomainError> {
        let dimensions = MapDimensions::new(self.num_rows, self.num_cols)?;
        let monsters = count_range("monsters", self.min_monsters, self.max_monsters, MAX_MONSTERS_ON_MAP)?;
        let treasures = count_range(
            "treasures",
            self.min_treasures,
            self.max_treasures,
            MAX_TREASURES_ON_MAP,
        )?;
        Ok((dimensions, monsters, treasures))
    }

    /// Roll everything a new game needs.
    ///
    /// # Errors
    ///
    /// Fails validation, or when no treasure types exist to draw from.
    pub fn plan(
        &self,
        treasure_types: &[TreasureTypeId],
        mut sampler: impl FnMut(i32, i32) -> i32,
    ) -> Result<NewGame, DomainError> {
        let (dimensions, monster_range, treasure_range) = self.validate()?;
        if treasure_types.is_empty() {
            return Err(DomainError::validation(
                "Cannot create a game before any treasure types exist",
            ));
        }

        let num_monsters = monster_range.pick(&mut sampler);
        let num_treasures = treasure_range.pick(&mut sampler);

        let mut monsters = Vec::with_capacity(num_monsters as usize);
        for _ in 0..num_monsters {
            let hp = pick_integer_from_range(MONSTER_HP_MIN, MONSTER_HP_MAX, &mut sampler);
            let creature = monster_template(hp)?;
            let location = random_tile(dimensions, &mut sampler);
            monsters.push(PlacedMonster { creature, location });
        }

        let last_type = i32::try_from(treasure_types.len() - 1).unwrap_or(i32::MAX);
        let mut treasures = Vec::with_capacity(num_treasures as usize);
        for _ in 0..num_treasures {
            let index = pick_integer_from_range(0, last_type, &mut sampler) as usize;
            let treasure_type_id = treasure_types[index.min(treasure_types.len() - 1)];
            let location = random_tile(dimensions, &mut sampler);
            treasures.push(PlacedTreasure {
                treasure_type_id,
                location,
            });
        }

        Ok(NewGame {
            dimensions,
            monsters,
            treasures,
            player: self.player.clone(),
            dungeon_master: self.dungeon_master.clone(),
        })
    }
}

fn random_tile(dimensions: MapDimensions, sampler: &mut impl FnMut(i32, i32) -> i32) -> Location {
    Location::new(
        pick_integer_from_range(0, dimensions.num_rows() - 1, &mut *sampler),
        pick_integer_from_range(0, dimensions.num_cols() - 1, &mut *sampler),
    )
}

fn count_range(label: &str, min: i32, max: i32, cap: i32) -> Result<Range, DomainError> {
    if min < 1 || min > max || max > cap {
        return Err(DomainError::validation(format!(
            "{} bounds must satisfy 1 <= min <= max <= {}, got {}..{}",
            label, cap, min, max
        )));
    }
    Range::new(min, max)
}

/// The fixed monster stat block used during generation.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `hp` is negative.
pub fn monster_template(hp: i32) -> Result<NewCreature, DomainError> {
    let creature = NewCreature {
        name: CreatureName::new(MONSTER_NAME)?,
        hp,
        abilities: MONSTER_ABILITIES,
        class: CreatureClass::Fighter,
        race: Race::Orc,
        kind: CreatureKind::Monster,
        equipment_capacity: MONSTER_CAPACITY,
        consumables_capacity: MONSTER_CAPACITY,
    };
    creature.validate()?;
    Ok(creature)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedMonster {
    pub creature: NewCreature,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedTreasure {
    pub treasure_type_id: TreasureTypeId,
    pub location: Location,
}

/// A fully rolled game, ready to be persisted as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub dimensions: MapDimensions,
    pub monsters: Vec<PlacedMonster>,
    pub treasures: Vec<PlacedTreasure>,
    pub player: Option<NewPlayer>,
    pub dungeon_master: Option<NewDungeonMaster>,
}
