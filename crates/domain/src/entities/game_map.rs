//! Game maps and the sparse interaction grid.
//!
//! The grid maps `row -> col -> [Interaction]`. Storage has no nested-map
//! column, so the grid flattens to a stream of `(row, col, id, type)`
//! quadruples. Order inside one tile survives a round trip; order across
//! tiles does not and callers must not rely on it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CreatureId, GameMapId, TreasureId};
use crate::value_objects::{Direction, Location};

/// Largest accepted value for `num_rows` and `num_cols`.
pub const MAX_MAP_DIMENSION: i32 = 100;

/// Values per interaction in the flattened grid.
pub const INTERACTION_STRIDE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Monster = 0,
    Npc = 1,
    Treasure = 2,
}

impl InteractionType {
    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Monster),
            1 => Some(Self::Npc),
            2 => Some(Self::Treasure),
            _ => None,
        }
    }
}

/// A tile-anchored reference to a creature or treasure row. Never owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub interaction_type: InteractionType,
}

impl Interaction {
    pub fn monster(id: CreatureId) -> Self {
        Self {
            id: id.get(),
            interaction_type: InteractionType::Monster,
        }
    }

    pub fn treasure(id: TreasureId) -> Self {
        Self {
            id: id.get(),
            interaction_type: InteractionType::Treasure,
        }
    }

    pub fn monster_id(&self) -> Option<CreatureId> {
        (self.interaction_type == InteractionType::Monster).then(|| CreatureId::new(self.id))
    }

    pub fn treasure_id(&self) -> Option<TreasureId> {
        (self.interaction_type == InteractionType::Treasure).then(|| TreasureId::new(self.id))
    }
}

// ============================================================================
// Interaction grid
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<i64>", try_from = "Vec<i64>")]
pub struct InteractionGrid {
    rows: HashMap<i32, HashMap<i32, Vec<Interaction>>>,
}

impl InteractionGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `interaction` to the tile, creating the row and column lazily.
    pub fn set_tile_interaction(&mut self, row: i32, col: i32, interaction: Interaction) {
        self.rows
            .entry(row)
            .or_default()
            .entry(col)
            .or_default()
            .push(interaction);
    }

    pub fn interactions_at(&self, row: i32, col: i32) -> &[Interaction] {
        self.rows
            .get(&row)
            .and_then(|cols| cols.get(&col))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.rows
            .values()
            .flat_map(|cols| cols.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every `(location, interaction)` pair, tile order unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (Location, &Interaction)> + '_ {
        self.rows.iter().flat_map(|(row, cols)| {
            cols.iter().flat_map(move |(col, list)| {
                list.iter().map(move |i| (Location::new(*row, *col), i))
            })
        })
    }

    /// Flatten to `(row, col, id, type)` quadruples.
    pub fn serialize(&self) -> Vec<i64> {
        let mut flat = Vec::with_capacity(self.len() * INTERACTION_STRIDE);
        for (location, interaction) in self.iter() {
            flat.extend_from_slice(&[
                i64::from(location.row),
                i64::from(location.col),
                interaction.id,
                interaction.interaction_type.ordinal(),
            ]);
        }
        flat
    }

    /// Rebuild a grid from its flattened form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the length is not a multiple of the
    /// stride, a coordinate is out of `i32` range, or a type ordinal is
    /// unknown.
    pub fn deserialize(flat: &[i64]) -> Result<Self, DomainError> {
        if flat.len() % INTERACTION_STRIDE != 0 {
            return Err(DomainError::validation(format!(
                "Interaction array length {} is not a multiple of {}",
                flat.len(),
                INTERACTION_STRIDE
            )));
        }

        let mut grid = Self::new();
        for chunk in flat.chunks_exact(INTERACTION_STRIDE) {
            let row = coordinate(chunk[0])?;
            let col = coordinate(chunk[1])?;
            let interaction_type = InteractionType::from_ordinal(chunk[3]).ok_or_else(|| {
                DomainError::validation(format!("Unknown interaction type {}", chunk[3]))
            })?;
            grid.set_tile_interaction(
                row,
                col,
                Interaction {
                    id: chunk[2],
                    interaction_type,
                },
            );
        }
        Ok(grid)
    }
}

fn coordinate(raw: i64) -> Result<i32, DomainError> {
    i32::try_from(raw)
        .map_err(|_| DomainError::validation(format!("Invalid tile coordinate {}", raw)))
}

impl From<InteractionGrid> for Vec<i64> {
    fn from(grid: InteractionGrid) -> Self {
        grid.serialize()
    }
}

impl TryFrom<Vec<i64>> for InteractionGrid {
    type Error = DomainError;

    fn try_from(flat: Vec<i64>) -> Result<Self, Self::Error> {
        Self::deserialize(&flat)
    }
}

// ============================================================================
// Game map
// ============================================================================

/// Validated map dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDimensions {
    num_rows: i32,
    num_cols: i32,
}

impl MapDimensions {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless both sides are in `[1, MAX_MAP_DIMENSION]`.
    pub fn new(num_rows: i32, num_cols: i32) -> Result<Self, DomainError> {
        for (label, value) in [("num_rows", num_rows), ("num_cols", num_cols)] {
            if !(1..=MAX_MAP_DIMENSION).contains(&value) {
                return Err(DomainError::validation(format!(
                    "{} must be between 1 and {}, got {}",
                    label, MAX_MAP_DIMENSION, value
                )));
            }
        }
        Ok(Self { num_rows, num_cols })
    }

    pub fn num_rows(&self) -> i32 {
        self.num_rows
    }

    pub fn num_cols(&self) -> i32 {
        self.num_cols
    }

    pub fn contains(&self, location: Location) -> bool {
        (0..self.num_rows).contains(&location.row) && (0..self.num_cols).contains(&location.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    pub id: GameMapId,
    pub num_rows: i32,
    pub num_cols: i32,
    pub interactions: InteractionGrid,
}

impl GameMap {
    pub fn dimensions(&self) -> MapDimensions {
        MapDimensions {
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }

    pub fn contains(&self, location: Location) -> bool {
        self.dimensions().contains(location)
    }

    /// Place an interaction on an in-bounds tile.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `location` lies outside the map.
    pub fn place(&mut self, location: Location, interaction: Interaction) -> Result<(), DomainError> {
        if !self.contains(location) {
            return Err(DomainError::validation(format!(
                "Tile {} is outside the {}x{} map",
                location, self.num_rows, self.num_cols
            )));
        }
        self.interactions
            .set_tile_interaction(location.row, location.col, interaction);
        Ok(())
    }

    pub fn interactions_at(&self, location: Location) -> &[Interaction] {
        self.interactions.interactions_at(location.row, location.col)
    }

    /// The tile one step from `from`. Stepping off the edge is rejected, not clamped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the step leaves the map.
    pub fn step(&self, from: Location, direction: Direction) -> Result<Location, DomainError> {
        let to = from.step(direction);
        if !self.contains(to) {
            return Err(DomainError::validation(format!(
                "Cannot move {} from {}: out of bounds",
                direction, from
            )));
        }
        Ok(to)
    }
}
