//! Players, dungeon masters and the party that moves across a map.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CreatureId, DungeonMasterId, PartyId, PlayerId, UserId};
use crate::value_objects::{DisplayName, Location};

/// Maximum number of players in a party.
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub user_id: UserId,
    pub user_name: DisplayName,
    pub character_id: Option<CreatureId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonMaster {
    pub id: DungeonMasterId,
    pub user_id: UserId,
    pub user_name: DisplayName,
}

/// A user joining a game, before storage assigns a row id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub user_id: UserId,
    pub user_name: DisplayName,
    pub character_id: Option<CreatureId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDungeonMaster {
    pub user_id: UserId,
    pub user_name: DisplayName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    pub players: Vec<Player>,
    pub location: Location,
}

impl Party {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn player_for_user(&self, user_id: &UserId) -> Option<&Player> {
        self.players.iter().find(|p| &p.user_id == user_id)
    }

    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Character ids in party order, skipping players without a character.
    pub fn character_ids(&self) -> Vec<CreatureId> {
        self.players.iter().filter_map(|p| p.character_id).collect()
    }

    /// # Errors
    ///
    /// Returns `DomainError::ContainerFull` once the party holds [`MAX_PLAYERS`].
    pub fn ensure_room(&self) -> Result<(), DomainError> {
        if self.is_full() {
            return Err(DomainError::container_full(
                self.players.len() as u32,
                MAX_PLAYERS as u32,
            ));
        }
        Ok(())
    }
}
