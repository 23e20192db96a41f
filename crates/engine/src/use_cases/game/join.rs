//! Join game use cases.
//!
//! Joining is idempotent per user and role. A user holds at most one role in a
//! game: the dungeon master cannot also sit in the party, and vice versa.

use std::sync::Arc;

use delver_domain::{CreatureKind, DungeonMaster, GameId, NewDungeonMaster, NewPlayer, Player};

use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{CreatureRepo, GameRepo};

use super::GameError;

pub struct JoinGame {
    games: Arc<dyn GameRepo>,
    creatures: Arc<dyn CreatureRepo>,
    locks: Arc<AggregateLocks>,
}

impl JoinGame {
    pub fn new(
        games: Arc<dyn GameRepo>,
        creatures: Arc<dyn CreatureRepo>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            games,
            creatures,
            locks,
        }
    }

    pub async fn as_player(&self, game_id: GameId, player: NewPlayer) -> Result<Player, GameError> {
        let _guard = self.locks.lock_game(game_id).await;
        let game = self
            .games
            .get(game_id)
            .await?
            .ok_or(GameError::NotFound(game_id))?;

        if let Some(existing) = game.party.player_for_user(&player.user_id) {
            tracing::debug!(game_id = %game_id, user_id = %player.user_id, "Player already joined");
            return Ok(existing.clone());
        }
        if game.is_dungeon_master(&player.user_id) {
            return Err(GameError::RoleConflict(format!(
                "User {} is the dungeon master of game {}",
                player.user_id, game_id
            )));
        }
        game.party.ensure_room()?;
        if let Some(character_id) = player.character_id {
            match self.creatures.get(character_id).await? {
                Some(creature) if creature.kind == CreatureKind::Character => {}
                _ => return Err(GameError::CharacterNotFound(character_id)),
            }
        }

        let joined = self.games.add_player(game_id, &player).await?;
        tracing::info!(
            game_id = %game_id,
            player_id = %joined.id,
            user_id = %joined.user_id,
            "Player joined game"
        );
        Ok(joined)
    }

    pub async fn as_dungeon_master(
        &self,
        game_id: GameId,
        dungeon_master: NewDungeonMaster,
    ) -> Result<DungeonMaster, GameError> {
        let _guard = self.locks.lock_game(game_id).await;
        let game = self
            .games
            .get(game_id)
            .await?
            .ok_or(GameError::NotFound(game_id))?;

        if let Some(existing) = game.dungeon_master {
            if existing.user_id == dungeon_master.user_id {
                return Ok(existing);
            }
            return Err(GameError::DungeonMasterTaken(game_id));
        }
        if game.party.player_for_user(&dungeon_master.user_id).is_some() {
            return Err(GameError::RoleConflict(format!(
                "User {} is already a player in game {}",
                dungeon_master.user_id, game_id
            )));
        }

        let joined = self
            .games
            .assign_dungeon_master(game_id, &dungeon_master)
            .await?;
        tracing::info!(
            game_id = %game_id,
            dungeon_master_id = %joined.id,
            user_id = %joined.user_id,
            "Dungeon master joined game"
        );
        Ok(joined)
    }
}
