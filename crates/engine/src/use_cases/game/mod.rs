//! Game use cases.
//!
//! Covers generation, the lobby, joining as player or dungeon master, the
//! start transition and party movement. Every mutation of an existing game
//! runs under that game's aggregate lock.

mod create;
mod join;
mod lobby;

use std::sync::Arc;

use delver_domain::{CreatureId, Direction, DomainError, Game, GameId, Location, PlayerId};

use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{GameRepo, GameStateUpdate, RepoError};

pub use create::CreateGame;
pub use join::JoinGame;
pub use lobby::Lobby;

/// Container for game use cases.
pub struct GameUseCases {
    pub create: Arc<CreateGame>,
    pub ops: Arc<GameOps>,
    pub join: Arc<JoinGame>,
    pub lobby: Arc<Lobby>,
}

impl GameUseCases {
    pub fn new(
        create: Arc<CreateGame>,
        ops: Arc<GameOps>,
        join: Arc<JoinGame>,
        lobby: Arc<Lobby>,
    ) -> Self {
        Self {
            create,
            ops,
            join,
            lobby,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Game not found: {0}")]
    NotFound(GameId),
    #[error("Character not found: {0}")]
    CharacterNotFound(CreatureId),
    #[error("Game {0} already has a different dungeon master")]
    DungeonMasterTaken(GameId),
    #[error("Role conflict: {0}")]
    RoleConflict(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Reads and state transitions on an existing game.
pub struct GameOps {
    games: Arc<dyn GameRepo>,
    locks: Arc<AggregateLocks>,
}

impl GameOps {
    pub fn new(games: Arc<dyn GameRepo>, locks: Arc<AggregateLocks>) -> Self {
        Self { games, locks }
    }

    pub async fn get(&self, id: GameId) -> Result<Game, GameError> {
        self.games.get(id).await?.ok_or(GameError::NotFound(id))
    }

    /// Admin replace of the game's mutable scalar state.
    pub async fn update(&self, id: GameId, state: GameStateUpdate) -> Result<Game, GameError> {
        let _guard = self.locks.lock_game(id).await;
        let mut game = self.get(id).await?;
        if !game.map.contains(state.party_location) {
            return Err(GameError::Validation(format!(
                "Party location {} is outside the {}x{} map",
                state.party_location, game.map.num_rows, game.map.num_cols
            )));
        }

        self.games.update_state(id, state).await?;
        game.active = state.active;
        game.party.location = state.party_location;
        tracing::info!(game_id = %id, active = state.active, "Game state replaced");
        Ok(game)
    }

    /// Activate the game. Starting an active game is a no-op.
    pub async fn start(&self, id: GameId) -> Result<Game, GameError> {
        let _guard = self.locks.lock_game(id).await;
        let mut game = self.get(id).await?;
        if !game.start()? {
            return Ok(game);
        }

        self.games
            .update_state(
                id,
                GameStateUpdate {
                    active: true,
                    party_location: game.party.location,
                },
            )
            .await?;
        tracing::info!(game_id = %id, players = game.party.players.len(), "Game started");
        Ok(game)
    }

    /// Move the whole party one tile on behalf of `player_id`.
    pub async fn move_party(
        &self,
        id: GameId,
        player_id: PlayerId,
        direction: Direction,
    ) -> Result<Location, GameError> {
        let _guard = self.locks.lock_game(id).await;
        let game = self.get(id).await?;
        let to = game.plan_move(player_id, direction)?;

        self.games
            .update_state(
                id,
                GameStateUpdate {
                    active: game.active,
                    party_location: to,
                },
            )
            .await?;
        tracing::debug!(
            game_id = %id,
            player_id = %player_id,
            from = %game.party.location,
            to = %to,
            "Party moved"
        );
        Ok(to)
    }
}
