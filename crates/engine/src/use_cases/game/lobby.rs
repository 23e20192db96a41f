//! Lobby listings.

use std::sync::Arc;

use delver_domain::GameSummary;

use crate::infrastructure::ports::GameRepo;

use super::GameError;

/// Unpaginated lobby views over every game in storage.
pub struct Lobby {
    games: Arc<dyn GameRepo>,
}

impl Lobby {
    pub fn new(games: Arc<dyn GameRepo>) -> Self {
        Self { games }
    }

    /// Inactive games with a free player seat.
    pub async fn open_parties(&self) -> Result<Vec<GameSummary>, GameError> {
        let mut games = self.games.list_summaries().await?;
        games.retain(GameSummary::has_open_player_slot);
        Ok(games)
    }

    /// Inactive games without a dungeon master.
    pub async fn open_dungeon_master_seats(&self) -> Result<Vec<GameSummary>, GameError> {
        let mut games = self.games.list_summaries().await?;
        games.retain(GameSummary::needs_dungeon_master);
        Ok(games)
    }
}
