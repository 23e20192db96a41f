//! Combat use cases.
//!
//! A game holds at most one combat. Beginning combat and taking turns both run
//! under the owning game's aggregate lock.

mod begin;
mod take_turn;

use std::sync::Arc;

use delver_domain::{Combat, CombatId, DomainError, GameId, Location};

use crate::infrastructure::ports::{CombatRepo, RepoError};

pub use begin::BeginCombat;
pub use take_turn::TakeTurn;

/// Container for combat use cases.
pub struct CombatUseCases {
    pub begin: Arc<BeginCombat>,
    pub turn: Arc<TakeTurn>,
    pub query: Arc<CombatQuery>,
}

impl CombatUseCases {
    pub fn new(begin: Arc<BeginCombat>, turn: Arc<TakeTurn>, query: Arc<CombatQuery>) -> Self {
        Self { begin, turn, query }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("Game not found: {0}")]
    GameNotFound(GameId),
    #[error("Combat not found: {0}")]
    CombatNotFound(CombatId),
    #[error("Game {0} is not active")]
    GameInactive(GameId),
    #[error("Game {0} is already in combat")]
    AlreadyInCombat(GameId),
    #[error("No monsters in the vicinity of {0}")]
    NoMonsters(Location),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub struct CombatQuery {
    combats: Arc<dyn CombatRepo>,
}

impl CombatQuery {
    pub fn new(combats: Arc<dyn CombatRepo>) -> Self {
        Self { combats }
    }

    /// The live combat, which must belong to `game_id`.
    pub async fn get(&self, game_id: GameId, combat_id: CombatId) -> Result<Combat, CombatError> {
        load_combat(self.combats.as_ref(), game_id, combat_id).await
    }
}

async fn load_combat(
    combats: &dyn CombatRepo,
    game_id: GameId,
    combat_id: CombatId,
) -> Result<Combat, CombatError> {
    combats
        .get(combat_id)
        .await?
        .filter(|combat| combat.game_id == game_id)
        .ok_or(CombatError::CombatNotFound(combat_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCombatRepo;

    #[tokio::test]
    async fn when_combat_belongs_to_another_game_returns_not_found() {
        let mut combats = MockCombatRepo::new();
        combats.expect_get().returning(|id| {
            Ok(Some(Combat {
                id,
                game_id: GameId::new(99),
                turn_index: 0,
                combatants: vec![],
                fainted_monster_ids: vec![],
                fainted_character_ids: vec![],
            }))
        });
        let query = CombatQuery::new(Arc::new(combats));

        let result = query.get(GameId::new(1), CombatId::new(5)).await;

        assert!(matches!(result, Err(CombatError::CombatNotFound(_))));
    }
}
