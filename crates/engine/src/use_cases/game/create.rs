//! Create game use case.

use std::sync::Arc;

use delver_domain::{CreatureKind, Game, GameSettings, NewPlayer, TreasureTypeId};

use crate::infrastructure::ports::{CreatureRepo, GameRepo, RandomPort, TreasureRepo};
use crate::infrastructure::random::sampler;

use super::GameError;

/// Generates a map with monsters and treasure and persists the whole game.
///
/// Orchestrates: settings validation, treasure type lookup, the generation
/// roll, then a single storage write for every generated row.
pub struct CreateGame {
    games: Arc<dyn GameRepo>,
    treasures: Arc<dyn TreasureRepo>,
    creatures: Arc<dyn CreatureRepo>,
    random: Arc<dyn RandomPort>,
}

impl CreateGame {
    pub fn new(
        games: Arc<dyn GameRepo>,
        treasures: Arc<dyn TreasureRepo>,
        creatures: Arc<dyn CreatureRepo>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            games,
            treasures,
            creatures,
            random,
        }
    }

    pub async fn execute(&self, settings: GameSettings) -> Result<Game, GameError> {
        settings.validate()?;
        if let Some(player) = &settings.player {
            self.check_character(player).await?;
        }

        let treasure_types: Vec<TreasureTypeId> = self
            .treasures
            .list_types()
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let plan = settings.plan(&treasure_types, sampler(self.random.as_ref()))?;
        tracing::debug!(
            monsters = plan.monsters.len(),
            treasures = plan.treasures.len(),
            rows = plan.dimensions.num_rows(),
            cols = plan.dimensions.num_cols(),
            "Game generated"
        );

        let game = self.games.create(&plan).await?;
        tracing::info!(
            game_id = %game.id,
            interactions = game.map.interactions.len(),
            "Game created"
        );
        Ok(game)
    }

    async fn check_character(&self, player: &NewPlayer) -> Result<(), GameError> {
        let Some(character_id) = player.character_id else {
            return Ok(());
        };
        match self.creatures.get(character_id).await? {
            Some(creature) if creature.kind == CreatureKind::Character => Ok(()),
            _ => Err(GameError::CharacterNotFound(character_id)),
        }
    }
}
