//! Begin combat use case.

use std::sync::Arc;

use delver_domain::{order_combatants, Combat, CreatureId, CreatureKind, GameId, Location};

use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{CombatRepo, CreatureRepo, GameRepo, RepoError};

use super::CombatError;

/// Starts a fight between the party and every monster on one tile.
///
/// Turn order is fixed here: ascending dexterity, ties keep monsters (in tile
/// order) ahead of characters (in party order).
pub struct BeginCombat {
    games: Arc<dyn GameRepo>,
    creatures: Arc<dyn CreatureRepo>,
    combats: Arc<dyn CombatRepo>,
    locks: Arc<AggregateLocks>,
}

impl BeginCombat {
    pub fn new(
        games: Arc<dyn GameRepo>,
        creatures: Arc<dyn CreatureRepo>,
        combats: Arc<dyn CombatRepo>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            games,
            creatures,
            combats,
            locks,
        }
    }

    pub async fn execute(&self, game_id: GameId, location: Location) -> Result<Combat, CombatError> {
        let _guard = self.locks.lock_game(game_id).await;
        let game = self
            .games
            .get(game_id)
            .await?
            .ok_or(CombatError::GameNotFound(game_id))?;
        if !game.active {
            return Err(CombatError::GameInactive(game_id));
        }
        if game.in_combat() {
            return Err(CombatError::AlreadyInCombat(game_id));
        }
        if !game.map.contains(location) {
            return Err(CombatError::Validation(format!(
                "Tile {} is outside the {}x{} map",
                location, game.map.num_rows, game.map.num_cols
            )));
        }

        let monster_ids: Vec<CreatureId> = game
            .map
            .interactions_at(location)
            .iter()
            .filter_map(|interaction| interaction.monster_id())
            .collect();
        if monster_ids.is_empty() {
            return Err(CombatError::NoMonsters(location));
        }
        let character_ids = game.party.character_ids();
        if character_ids.is_empty() {
            return Err(CombatError::Validation(format!(
                "Party {} has no characters to fight",
                game.party.id
            )));
        }

        let monsters = self
            .creatures
            .list(&monster_ids, Some(CreatureKind::Monster))
            .await?;
        let characters = self
            .creatures
            .list(&character_ids, Some(CreatureKind::Character))
            .await?;
        let order = order_combatants(monsters, characters)?;

        let combat = match self.combats.create(game_id, &order).await {
            Ok(combat) => combat,
            Err(RepoError::Conflict(_)) => return Err(CombatError::AlreadyInCombat(game_id)),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(
            game_id = %game_id,
            combat_id = %combat.id,
            combatants = combat.combatants.len(),
            location = %location,
            "Combat begun"
        );
        Ok(combat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCombatRepo, MockCreatureRepo, MockGameRepo};
    use crate::use_cases::game::tests::game_with;
    use crate::use_cases::testing::{character, monster};
    use delver_domain::{CombatId, Combatant, CombatantId, Game, Interaction};

    fn game_with_monster_at(location: Location, active: bool) -> Game {
        let mut game = game_with(1, true, active);
        game.map
            .place(location, Interaction::monster(CreatureId::new(500)))
            .unwrap();
        game
    }

    fn use_case(
        games: MockGameRepo,
        creatures: MockCreatureRepo,
        combats: MockCombatRepo,
    ) -> BeginCombat {
        BeginCombat::new(
            Arc::new(games),
            Arc::new(creatures),
            Arc::new(combats),
            Arc::new(AggregateLocks::new()),
        )
    }

    #[tokio::test]
    async fn when_game_inactive_returns_error() {
        let mut games = MockGameRepo::new();
        games
            .expect_get()
            .returning(|_| Ok(Some(game_with_monster_at(Location::ORIGIN, false))));

        let result = use_case(games, MockCreatureRepo::new(), MockCombatRepo::new())
            .execute(GameId::new(1), Location::ORIGIN)
            .await;

        assert!(matches!(result, Err(CombatError::GameInactive(_))));
    }

    #[tokio::test]
    async fn when_tile_has_no_monsters_returns_error() {
        let mut games = MockGameRepo::new();
        games
            .expect_get()
            .returning(|_| Ok(Some(game_with_monster_at(Location::new(3, 3), true))));
        let mut combats = MockCombatRepo::new();
        combats.expect_create().never();

        let result = use_case(games, MockCreatureRepo::new(), combats)
            .execute(GameId::new(1), Location::ORIGIN)
            .await;

        assert!(matches!(result, Err(CombatError::NoMonsters(_))));
    }

    #[tokio::test]
    async fn when_already_in_combat_returns_error() {
        let mut games = MockGameRepo::new();
        games.expect_get().returning(|_| {
            let mut game = game_with_monster_at(Location::ORIGIN, true);
            game.combat_id = Some(CombatId::new(8));
            Ok(Some(game))
        });

        let result = use_case(games, MockCreatureRepo::new(), MockCombatRepo::new())
            .execute(GameId::new(1), Location::ORIGIN)
            .await;

        assert!(matches!(result, Err(CombatError::AlreadyInCombat(_))));
    }

    #[tokio::test]
    async fn when_every_monster_has_fainted_returns_domain_error() {
        let mut games = MockGameRepo::new();
        games
            .expect_get()
            .returning(|_| Ok(Some(game_with_monster_at(Location::ORIGIN, true))));
        let mut creatures = MockCreatureRepo::new();
        creatures.expect_list().returning(|ids, kind| {
            Ok(ids
                .iter()
                .map(|id| match kind {
                    Some(CreatureKind::Monster) => monster(id.get(), 0, 8),
                    _ => character(id.get(), 20, 12),
                })
                .collect())
        });
        let mut combats = MockCombatRepo::new();
        combats.expect_create().never();

        let result = use_case(games, creatures, combats)
            .execute(GameId::new(1), Location::ORIGIN)
            .await;

        assert!(matches!(result, Err(CombatError::Domain(_))));
    }

    #[tokio::test]
    async fn begin_orders_combatants_by_dexterity() {
        let mut games = MockGameRepo::new();
        games
            .expect_get()
            .returning(|_| Ok(Some(game_with_monster_at(Location::ORIGIN, true))));
        let mut creatures = MockCreatureRepo::new();
        creatures.expect_list().returning(|ids, kind| {
            Ok(ids
                .iter()
                .map(|id| match kind {
                    Some(CreatureKind::Monster) => monster(id.get(), 60, 14),
                    _ => character(id.get(), 20, 9),
                })
                .collect())
        });
        let mut combats = MockCombatRepo::new();
        combats
            .expect_create()
            .withf(|_, order| {
                order.len() == 2
                    && order[0].creature.kind == CreatureKind::Character
                    && order[1].creature.kind == CreatureKind::Monster
            })
            .returning(|game_id, order| {
                Ok(Combat {
                    id: CombatId::new(1),
                    game_id,
                    turn_index: 0,
                    combatants: order
                        .iter()
                        .enumerate()
                        .map(|(i, c)| Combatant {
                            id: CombatantId::new(i as i64 + 1),
                            creature: c.creature.clone(),
                            side: c.side,
                        })
                        .collect(),
                    fainted_monster_ids: vec![],
                    fainted_character_ids: vec![],
                })
            });

        let combat = use_case(games, creatures, combats)
            .execute(GameId::new(1), Location::ORIGIN)
            .await
            .unwrap();

        assert_eq!(combat.turn_index, 0);
        assert_eq!(combat.combatants[0].creature.kind, CreatureKind::Character);
    }
}
