//! Take combat turn use case.

use std::sync::Arc;

use delver_domain::{CombatId, CombatantId, GameId, TurnOutcome};

use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{CombatRepo, RandomPort};

use super::{load_combat, CombatError};

const D20: (i32, i32) = (1, 20);

/// Resolves one attack for the combatant whose turn it is.
///
/// The defender's hp and the next combat state are written together; a
/// combat-ending turn deletes the combat instead.
pub struct TakeTurn {
    combats: Arc<dyn CombatRepo>,
    random: Arc<dyn RandomPort>,
    locks: Arc<AggregateLocks>,
}

impl TakeTurn {
    pub fn new(
        combats: Arc<dyn CombatRepo>,
        random: Arc<dyn RandomPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            combats,
            random,
            locks,
        }
    }

    pub async fn execute(
        &self,
        game_id: GameId,
        combat_id: CombatId,
        attacker_id: CombatantId,
        defender_id: CombatantId,
    ) -> Result<TurnOutcome, CombatError> {
        let _guard = self.locks.lock_game(game_id).await;
        let combat = load_combat(self.combats.as_ref(), game_id, combat_id).await?;

        let roll = self.random.gen_range(D20.0, D20.1);
        let outcome = combat.take_turn(attacker_id, defender_id, roll)?;
        tracing::debug!(
            combat_id = %combat_id,
            attacker_id = %attacker_id,
            defender_id = %defender_id,
            roll,
            attack_power = outcome.attack_power,
            defend_power = outcome.defend_power,
            hit = outcome.hit,
            damage = outcome.damage,
            "Attack resolved"
        );

        self.combats.record_turn(&outcome).await?;

        if let Some(fainted) = &outcome.fainted {
            tracing::info!(
                combat_id = %combat_id,
                creature_id = %fainted.creature_id,
                side = ?fainted.side,
                "Combatant fainted"
            );
        }
        if let Some(resolution) = outcome.resolution {
            tracing::info!(
                game_id = %game_id,
                combat_id = %combat_id,
                resolution = ?resolution,
                "Combat resolved"
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCombatRepo, MockRandomPort};
    use crate::use_cases::testing::{character, monster};
    use delver_domain::{Combat, CombatResolution, Combatant, CombatantSide, DomainError};

    fn combat() -> Combat {
        Combat {
            id: CombatId::new(5),
            game_id: GameId::new(1),
            turn_index: 0,
            combatants: vec![
                Combatant {
                    id: CombatantId::new(1),
                    creature: monster(100, 10, 8),
                    side: CombatantSide::Monster,
                },
                Combatant {
                    id: CombatantId::new(2),
                    creature: character(200, 30, 12),
                    side: CombatantSide::Character,
                },
            ],
            fainted_monster_ids: vec![],
            fainted_character_ids: vec![],
        }
    }

    fn use_case(combats: MockCombatRepo, roll: i32) -> TakeTurn {
        let mut random = MockRandomPort::new();
        random
            .expect_gen_range()
            .withf(|min, max| *min == 1 && *max == 20)
            .returning(move |_, _| roll);
        TakeTurn::new(
            Arc::new(combats),
            Arc::new(random),
            Arc::new(AggregateLocks::new()),
        )
    }

    #[tokio::test]
    async fn when_attacker_is_out_of_turn_nothing_is_recorded() {
        let mut combats = MockCombatRepo::new();
        combats.expect_get().returning(|_| Ok(Some(combat())));
        combats.expect_record_turn().never();

        let result = use_case(combats, 10)
            .execute(
                GameId::new(1),
                CombatId::new(5),
                CombatantId::new(2),
                CombatantId::new(1),
            )
            .await;

        assert!(matches!(
            result,
            Err(CombatError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn miss_only_advances_the_turn() {
        let mut combats = MockCombatRepo::new();
        combats.expect_get().returning(|_| Ok(Some(combat())));
        combats
            .expect_record_turn()
            .withf(|outcome| {
                !outcome.hit && outcome.defender_hp == 30 && outcome.combat.turn_index == 1
            })
            .times(1)
            .returning(|_| Ok(()));

        // 1 + STR 10 = 11 against DEX 12.
        let outcome = use_case(combats, 1)
            .execute(
                GameId::new(1),
                CombatId::new(5),
                CombatantId::new(1),
                CombatantId::new(2),
            )
            .await
            .unwrap();

        assert_eq!(outcome.damage, 0);
    }

    #[tokio::test]
    async fn knocking_out_last_monster_resolves_combat() {
        let mut start = combat();
        start.turn_index = 1;
        let mut combats = MockCombatRepo::new();
        combats
            .expect_get()
            .returning(move |_| Ok(Some(start.clone())));
        combats
            .expect_record_turn()
            .withf(|outcome| outcome.is_final())
            .times(1)
            .returning(|_| Ok(()));

        let outcome = use_case(combats, 20)
            .execute(
                GameId::new(1),
                CombatId::new(5),
                CombatantId::new(2),
                CombatantId::new(1),
            )
            .await
            .unwrap();

        assert_eq!(outcome.resolution, Some(CombatResolution::PartyVictory));
        assert_eq!(outcome.combat.fainted_monster_ids, vec![monster(100, 0, 8).id]);
    }
}
