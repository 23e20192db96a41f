//! Combat and combatant tables.

use async_trait::async_trait;
use delver_domain::{Combat, CombatId, Combatant, GameId, NewCombatant, TurnOutcome};

use super::{CombatRow, CombatantRow, MemoryStore, Tables};
use crate::infrastructure::ports::{CombatRepo, RepoError};

impl Tables {
    /// Combatants carry a snapshot of their creature as currently stored.
    fn combat(&self, id: CombatId) -> Result<Option<Combat>, RepoError> {
        let Some(row) = self.combats.get(&id) else {
            return Ok(None);
        };
        let mut combatants = Vec::with_capacity(row.combatant_ids.len());
        for combatant_id in &row.combatant_ids {
            let combatant = self
                .combatants
                .get(combatant_id)
                .ok_or_else(|| RepoError::not_found("Combatant", combatant_id))?;
            let creature = self
                .creature(combatant.creature_id)?
                .ok_or_else(|| RepoError::not_found("Creature", combatant.creature_id))?;
            combatants.push(Combatant {
                id: *combatant_id,
                creature,
                side: combatant.side,
            });
        }
        Ok(Some(Combat {
            id,
            game_id: row.game_id,
            turn_index: row.turn_index,
            combatants,
            fainted_monster_ids: row.fainted_monster_ids.clone(),
            fainted_character_ids: row.fainted_character_ids.clone(),
        }))
    }

    fn remove_combat(&mut self, id: CombatId) -> Result<(), RepoError> {
        let row = self
            .combats
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("Combat", id))?;
        for combatant_id in &row.combatant_ids {
            self.combatants.remove(combatant_id);
        }
        if let Some(game) = self.games.get_mut(&row.game_id) {
            if game.combat_id == Some(id) {
                game.combat_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CombatRepo for MemoryStore {
    async fn create(
        &self,
        game_id: GameId,
        combatants: &[NewCombatant],
    ) -> Result<Combat, RepoError> {
        self.transact("create_combat", |tables| {
            let game = tables
                .games
                .get(&game_id)
                .ok_or_else(|| RepoError::not_found("Game", game_id))?;
            if let Some(existing) = game.combat_id {
                return Err(RepoError::conflict(format!(
                    "Game {} is already in combat {}",
                    game_id, existing
                )));
            }

            let mut combatant_ids = Vec::with_capacity(combatants.len());
            for combatant in combatants {
                tables.before_insert("combatants")?;
                let combatant_id = tables.next_id();
                tables.combatants.insert(
                    combatant_id,
                    CombatantRow {
                        creature_id: combatant.creature.id,
                        side: combatant.side,
                    },
                );
                combatant_ids.push(combatant_id);
            }

            tables.before_insert("combats")?;
            let id = tables.next_id();
            tables.combats.insert(
                id,
                CombatRow {
                    game_id,
                    turn_index: 0,
                    combatant_ids,
                    fainted_monster_ids: Vec::new(),
                    fainted_character_ids: Vec::new(),
                },
            );
            if let Some(game) = tables.games.get_mut(&game_id) {
                game.combat_id = Some(id);
            }

            tables
                .combat(id)?
                .ok_or_else(|| RepoError::not_found("Combat", id))
        })
        .await
    }

    async fn get(&self, id: CombatId) -> Result<Option<Combat>, RepoError> {
        self.read("get_combat", |tables| tables.combat(id)).await
    }

    async fn record_turn(&self, outcome: &TurnOutcome) -> Result<(), RepoError> {
        let next = &outcome.combat;
        self.transact("record_turn", |tables| {
            if !tables.combats.contains_key(&next.id) {
                return Err(RepoError::not_found("Combat", next.id));
            }
            tables.set_hp(outcome.defender_creature_id, outcome.defender_hp)?;

            if outcome.is_final() {
                return tables.remove_combat(next.id);
            }

            if let Some(fainted) = &outcome.fainted {
                tables.combatants.remove(&fainted.combatant_id);
            }
            let row = tables
                .combats
                .get_mut(&next.id)
                .ok_or_else(|| RepoError::not_found("Combat", next.id))?;
            row.turn_index = next.turn_index;
            row.combatant_ids = next.combatants.iter().map(|c| c.id).collect();
            row.fainted_monster_ids = next.fainted_monster_ids.clone();
            row.fainted_character_ids = next.fainted_character_ids.clone();
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delver_domain::{
        order_combatants, AbilityScores, CombatResolution, CreatureClass, CreatureKind,
        CreatureName, MapDimensions, NewCreature, NewGame, Race,
    };

    use crate::infrastructure::ports::{CreatureRepo, GameRepo};

    fn fighter(name: &str, kind: CreatureKind, hp: i32, dex: i32) -> NewCreature {
        NewCreature {
            name: CreatureName::new(name).unwrap(),
            hp,
            abilities: AbilityScores::new([10, dex, 10, 10, 10, 10]),
            class: CreatureClass::Fighter,
            race: Race::Human,
            kind,
            equipment_capacity: 1,
            consumables_capacity: 1,
        }
    }

    async fn one_on_one(store: &MemoryStore, monster_hp: i32) -> (GameId, Combat) {
        let game = GameRepo::create(
            store,
            &NewGame {
                dimensions: MapDimensions::new(2, 2).unwrap(),
                monsters: vec![],
                treasures: vec![],
                player: None,
                dungeon_master: None,
            },
        )
        .await
        .unwrap();
        let hero = CreatureRepo::create(store, &fighter("Hero", CreatureKind::Character, 20, 14))
            .await
            .unwrap();
        let grub = CreatureRepo::create(store, &fighter("Grub", CreatureKind::Monster, monster_hp, 8))
            .await
            .unwrap();
        let order = order_combatants(vec![grub], vec![hero]).unwrap();
        let combat = CombatRepo::create(store, game.id, &order).await.unwrap();
        (game.id, combat)
    }

    #[tokio::test]
    async fn create_links_game_and_refuses_a_second_combat() {
        let store = MemoryStore::new();
        let (game_id, combat) = one_on_one(&store, 30).await;

        let game = GameRepo::get(&store, game_id).await.unwrap().unwrap();
        assert_eq!(game.combat_id, Some(combat.id));
        assert_eq!(combat.turn_index, 0);
        assert_eq!(combat.combatants[0].creature.name.as_str(), "Grub");

        let again = CombatRepo::create(&store, game_id, &[]).await;
        assert!(matches!(again, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn record_turn_saves_hp_and_turn_index() {
        let store = MemoryStore::new();
        let (_, combat) = one_on_one(&store, 30).await;
        let monster = combat.combatants[0].id;
        let hero = combat.combatants[1].id;

        // 10 + 10 STR against DEX 14 deals 6.
        let outcome = combat.take_turn(monster, hero, 10).unwrap();
        store.record_turn(&outcome).await.unwrap();

        let stored = CombatRepo::get(&store, combat.id).await.unwrap().unwrap();
        assert_eq!(stored.turn_index, 1);
        assert_eq!(stored.combatants[1].creature.hp(), 14);
    }

    #[tokio::test]
    async fn final_turn_deletes_combat_and_unlinks_game() {
        let store = MemoryStore::new();
        let (game_id, combat) = one_on_one(&store, 5).await;
        let monster = combat.combatants[0].id;
        let hero = combat.combatants[1].id;
        let opening = combat.take_turn(monster, hero, 1).unwrap();
        store.record_turn(&opening).await.unwrap();
        let combat = CombatRepo::get(&store, combat.id).await.unwrap().unwrap();

        let outcome = combat.take_turn(hero, monster, 20).unwrap();
        assert_eq!(outcome.resolution, Some(CombatResolution::PartyVictory));
        store.record_turn(&outcome).await.unwrap();

        assert!(CombatRepo::get(&store, combat.id).await.unwrap().is_none());
        let game = GameRepo::get(&store, game_id).await.unwrap().unwrap();
        assert!(game.combat_id.is_none());
        assert_eq!(store.row_counts().await.combats, 0);
    }
}
