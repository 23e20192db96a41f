//! Open treasure use case.
//!
//! Rolls a treasure's loot and hands each item to a random party inventory,
//! then commits the opened flag and every touched inventory in one write.
//! The treasure and every receiving character stay locked from the inventory
//! read to the commit.

use std::sync::Arc;

use delver_domain::{
    distribute_loot, CreatureKind, DistributionReport, PartyId, ResolvedLoot, TreasureId,
};

use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{
    CreatureRepo, GameRepo, ItemRepo, RandomPort, RepoError, TreasureOpening, TreasureRepo,
};
use crate::infrastructure::random::sampler;

use super::TreasureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedTreasure {
    pub treasure_id: TreasureId,
    pub report: DistributionReport,
}

pub struct OpenTreasure {
    treasures: Arc<dyn TreasureRepo>,
    games: Arc<dyn GameRepo>,
    creatures: Arc<dyn CreatureRepo>,
    items: Arc<dyn ItemRepo>,
    random: Arc<dyn RandomPort>,
    locks: Arc<AggregateLocks>,
}

impl OpenTreasure {
    pub fn new(
        treasures: Arc<dyn TreasureRepo>,
        games: Arc<dyn GameRepo>,
        creatures: Arc<dyn CreatureRepo>,
        items: Arc<dyn ItemRepo>,
        random: Arc<dyn RandomPort>,
        locks: Arc<AggregateLocks>,
    ) -> Self {
        Self {
            treasures,
            games,
            creatures,
            items,
            random,
            locks,
        }
    }

    pub async fn execute(
        &self,
        treasure_id: TreasureId,
        party_id: PartyId,
    ) -> Result<OpenedTreasure, TreasureError> {
        let _guard = self.locks.lock_treasure(treasure_id).await;

        let treasure = self
            .treasures
            .get(treasure_id)
            .await?
            .ok_or(TreasureError::TreasureNotFound(treasure_id))?;
        treasure
            .ensure_unopened()
            .map_err(|_| TreasureError::AlreadyOpened(treasure_id))?;

        let party = self
            .games
            .get_party(party_id)
            .await?
            .ok_or(TreasureError::PartyNotFound(party_id))?;
        if party.is_empty() {
            return Err(TreasureError::Validation(format!(
                "Party {} has no players to receive loot",
                party_id
            )));
        }
        let character_ids = party.character_ids();
        if character_ids.is_empty() {
            return Err(TreasureError::Validation(format!(
                "No player in party {} has a character",
                party_id
            )));
        }
        let _inventory_guards = self.locks.lock_creatures(&character_ids).await;

        let treasure_type = self
            .treasures
            .get_type(treasure.treasure_type_id)
            .await?
            .ok_or(TreasureError::TypeNotFound(treasure.treasure_type_id))?;

        let rolled = treasure_type.loot.roll(sampler(self.random.as_ref()));
        tracing::debug!(
            treasure_id = %treasure_id,
            consumables = rolled.consumable_ids.len(),
            equipment = rolled.equipment_ids.len(),
            currencies = rolled.currency_ids.len(),
            "Loot rolled"
        );
        let loot = ResolvedLoot {
            consumables: self.items.get_consumables(&rolled.consumable_ids).await?,
            equipment: self.items.get_equipment(&rolled.equipment_ids).await?,
            currencies: self.items.get_currencies(&rolled.currency_ids).await?,
        };

        let mut inventories: Vec<_> = self
            .creatures
            .list(&character_ids, Some(CreatureKind::Character))
            .await?
            .into_iter()
            .map(|creature| creature.inventory)
            .collect();
        let report = distribute_loot(loot, &mut inventories, sampler(self.random.as_ref()));
        if report.dropped > 0 {
            tracing::warn!(
                treasure_id = %treasure_id,
                dropped = report.dropped,
                "Loot dropped because target inventories were full"
            );
        }

        let opening = TreasureOpening {
            treasure_id,
            inventories,
        };
        match self.treasures.commit_opening(&opening).await {
            Ok(()) => {}
            Err(RepoError::Conflict(_)) => {
                tracing::warn!(treasure_id = %treasure_id, "Treasure opened concurrently");
                return Err(TreasureError::AlreadyOpened(treasure_id));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            treasure_id = %treasure_id,
            party_id = %party_id,
            delivered = report.delivered,
            dropped = report.dropped,
            "Treasure opened"
        );
        Ok(OpenedTreasure {
            treasure_id,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockCreatureRepo, MockGameRepo, MockItemRepo, MockTreasureRepo,
    };
    use crate::infrastructure::random::FixedRandom;
    use delver_domain::{
        Consumable, ConsumableId, ConsumableKind, CreatureId, DisplayName, ItemName, Location,
        LootTable, Party, Player, PlayerId, Range, Treasure, TreasureType, TreasureTypeId, UserId,
    };

    fn treasure(opened: bool) -> Treasure {
        Treasure {
            id: TreasureId::new(1),
            treasure_type_id: TreasureTypeId::new(2),
            opened,
        }
    }

    fn party(characters: &[Option<i64>]) -> Party {
        Party {
            id: PartyId::new(3),
            players: characters
                .iter()
                .enumerate()
                .map(|(i, character)| Player {
                    id: PlayerId::new(i as i64 + 10),
                    user_id: UserId::new(format!("user-{}", i)).unwrap(),
                    user_name: DisplayName::new(format!("User {}", i)).unwrap(),
                    character_id: character.map(CreatureId::new),
                })
                .collect(),
            location: Location::ORIGIN,
        }
    }

    fn use_case(
        treasures: MockTreasureRepo,
        games: MockGameRepo,
        creatures: MockCreatureRepo,
        items: MockItemRepo,
    ) -> OpenTreasure {
        OpenTreasure::new(
            Arc::new(treasures),
            Arc::new(games),
            Arc::new(creatures),
            Arc::new(items),
            Arc::new(FixedRandom(1)),
            Arc::new(AggregateLocks::new()),
        )
    }

    #[tokio::test]
    async fn when_treasure_already_opened_returns_error() {
        let mut treasures = MockTreasureRepo::new();
        treasures
            .expect_get()
            .returning(|_| Ok(Some(treasure(true))));
        treasures.expect_commit_opening().never();

        let result = use_case(
            treasures,
            MockGameRepo::new(),
            MockCreatureRepo::new(),
            MockItemRepo::new(),
        )
        .execute(TreasureId::new(1), PartyId::new(3))
        .await;

        assert!(matches!(result, Err(TreasureError::AlreadyOpened(_))));
    }

    #[tokio::test]
    async fn when_party_is_empty_returns_validation_error() {
        let mut treasures = MockTreasureRepo::new();
        treasures
            .expect_get()
            .returning(|_| Ok(Some(treasure(false))));
        let mut games = MockGameRepo::new();
        games.expect_get_party().returning(|_| Ok(Some(party(&[]))));

        let result = use_case(treasures, games, MockCreatureRepo::new(), MockItemRepo::new())
            .execute(TreasureId::new(1), PartyId::new(3))
            .await;

        assert!(matches!(result, Err(TreasureError::Validation(_))));
    }

    #[tokio::test]
    async fn when_no_player_has_a_character_returns_validation_error() {
        let mut treasures = MockTreasureRepo::new();
        treasures
            .expect_get()
            .returning(|_| Ok(Some(treasure(false))));
        let mut games = MockGameRepo::new();
        games
            .expect_get_party()
            .returning(|_| Ok(Some(party(&[None, None]))));

        let result = use_case(treasures, games, MockCreatureRepo::new(), MockItemRepo::new())
            .execute(TreasureId::new(1), PartyId::new(3))
            .await;

        assert!(matches!(result, Err(TreasureError::Validation(_))));
    }

    #[tokio::test]
    async fn when_commit_loses_race_returns_already_opened() {
        let mut treasures = MockTreasureRepo::new();
        treasures
            .expect_get()
            .returning(|_| Ok(Some(treasure(false))));
        treasures.expect_get_type().returning(|id| {
            Ok(Some(TreasureType {
                id,
                loot: LootTable {
                    equipment_ids: vec![],
                    consumable_ids: vec![ConsumableId::new(5)],
                    currency_ids: vec![],
                    num_equipment: None,
                    num_consumables: Some(Range::exactly(1)),
                    num_currencies: None,
                },
            }))
        });
        treasures
            .expect_commit_opening()
            .returning(|_| Err(RepoError::conflict("opened")));
        let mut games = MockGameRepo::new();
        games
            .expect_get_party()
            .returning(|_| Ok(Some(party(&[Some(20)]))));
        let mut creatures = MockCreatureRepo::new();
        creatures.expect_list().returning(|ids, _| {
            Ok(ids
                .iter()
                .map(|id| {
                    let mut c = crate::use_cases::testing::character(id.get(), 10, 10);
                    c.inventory.consumables_capacity = 1;
                    c
                })
                .collect())
        });
        let mut items = MockItemRepo::new();
        items.expect_get_consumables().returning(|ids| {
            Ok(ids
                .iter()
                .map(|id| Consumable {
                    id: *id,
                    name: ItemName::new("Potion").unwrap(),
                    kind: ConsumableKind::Potion,
                })
                .collect())
        });
        items.expect_get_equipment().returning(|_| Ok(vec![]));
        items.expect_get_currencies().returning(|_| Ok(vec![]));

        let result = use_case(treasures, games, creatures, items)
            .execute(TreasureId::new(1), PartyId::new(3))
            .await;

        assert!(matches!(result, Err(TreasureError::AlreadyOpened(_))));
    }
}
