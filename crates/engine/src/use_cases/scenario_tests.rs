//! End-to-end scenarios through the use cases against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use delver_domain::{
    AbilityScores, CombatantSide, Creature, CreatureClass, CreatureId, CreatureKind, CreatureName,
    CreatureUpdate, CurrencyKind, Direction, DisplayName, Game, GameSettings, Location, LootTable,
    NewCreature, NewDungeonMaster, NewItem, NewPlayer, Range, UpdateTargets, UserId,
};

use crate::app::{ApiTokens, App, Repositories};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::ports::{CreatureRepo, RepoError};
use crate::infrastructure::random::FixedRandom;
use crate::use_cases::combat::CombatError;
use crate::use_cases::creature::CreatureError;
use crate::use_cases::game::GameError;
use crate::use_cases::treasure::TreasureError;

fn app() -> App {
    app_with(Repositories::from_store(Arc::new(MemoryStore::new())))
}

fn app_with(repos: Repositories) -> App {
    App::new(
        repos,
        // Every roll lands on its minimum: a d20 is always 1, monsters spawn
        // with 50 hp on tile (0, 0).
        Arc::new(FixedRandom(0)),
        ApiTokens {
            admin: "admin".into(),
            user: "user".into(),
        },
    )
}

/// Creature storage whose bulk reads are slow, widening the window between
/// reading inventories and writing them back.
struct SlowCreatureReads(Arc<MemoryStore>);

#[async_trait]
impl CreatureRepo for SlowCreatureReads {
    async fn create(&self, creature: &NewCreature) -> Result<Creature, RepoError> {
        CreatureRepo::create(self.0.as_ref(), creature).await
    }

    async fn get(&self, id: CreatureId) -> Result<Option<Creature>, RepoError> {
        CreatureRepo::get(self.0.as_ref(), id).await
    }

    async fn list(
        &self,
        ids: &[CreatureId],
        kind: Option<CreatureKind>,
    ) -> Result<Vec<Creature>, RepoError> {
        let creatures = CreatureRepo::list(self.0.as_ref(), ids, kind).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        creatures
    }

    async fn update(
        &self,
        id: CreatureId,
        update: &CreatureUpdate,
        targets: UpdateTargets,
    ) -> Result<Creature, RepoError> {
        CreatureRepo::update(self.0.as_ref(), id, update, targets).await
    }

    async fn delete(&self, id: CreatureId) -> Result<(), RepoError> {
        CreatureRepo::delete(self.0.as_ref(), id).await
    }
}

fn settings(player: Option<NewPlayer>) -> GameSettings {
    GameSettings {
        num_rows: 5,
        num_cols: 5,
        min_monsters: 1,
        max_monsters: 3,
        min_treasures: 1,
        max_treasures: 3,
        player,
        dungeon_master: Some(NewDungeonMaster {
            user_id: UserId::new("dm").unwrap(),
            user_name: DisplayName::new("Dungeon Master").unwrap(),
        }),
    }
}

fn player(user: &str, character: Option<delver_domain::CreatureId>) -> NewPlayer {
    NewPlayer {
        user_id: UserId::new(user).unwrap(),
        user_name: DisplayName::new(user).unwrap(),
        character_id: character,
    }
}

async fn character(app: &App, name: &str) -> delver_domain::Creature {
    app.use_cases
        .creature
        .ops
        .create(
            CreatureKind::Character,
            NewCreature {
                name: CreatureName::new(name).unwrap(),
                hp: 40,
                abilities: AbilityScores::new([10, 14, 10, 10, 10, 10]),
                class: CreatureClass::Monk,
                race: delver_domain::Race::Dwarf,
                kind: CreatureKind::Character,
                equipment_capacity: 1,
                consumables_capacity: 1,
            },
        )
        .await
        .unwrap()
}

async fn gold_treasure_type(app: &App) {
    let delver_domain::CatalogItem::Currency(gold) = app
        .use_cases
        .item
        .catalog
        .create(NewItem::Currency {
            kind: CurrencyKind::Gold,
            total: 10,
        })
        .await
        .unwrap()
    else {
        panic!("expected currency");
    };
    app.use_cases
        .treasure
        .types
        .create(LootTable {
            equipment_ids: vec![],
            consumable_ids: vec![],
            currency_ids: vec![gold.id],
            num_equipment: None,
            num_consumables: None,
            num_currencies: Some(Range::exactly(3)),
        })
        .await
        .unwrap();
}

async fn started_game(app: &App) -> (Game, delver_domain::Creature) {
    gold_treasure_type(app).await;
    let hero = character(app, "Hero").await;
    let game = app
        .use_cases
        .game
        .create
        .execute(settings(Some(player("alice", Some(hero.id)))))
        .await
        .unwrap();
    let game = app.use_cases.game.ops.start(game.id).await.unwrap();
    (game, hero)
}

#[tokio::test]
async fn joining_twice_adds_one_player() {
    let app = app();
    gold_treasure_type(&app).await;
    let game = app
        .use_cases
        .game
        .create
        .execute(settings(None))
        .await
        .unwrap();

    let first = app
        .use_cases
        .game
        .join
        .as_player(game.id, player("bob", None))
        .await
        .unwrap();
    let second = app
        .use_cases
        .game
        .join
        .as_player(game.id, player("bob", None))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let game = app.use_cases.game.ops.get(game.id).await.unwrap();
    assert_eq!(game.party.players.len(), 1);
}

#[tokio::test]
async fn party_cannot_walk_off_the_map() {
    let app = app();
    let (game, _) = started_game(&app).await;
    let mover = game.party.players[0].id;
    let ops = &app.use_cases.game.ops;

    for direction in [Direction::South, Direction::West] {
        let result = ops.move_party(game.id, mover, direction).await;
        assert!(matches!(result, Err(GameError::Domain(_))));
    }
    let to = ops
        .move_party(game.id, mover, Direction::North)
        .await
        .unwrap();

    assert_eq!(to, Location::new(1, 0));
    let game = ops.get(game.id).await.unwrap();
    assert_eq!(game.party.location, Location::new(1, 0));
}

#[tokio::test]
async fn opening_treasure_delivers_repeated_loot_once() {
    let app = app();
    let (game, hero) = started_game(&app).await;
    let treasure_id = game
        .map
        .interactions
        .iter()
        .find_map(|(_, interaction)| interaction.treasure_id())
        .unwrap();
    let open = &app.use_cases.treasure.open;

    let opened = open.execute(treasure_id, game.party.id).await.unwrap();
    let again = open.execute(treasure_id, game.party.id).await;

    assert_eq!(opened.report.delivered, 3);
    assert!(matches!(again, Err(TreasureError::AlreadyOpened(_))));
    let hero = app
        .use_cases
        .creature
        .ops
        .get(CreatureKind::Character, hero.id)
        .await
        .unwrap();
    assert_eq!(hero.inventory.currencies.len(), 3);
    assert!(hero
        .inventory
        .currencies
        .windows(2)
        .all(|pair| pair[0].id == pair[1].id));
}

#[tokio::test]
async fn combat_runs_until_the_monsters_fall() {
    let app = app();
    let (game, hero) = started_game(&app).await;
    let combat_uc = &app.use_cases.combat;

    let mut combat = combat_uc
        .begin
        .execute(game.id, Location::ORIGIN)
        .await
        .unwrap();
    assert_eq!(combat.combatants.last().unwrap().creature.id, hero.id);
    let again = combat_uc.begin.execute(game.id, Location::ORIGIN).await;
    assert!(matches!(again, Err(CombatError::AlreadyInCombat(_))));
    let blocked = app
        .use_cases
        .game
        .ops
        .move_party(game.id, game.party.players[0].id, Direction::North)
        .await;
    assert!(matches!(blocked, Err(GameError::Domain(_))));

    let combat_id = combat.id;
    let mut resolved = false;
    for _ in 0..200 {
        let attacker = combat.current().unwrap();
        let defender = combat
            .combatants
            .iter()
            .find(|c| c.side != attacker.side)
            .unwrap();
        let outcome = combat_uc
            .turn
            .execute(game.id, combat_id, attacker.id, defender.id)
            .await
            .unwrap();
        if outcome.is_final() {
            resolved = true;
            break;
        }
        combat = combat_uc.query.get(game.id, combat_id).await.unwrap();
        assert!(combat
            .combatants
            .iter()
            .all(|c| c.side == CombatantSide::Character || !c.creature.is_fainted()));
    }

    assert!(resolved);
    let gone = combat_uc.query.get(game.id, combat_id).await;
    assert!(matches!(gone, Err(CombatError::CombatNotFound(_))));
    let game = app.use_cases.game.ops.get(game.id).await.unwrap();
    assert!(game.combat_id.is_none());
}

#[tokio::test]
async fn deleting_through_the_wrong_kind_keeps_the_creature() {
    let app = app();
    let hero = character(&app, "Hero").await;
    let ops = &app.use_cases.creature.ops;

    let wrong = ops.delete(CreatureKind::Monster, hero.id).await;
    assert!(matches!(wrong, Err(CreatureError::Validation(_))));
    assert!(ops.get(CreatureKind::Character, hero.id).await.is_ok());

    assert!(ops.delete(CreatureKind::Character, hero.id).await.unwrap());
    assert!(!ops.delete(CreatureKind::Character, hero.id).await.unwrap());
}

#[tokio::test]
async fn opening_two_treasures_at_once_keeps_both_payouts() {
    let store = Arc::new(MemoryStore::new());
    let mut repos = Repositories::from_store(store.clone());
    repos.creature = Arc::new(SlowCreatureReads(store));
    let app = app_with(repos);

    gold_treasure_type(&app).await;
    let hero = character(&app, "Hero").await;
    let mut game_settings = settings(Some(player("alice", Some(hero.id))));
    game_settings.min_treasures = 2;
    game_settings.max_treasures = 2;
    let game = app
        .use_cases
        .game
        .create
        .execute(game_settings)
        .await
        .unwrap();
    let treasure_ids: Vec<_> = game
        .map
        .interactions
        .iter()
        .filter_map(|(_, interaction)| interaction.treasure_id())
        .collect();
    assert_eq!(treasure_ids.len(), 2);

    let open = &app.use_cases.treasure.open;
    let (first, second) = tokio::join!(
        open.execute(treasure_ids[0], game.party.id),
        open.execute(treasure_ids[1], game.party.id),
    );

    let delivered = first.unwrap().report.delivered + second.unwrap().report.delivered;
    assert_eq!(delivered, 6);
    let hero = app
        .use_cases
        .creature
        .ops
        .get(CreatureKind::Character, hero.id)
        .await
        .unwrap();
    assert_eq!(hero.inventory.currencies.len(), 6);
}

#[tokio::test]
async fn fighting_creatures_cannot_be_deleted_until_combat_ends() {
    let app = app();
    let (game, hero) = started_game(&app).await;
    let combat_uc = &app.use_cases.combat;
    let ops = &app.use_cases.creature.ops;

    let combat = combat_uc
        .begin
        .execute(game.id, Location::ORIGIN)
        .await
        .unwrap();
    let monster_id = combat
        .combatants
        .iter()
        .find(|c| c.side == CombatantSide::Monster)
        .unwrap()
        .creature
        .id;

    let monster = ops.delete(CreatureKind::Monster, monster_id).await;
    assert!(matches!(monster, Err(CreatureError::InCombat(id)) if id == monster_id));
    let character = ops.delete(CreatureKind::Character, hero.id).await;
    assert!(matches!(character, Err(CreatureError::InCombat(_))));

    let still_running = combat_uc.query.get(game.id, combat.id).await.unwrap();
    assert_eq!(still_running.combatants.len(), combat.combatants.len());
    let blocked = combat_uc.begin.execute(game.id, Location::ORIGIN).await;
    assert!(matches!(blocked, Err(CombatError::AlreadyInCombat(_))));
}
