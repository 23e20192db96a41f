//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    config::AppConfig,
    locks::AggregateLocks,
    memory::MemoryStore,
    ports::{CombatRepo, CreatureRepo, GameRepo, ItemRepo, RandomPort, TreasureRepo},
    random::SystemRandom,
};
use crate::use_cases;
use crate::use_cases::combat::{BeginCombat, CombatQuery, TakeTurn};
use crate::use_cases::creature::CreatureOps;
use crate::use_cases::game::{CreateGame, GameOps, JoinGame, Lobby};
use crate::use_cases::item::ItemCatalog;
use crate::use_cases::treasure::{OpenTreasure, TreasureTypeOps};

/// Main application state.
///
/// Holds all repositories and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub tokens: ApiTokens,
}

/// Shared secrets checked by the token middleware.
#[derive(Debug, Clone)]
pub struct ApiTokens {
    pub admin: String,
    pub user: String,
}

impl From<&AppConfig> for ApiTokens {
    fn from(config: &AppConfig) -> Self {
        Self {
            admin: config.api_admin_token.clone(),
            user: config.api_user_token.clone(),
        }
    }
}

/// Container for all repository ports.
pub struct Repositories {
    pub creature: Arc<dyn CreatureRepo>,
    pub item: Arc<dyn ItemRepo>,
    pub treasure: Arc<dyn TreasureRepo>,
    pub game: Arc<dyn GameRepo>,
    pub combat: Arc<dyn CombatRepo>,
}

impl Repositories {
    /// Every port backed by the same store.
    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self {
            creature: store.clone(),
            item: store.clone(),
            treasure: store.clone(),
            game: store.clone(),
            combat: store,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub creature: use_cases::CreatureUseCases,
    pub item: use_cases::ItemUseCases,
    pub treasure: use_cases::TreasureUseCases,
    pub game: use_cases::GameUseCases,
    pub combat: use_cases::CombatUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repos: Repositories, random: Arc<dyn RandomPort>, tokens: ApiTokens) -> Self {
        let locks = Arc::new(AggregateLocks::new());

        let creature = use_cases::CreatureUseCases::new(Arc::new(CreatureOps::new(
            repos.creature.clone(),
            locks.clone(),
        )));

        let item = use_cases::ItemUseCases::new(Arc::new(ItemCatalog::new(repos.item.clone())));

        let treasure = use_cases::TreasureUseCases::new(
            Arc::new(TreasureTypeOps::new(
                repos.treasure.clone(),
                repos.item.clone(),
            )),
            Arc::new(OpenTreasure::new(
                repos.treasure.clone(),
                repos.game.clone(),
                repos.creature.clone(),
                repos.item.clone(),
                random.clone(),
                locks.clone(),
            )),
        );

        let game = use_cases::GameUseCases::new(
            Arc::new(CreateGame::new(
                repos.game.clone(),
                repos.treasure.clone(),
                repos.creature.clone(),
                random.clone(),
            )),
            Arc::new(GameOps::new(repos.game.clone(), locks.clone())),
            Arc::new(JoinGame::new(
                repos.game.clone(),
                repos.creature.clone(),
                locks.clone(),
            )),
            Arc::new(Lobby::new(repos.game.clone())),
        );

        let combat = use_cases::CombatUseCases::new(
            Arc::new(BeginCombat::new(
                repos.game.clone(),
                repos.creature.clone(),
                repos.combat.clone(),
                locks.clone(),
            )),
            Arc::new(TakeTurn::new(repos.combat.clone(), random, locks)),
            Arc::new(CombatQuery::new(repos.combat.clone())),
        );

        Self {
            repositories: repos,
            use_cases: UseCases {
                creature,
                item,
                treasure,
                game,
                combat,
            },
            tokens,
        }
    }

    /// An app over a fresh in-memory store with system randomness.
    pub fn in_memory(tokens: ApiTokens) -> Self {
        Self::new(
            Repositories::from_store(Arc::new(MemoryStore::new())),
            Arc::new(SystemRandom::new()),
            tokens,
        )
    }
}
