//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area. Use cases load
//! aggregates through the storage ports, apply domain rules and hand each
//! resulting write to storage as a single call.

pub mod combat;
pub mod creature;
pub mod game;
pub mod item;
pub mod treasure;

#[cfg(test)]
mod scenario_tests;
#[cfg(test)]
pub(crate) mod testing;

pub use combat::CombatUseCases;
pub use creature::CreatureUseCases;
pub use game::GameUseCases;
pub use item::ItemUseCases;
pub use treasure::TreasureUseCases;
