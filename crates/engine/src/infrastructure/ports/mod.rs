//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Storage access (in-memory today, relational later)
//! - Randomness (for testing)

mod error;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CombatRepo, CreatureRepo, GameRepo, ItemRepo, TreasureRepo};

pub use types::{GameStateUpdate, TreasureOpening};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockCombatRepo, MockCreatureRepo, MockGameRepo, MockItemRepo, MockTreasureRepo};

#[cfg(test)]
pub use testing::MockRandomPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::RandomPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
