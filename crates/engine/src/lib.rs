//! Delver Engine library.
//!
//! Server-side code for the delver RPG game-session engine.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the domain model
//! - `infrastructure/` - Ports, the in-memory store and process plumbing
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
