//! Delver Shared - Wire types for the engine's HTTP surface
//!
//! This crate contains the JSON request bodies and response envelopes shared
//! by the engine and any client:
//! - Request DTOs, one module per feature area
//! - Response DTOs with conversions from the domain model
//! - The `{ "errors": [...] }` error envelope
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **No domain IDs** - raw `i64` ids on the wire
//! 3. **Shared vocabulary** - enums such as `CreatureClass` or `Direction` are
//!    re-used from the domain crate as-is

pub mod requests;
pub mod responses;

pub use requests::{
    BeginCombatData, CreateConsumableData, CreateCreatureData, CreateCurrencyData,
    CreateEquipmentData, CreateGameData, CreatureTypeData, DungeonMasterData, InventoryData,
    ListCreaturesQuery, LocationData, MovePartyData, OpenTreasureData, PlayerData,
    PropertiesData, RangeData, TakeTurnData, TreasureTypeData, UpdateCreatureData,
    UpdateGameData,
};
pub use responses::{
    CombatResponse, CombatantResponse, ConsumableResponse, CreatureResponse,
    CurrencyResponse, DeletedResponse, DistributionResponse, DungeonMasterResponse,
    EquipmentResponse, ErrorMessage, ErrorResponse, GameResponse, HealthResponse,
    InteractionResponse, InventoryResponse, LobbyEntryResponse, MapResponse, PartyResponse,
    PlayerResponse, TreasureTypeResponse, TurnResponse,
};
