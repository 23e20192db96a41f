//! HTTP routes.
//!
//! Handlers are thin: parse the wire body into domain types, call one use
//! case, convert the result back to a wire response.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use delver_domain::{
    AbilityScores, CatalogItem, CombatId, CombatantId, ConsumableId, CreatureId, CreatureKind,
    CreatureName, CreatureTypeId, CreatureTypeUpdate, CreatureUpdate, CurrencyId, DisplayName,
    EquipmentId, GameId, GameSettings, InventoryId, InventoryUpdate, ItemName, Location,
    LootTable, NewCreature, NewDungeonMaster, NewItem, NewPlayer, PartyId, PlayerId,
    PropertiesId, PropertiesUpdate, Range, TreasureId, TreasureType, TreasureTypeId, UserId,
};
use delver_shared::{
    BeginCombatData, CombatResponse, ConsumableResponse, CreateConsumableData,
    CreateCreatureData, CreateCurrencyData, CreateEquipmentData, CreateGameData,
    CreatureResponse, CurrencyResponse, DeletedResponse, DistributionResponse,
    DungeonMasterData, DungeonMasterResponse, EquipmentResponse, GameResponse, HealthResponse,
    ListCreaturesQuery, LobbyEntryResponse, LocationData, MovePartyData, OpenTreasureData,
    PlayerData, PlayerResponse, RangeData, TakeTurnData, TreasureTypeData, TreasureTypeResponse,
    TurnResponse, UpdateCreatureData, UpdateGameData,
};

use crate::api::auth::{AdminAccess, SharedAccess, UserAccess};
use crate::api::error::ApiError;
use crate::app::App;
use crate::infrastructure::ports::GameStateUpdate;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        // Creatures
        .route("/api/monsters", post(create_monster).get(list_monsters))
        .route(
            "/api/monsters/{id}",
            get(get_monster).put(update_monster).delete(delete_monster),
        )
        .route("/api/characters", post(create_character).get(list_characters))
        .route(
            "/api/characters/{id}",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        // Item catalog
        .route("/api/items/equipment", post(create_equipment))
        .route("/api/items/consumables", post(create_consumable))
        .route("/api/items/currencies", post(create_currency))
        // Treasure
        .route(
            "/api/treasure-types",
            post(create_treasure_type).get(list_treasure_types),
        )
        .route(
            "/api/treasure-types/{id}",
            get(get_treasure_type)
                .put(update_treasure_type)
                .delete(delete_treasure_type),
        )
        .route("/api/treasures/{id}/open", post(open_treasure))
        // Games
        .route("/api/games", post(create_game))
        .route("/api/games/{id}", get(get_game).put(update_game))
        .route("/api/games/{id}/start", post(start_game))
        .route("/api/games/{id}/join/player", post(join_as_player))
        .route("/api/games/{id}/join/dm", post(join_as_dungeon_master))
        .route("/api/games/{id}/move", post(move_party))
        // Combat
        .route("/api/games/{id}/combat", post(begin_combat))
        .route("/api/games/{id}/combat/{combat_id}", get(get_combat))
        .route("/api/games/{id}/combat/{combat_id}/turn", post(take_turn))
        // Lobby
        .route("/api/lobby/parties", get(open_parties))
        .route("/api/lobby/dungeon-masters", get(open_dungeon_master_seats))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Creatures
// =============================================================================

async fn create_monster(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<CreateCreatureData>,
) -> Result<Json<CreatureResponse>, ApiError> {
    create_creature(&app, CreatureKind::Monster, data).await
}

async fn list_monsters(
    _: SharedAccess,
    State(app): State<Arc<App>>,
    Query(query): Query<ListCreaturesQuery>,
) -> Result<Json<Vec<CreatureResponse>>, ApiError> {
    list_creatures(&app, CreatureKind::Monster, query).await
}

async fn get_monster(
    _: SharedAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<CreatureResponse>, ApiError> {
    get_creature(&app, CreatureKind::Monster, id).await
}

async fn update_monster(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateCreatureData>,
) -> Result<Json<CreatureResponse>, ApiError> {
    update_creature(&app, CreatureKind::Monster, id, data).await
}

async fn delete_monster(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    delete_creature(&app, CreatureKind::Monster, id).await
}

async fn create_character(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<CreateCreatureData>,
) -> Result<Json<CreatureResponse>, ApiError> {
    create_creature(&app, CreatureKind::Character, data).await
}

async fn list_characters(
    _: SharedAccess,
    State(app): State<Arc<App>>,
    Query(query): Query<ListCreaturesQuery>,
) -> Result<Json<Vec<CreatureResponse>>, ApiError> {
    list_creatures(&app, CreatureKind::Character, query).await
}

async fn get_character(
    _: SharedAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<CreatureResponse>, ApiError> {
    get_creature(&app, CreatureKind::Character, id).await
}

async fn update_character(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateCreatureData>,
) -> Result<Json<CreatureResponse>, ApiError> {
    update_creature(&app, CreatureKind::Character, id, data).await
}

async fn delete_character(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    delete_creature(&app, CreatureKind::Character, id).await
}

async fn create_creature(
    app: &App,
    kind: CreatureKind,
    data: CreateCreatureData,
) -> Result<Json<CreatureResponse>, ApiError> {
    let creature = app
        .use_cases
        .creature
        .ops
        .create(kind, new_creature(data)?)
        .await?;
    Ok(Json((&creature).into()))
}

async fn list_creatures(
    app: &App,
    kind: CreatureKind,
    query: ListCreaturesQuery,
) -> Result<Json<Vec<CreatureResponse>>, ApiError> {
    let ids: Vec<CreatureId> = query
        .parse_ids()
        .map_err(ApiError::BadRequest)?
        .into_iter()
        .map(CreatureId::new)
        .collect();
    let creatures = app.use_cases.creature.ops.list(kind, &ids).await?;
    Ok(Json(creatures.iter().map(Into::into).collect()))
}

async fn get_creature(
    app: &App,
    kind: CreatureKind,
    id: i64,
) -> Result<Json<CreatureResponse>, ApiError> {
    let creature = app
        .use_cases
        .creature
        .ops
        .get(kind, CreatureId::new(id))
        .await?;
    Ok(Json((&creature).into()))
}

async fn update_creature(
    app: &App,
    kind: CreatureKind,
    id: i64,
    data: UpdateCreatureData,
) -> Result<Json<CreatureResponse>, ApiError> {
    let creature = app
        .use_cases
        .creature
        .ops
        .update(kind, CreatureId::new(id), creature_update(data)?)
        .await?;
    Ok(Json((&creature).into()))
}

async fn delete_creature(
    app: &App,
    kind: CreatureKind,
    id: i64,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = app
        .use_cases
        .creature
        .ops
        .delete(kind, CreatureId::new(id))
        .await?;
    Ok(Json(DeletedResponse { deleted }))
}

fn new_creature(data: CreateCreatureData) -> Result<NewCreature, ApiError> {
    Ok(NewCreature {
        name: CreatureName::new(data.name)?,
        hp: data.hp,
        abilities: AbilityScores::new(data.abilities),
        class: data.class,
        race: data.race,
        kind: data.creature_type,
        equipment_capacity: data.equipment_capacity,
        consumables_capacity: data.consumables_capacity,
    })
}

fn creature_update(data: UpdateCreatureData) -> Result<CreatureUpdate, ApiError> {
    Ok(CreatureUpdate {
        name: CreatureName::new(data.name)?,
        kind: data.creature_type,
        properties: PropertiesUpdate {
            id: data.properties.id.map(PropertiesId::new),
            level: data.properties.level,
            xp: data.properties.xp,
            hp: data.properties.hp,
            abilities: AbilityScores::new(data.properties.abilities),
        },
        creature_type: CreatureTypeUpdate {
            id: data.type_data.id.map(CreatureTypeId::new),
            class: data.type_data.class,
            race: data.type_data.race,
            kind: data.type_data.creature_type,
        },
        inventory: InventoryUpdate {
            id: data.inventory.id.map(InventoryId::new),
            equipment_capacity: data.inventory.equipment_capacity,
            consumables_capacity: data.inventory.consumables_capacity,
            equipment_ids: ids(&data.inventory.equipment_ids),
            consumable_ids: ids(&data.inventory.consumable_ids),
            currency_ids: ids(&data.inventory.currency_ids),
        },
        equipped: data.equipped.map(|slot| slot.map(EquipmentId::new)),
    })
}

fn ids<T: From<i64>>(raw: &[i64]) -> Vec<T> {
    raw.iter().copied().map(T::from).collect()
}

// =============================================================================
// Item catalog
// =============================================================================

async fn create_equipment(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<CreateEquipmentData>,
) -> Result<Json<EquipmentResponse>, ApiError> {
    let item = NewItem::Equipment {
        name: ItemName::new(data.name)?,
        slot: data.slot,
        ability_modifiers: data.ability_modifiers,
    };
    match app.use_cases.item.catalog.create(item).await? {
        CatalogItem::Equipment(equipment) => Ok(Json((&equipment).into())),
        other => Err(unexpected_item("equipment", &other)),
    }
}

async fn create_consumable(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<CreateConsumableData>,
) -> Result<Json<ConsumableResponse>, ApiError> {
    let item = NewItem::Consumable {
        name: ItemName::new(data.name)?,
        kind: data.kind,
    };
    match app.use_cases.item.catalog.create(item).await? {
        CatalogItem::Consumable(consumable) => Ok(Json((&consumable).into())),
        other => Err(unexpected_item("consumable", &other)),
    }
}

async fn create_currency(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<CreateCurrencyData>,
) -> Result<Json<CurrencyResponse>, ApiError> {
    let item = NewItem::Currency {
        kind: data.kind,
        total: data.total,
    };
    match app.use_cases.item.catalog.create(item).await? {
        CatalogItem::Currency(currency) => Ok(Json((&currency).into())),
        other => Err(unexpected_item("currency", &other)),
    }
}

fn unexpected_item(expected: &str, got: &CatalogItem) -> ApiError {
    ApiError::Internal(format!(
        "Catalog returned item {} for a {} insert",
        got.raw_id(),
        expected
    ))
}

// =============================================================================
// Treasure
// =============================================================================

async fn create_treasure_type(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<TreasureTypeData>,
) -> Result<Json<TreasureTypeResponse>, ApiError> {
    let created = app
        .use_cases
        .treasure
        .types
        .create(loot_table(data)?)
        .await?;
    Ok(Json((&created).into()))
}

async fn list_treasure_types(
    _: AdminAccess,
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<TreasureTypeResponse>>, ApiError> {
    let types = app.use_cases.treasure.types.list().await?;
    Ok(Json(types.iter().map(Into::into).collect()))
}

async fn get_treasure_type(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<TreasureTypeResponse>, ApiError> {
    let found = app
        .use_cases
        .treasure
        .types
        .get(TreasureTypeId::new(id))
        .await?;
    Ok(Json((&found).into()))
}

async fn update_treasure_type(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<TreasureTypeData>,
) -> Result<Json<TreasureTypeResponse>, ApiError> {
    let replacement = TreasureType {
        id: TreasureTypeId::new(id),
        loot: loot_table(data)?,
    };
    let updated = app.use_cases.treasure.types.update(replacement).await?;
    Ok(Json((&updated).into()))
}

async fn delete_treasure_type(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = app
        .use_cases
        .treasure
        .types
        .delete(TreasureTypeId::new(id))
        .await?;
    Ok(Json(DeletedResponse { deleted }))
}

async fn open_treasure(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<OpenTreasureData>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let opened = app
        .use_cases
        .treasure
        .open
        .execute(TreasureId::new(id), PartyId::new(data.party_id))
        .await?;
    Ok(Json(opened.report.into()))
}

fn loot_table(data: TreasureTypeData) -> Result<LootTable, ApiError> {
    Ok(LootTable {
        equipment_ids: ids::<EquipmentId>(&data.equipment_ids),
        consumable_ids: ids::<ConsumableId>(&data.consumable_ids),
        currency_ids: ids::<CurrencyId>(&data.currency_ids),
        num_equipment: data.num_equipment.map(range).transpose()?,
        num_consumables: data.num_consumables.map(range).transpose()?,
        num_currencies: data.num_currencies.map(range).transpose()?,
    })
}

fn range(data: RangeData) -> Result<Range, ApiError> {
    Ok(Range::new(data.min, data.max)?)
}

// =============================================================================
// Games
// =============================================================================

async fn create_game(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Json(data): Json<CreateGameData>,
) -> Result<Json<GameResponse>, ApiError> {
    let settings = GameSettings {
        num_rows: data.num_rows,
        num_cols: data.num_cols,
        min_monsters: data.min_monsters,
        max_monsters: data.max_monsters,
        min_treasures: data.min_treasures,
        max_treasures: data.max_treasures,
        player: data.player.map(new_player).transpose()?,
        dungeon_master: data.dungeon_master.map(new_dungeon_master).transpose()?,
    };
    let game = app.use_cases.game.create.execute(settings).await?;
    Ok(Json((&game).into()))
}

async fn get_game(
    _: SharedAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = app.use_cases.game.ops.get(GameId::new(id)).await?;
    Ok(Json((&game).into()))
}

async fn update_game(
    _: AdminAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<UpdateGameData>,
) -> Result<Json<GameResponse>, ApiError> {
    let state = GameStateUpdate {
        active: data.active,
        party_location: location(data.party_location),
    };
    let game = app.use_cases.game.ops.update(GameId::new(id), state).await?;
    Ok(Json((&game).into()))
}

async fn start_game(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = app.use_cases.game.ops.start(GameId::new(id)).await?;
    Ok(Json((&game).into()))
}

async fn join_as_player(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<PlayerData>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = app
        .use_cases
        .game
        .join
        .as_player(GameId::new(id), new_player(data)?)
        .await?;
    Ok(Json((&player).into()))
}

async fn join_as_dungeon_master(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<DungeonMasterData>,
) -> Result<Json<DungeonMasterResponse>, ApiError> {
    let dungeon_master = app
        .use_cases
        .game
        .join
        .as_dungeon_master(GameId::new(id), new_dungeon_master(data)?)
        .await?;
    Ok(Json((&dungeon_master).into()))
}

async fn move_party(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<MovePartyData>,
) -> Result<Json<LocationData>, ApiError> {
    let to = app
        .use_cases
        .game
        .ops
        .move_party(GameId::new(id), PlayerId::new(data.player_id), data.direction)
        .await?;
    Ok(Json(LocationData {
        row: to.row,
        col: to.col,
    }))
}

fn new_player(data: PlayerData) -> Result<NewPlayer, ApiError> {
    Ok(NewPlayer {
        user_id: UserId::new(data.user_id)?,
        user_name: DisplayName::new(data.user_name)?,
        character_id: data.character_id.map(CreatureId::new),
    })
}

fn new_dungeon_master(data: DungeonMasterData) -> Result<NewDungeonMaster, ApiError> {
    Ok(NewDungeonMaster {
        user_id: UserId::new(data.user_id)?,
        user_name: DisplayName::new(data.user_name)?,
    })
}

fn location(data: LocationData) -> Location {
    Location::new(data.row, data.col)
}

// =============================================================================
// Combat
// =============================================================================

async fn begin_combat(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path(id): Path<i64>,
    Json(data): Json<BeginCombatData>,
) -> Result<Json<CombatResponse>, ApiError> {
    let combat = app
        .use_cases
        .combat
        .begin
        .execute(GameId::new(id), location(data.location))
        .await?;
    Ok(Json((&combat).into()))
}

async fn get_combat(
    _: SharedAccess,
    State(app): State<Arc<App>>,
    Path((id, combat_id)): Path<(i64, i64)>,
) -> Result<Json<CombatResponse>, ApiError> {
    let combat = app
        .use_cases
        .combat
        .query
        .get(GameId::new(id), CombatId::new(combat_id))
        .await?;
    Ok(Json((&combat).into()))
}

async fn take_turn(
    _: UserAccess,
    State(app): State<Arc<App>>,
    Path((id, combat_id)): Path<(i64, i64)>,
    Json(data): Json<TakeTurnData>,
) -> Result<Json<TurnResponse>, ApiError> {
    let outcome = app
        .use_cases
        .combat
        .turn
        .execute(
            GameId::new(id),
            CombatId::new(combat_id),
            CombatantId::new(data.attacker_id),
            CombatantId::new(data.defender_id),
        )
        .await?;
    Ok(Json((&outcome).into()))
}

// =============================================================================
// Lobby
// =============================================================================

async fn open_parties(
    _: SharedAccess,
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<LobbyEntryResponse>>, ApiError> {
    let games = app.use_cases.game.lobby.open_parties().await?;
    Ok(Json(games.iter().map(Into::into).collect()))
}

async fn open_dungeon_master_seats(
    _: SharedAccess,
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<LobbyEntryResponse>>, ApiError> {
    let games = app.use_cases.game.lobby.open_dungeon_master_seats().await?;
    Ok(Json(games.iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use delver_shared::ErrorResponse;
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::auth::{ADMIN_TOKEN_HEADER, USER_TOKEN_HEADER};
    use crate::app::{ApiTokens, Repositories};
    use crate::infrastructure::memory::MemoryStore;
    use crate::infrastructure::random::FixedRandom;

    const ADMIN: (&str, &str) = (ADMIN_TOKEN_HEADER, "admin-secret");
    const USER: (&str, &str) = (USER_TOKEN_HEADER, "user-secret");

    fn router() -> Router {
        let app = App::new(
            Repositories::from_store(Arc::new(MemoryStore::new())),
            Arc::new(FixedRandom(0)),
            ApiTokens {
                admin: ADMIN.1.into(),
                user: USER.1.into(),
            },
        );
        routes().with_state(Arc::new(app))
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<(&str, &str)>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some((name, value)) = token {
            request = request.header(name, value);
        }
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    fn creature_body(kind: &str) -> serde_json::Value {
        json!({
            "name": "Grog",
            "hp": 30,
            "abilities": [10, 14, 10, 10, 10, 10],
            "class": "fighter",
            "race": "orc",
            "creature_type": kind,
            "equipment_capacity": 2,
            "consumables_capacity": 2
        })
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let router = router();
        let (status, body) = send(&router, "GET", "/api/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<HealthResponse>(&body).status, "ok");
    }

    #[tokio::test]
    async fn when_token_missing_returns_401_envelope() {
        let router = router();
        let (status, body) = send(&router, "GET", "/api/monsters", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            parse::<ErrorResponse>(&body),
            ErrorResponse::single("Unauthorized request.")
        );
    }

    #[tokio::test]
    async fn creating_monster_requires_admin_token() {
        let router = router();
        let (status, _) = send(
            &router,
            "POST",
            "/api/monsters",
            Some(USER),
            Some(creature_body("monster")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            &router,
            "POST",
            "/api/monsters",
            Some(ADMIN),
            Some(creature_body("monster")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: CreatureResponse = parse(&body);
        assert_eq!(created.creature_type, CreatureKind::Monster);

        let uri = format!("/api/monsters/{}", created.id);
        let (status, body) = send(&router, "GET", &uri, Some(USER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<CreatureResponse>(&body), created);
    }

    #[tokio::test]
    async fn when_creature_kind_mismatches_endpoint_returns_400() {
        let router = router();
        let (status, body) = send(
            &router,
            "POST",
            "/api/characters",
            Some(USER),
            Some(creature_body("monster")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(parse::<ErrorResponse>(&body).errors.len(), 1);
    }

    #[tokio::test]
    async fn character_fetched_as_monster_is_404() {
        let router = router();
        let (_, body) = send(
            &router,
            "POST",
            "/api/characters",
            Some(USER),
            Some(creature_body("character")),
        )
        .await;
        let created: CreatureResponse = parse(&body);

        let uri = format!("/api/monsters/{}", created.id);
        let (status, _) = send(&router, "GET", &uri, Some(ADMIN), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_filter_is_400() {
        let router = router();
        let (status, _) = send(&router, "GET", "/api/characters?ids=1,x", Some(USER), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn game_lifecycle_over_http() {
        let router = router();
        let (_, body) = send(
            &router,
            "POST",
            "/api/items/currencies",
            Some(ADMIN),
            Some(json!({ "kind": "gold", "total": 5 })),
        )
        .await;
        let gold: CurrencyResponse = parse(&body);
        let (status, _) = send(
            &router,
            "POST",
            "/api/treasure-types",
            Some(ADMIN),
            Some(json!({
                "currency_ids": [gold.id],
                "num_currencies": { "min": 1, "max": 1 }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &router,
            "POST",
            "/api/games",
            Some(USER),
            Some(json!({
                "num_rows": 4,
                "num_cols": 4,
                "min_monsters": 1,
                "max_monsters": 1,
                "min_treasures": 1,
                "max_treasures": 1,
                "dungeon_master": { "user_id": "dm", "user_name": "Dee" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let game: GameResponse = parse(&body);
        assert!(!game.active);
        assert_eq!(game.map.interactions.len(), 2);

        let (_, body) = send(&router, "GET", "/api/lobby/parties", Some(USER), None).await;
        let lobby: Vec<LobbyEntryResponse> = parse(&body);
        assert_eq!(lobby.len(), 1);
        assert_eq!(lobby[0].player_count, 0);

        let join = format!("/api/games/{}/join/player", game.id);
        let (status, body) = send(
            &router,
            "POST",
            &join,
            Some(USER),
            Some(json!({ "user_id": "pat", "user_name": "Pat" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let player: PlayerResponse = parse(&body);

        let (status, _) = send(
            &router,
            "POST",
            &format!("/api/games/{}/join/dm", game.id),
            Some(USER),
            Some(json!({ "user_id": "someone-else", "user_name": "Sam" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &router,
            "POST",
            &format!("/api/games/{}/start", game.id),
            Some(USER),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(parse::<GameResponse>(&body).active);

        let moves = format!("/api/games/{}/move", game.id);
        let (status, _) = send(
            &router,
            "POST",
            &moves,
            Some(USER),
            Some(json!({ "player_id": player.id, "direction": "west" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, body) = send(
            &router,
            "POST",
            &moves,
            Some(USER),
            Some(json!({ "player_id": player.id, "direction": "east" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse::<LocationData>(&body), LocationData { row: 0, col: 1 });

        let (status, _) = send(
            &router,
            "PUT",
            &format!("/api/games/{}", game.id),
            Some(ADMIN),
            Some(json!({ "active": true, "party_location": { "row": 9, "col": 0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_game_is_404() {
        let router = router();
        let (status, body) = send(&router, "GET", "/api/games/999", Some(ADMIN), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(parse::<ErrorResponse>(&body).errors.len(), 1);
    }
}
