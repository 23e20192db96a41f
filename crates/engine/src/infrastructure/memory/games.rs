//! Game, party, dungeon master and map tables.

use async_trait::async_trait;
use delver_domain::{
    DungeonMaster, Game, GameId, GameMap, GameSummary, Interaction, InteractionGrid, Location,
    NewDungeonMaster, NewGame, NewPlayer, Party, PartyId, Player, PlayerId, MAX_PLAYERS,
};

use super::{corrupt, DungeonMasterRow, GameRow, MapRow, MemoryStore, PartyRow, PlayerRow, Tables};
use crate::infrastructure::ports::{GameRepo, GameStateUpdate, RepoError};

impl Tables {
    fn insert_player(&mut self, player: &NewPlayer) -> Result<Player, RepoError> {
        self.before_insert("players")?;
        let id = self.next_id();
        self.players.insert(
            id,
            PlayerRow {
                user_id: player.user_id.clone(),
                user_name: player.user_name.clone(),
                character_id: player.character_id,
            },
        );
        Ok(Player {
            id,
            user_id: player.user_id.clone(),
            user_name: player.user_name.clone(),
            character_id: player.character_id,
        })
    }

    fn insert_dungeon_master(
        &mut self,
        dungeon_master: &NewDungeonMaster,
    ) -> Result<DungeonMaster, RepoError> {
        self.before_insert("dungeon_masters")?;
        let id = self.next_id();
        self.dungeon_masters.insert(
            id,
            DungeonMasterRow {
                user_id: dungeon_master.user_id.clone(),
                user_name: dungeon_master.user_name.clone(),
            },
        );
        Ok(DungeonMaster {
            id,
            user_id: dungeon_master.user_id.clone(),
            user_name: dungeon_master.user_name.clone(),
        })
    }

    fn party(&self, id: PartyId) -> Result<Option<Party>, RepoError> {
        let Some(row) = self.parties.get(&id) else {
            return Ok(None);
        };
        let players = row
            .player_ids
            .iter()
            .map(|player_id| self.player(*player_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Party {
            id,
            players,
            location: row.location,
        }))
    }

    fn player(&self, id: PlayerId) -> Result<Player, RepoError> {
        let row = self
            .players
            .get(&id)
            .ok_or_else(|| RepoError::not_found("Player", id))?;
        Ok(Player {
            id,
            user_id: row.user_id.clone(),
            user_name: row.user_name.clone(),
            character_id: row.character_id,
        })
    }

    pub(super) fn game(&self, id: GameId) -> Result<Option<Game>, RepoError> {
        let Some(row) = self.games.get(&id) else {
            return Ok(None);
        };
        let party = self
            .party(row.party_id)?
            .ok_or_else(|| RepoError::not_found("Party", row.party_id))?;
        let dungeon_master = match row.dungeon_master_id {
            Some(dm_id) => {
                let dm = self
                    .dungeon_masters
                    .get(&dm_id)
                    .ok_or_else(|| RepoError::not_found("DungeonMaster", dm_id))?;
                Some(DungeonMaster {
                    id: dm_id,
                    user_id: dm.user_id.clone(),
                    user_name: dm.user_name.clone(),
                })
            }
            None => None,
        };
        let map_row = self
            .maps
            .get(&row.map_id)
            .ok_or_else(|| RepoError::not_found("GameMap", row.map_id))?;
        let map = GameMap {
            id: row.map_id,
            num_rows: map_row.num_rows,
            num_cols: map_row.num_cols,
            interactions: InteractionGrid::deserialize(&map_row.interactions).map_err(corrupt)?,
        };

        Ok(Some(Game {
            id,
            party,
            dungeon_master,
            map,
            combat_id: row.combat_id,
            active: row.active,
        }))
    }

    fn game_row_mut(&mut self, id: GameId) -> Result<&mut GameRow, RepoError> {
        self.games
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Game", id))
    }
}

#[async_trait]
impl GameRepo for MemoryStore {
    async fn create(&self, game: &NewGame) -> Result<Game, RepoError> {
        self.transact("create_game", |tables| {
            let mut map = GameMap {
                id: tables.next_id(),
                num_rows: game.dimensions.num_rows(),
                num_cols: game.dimensions.num_cols(),
                interactions: InteractionGrid::new(),
            };
            for monster in &game.monsters {
                let creature_id = tables.insert_creature(&monster.creature)?;
                map.place(monster.location, Interaction::monster(creature_id))
                    .map_err(RepoError::constraint)?;
            }
            for treasure in &game.treasures {
                let treasure_id = tables.insert_treasure(treasure.treasure_type_id)?;
                map.place(treasure.location, Interaction::treasure(treasure_id))
                    .map_err(RepoError::constraint)?;
            }
            tables.before_insert("maps")?;
            tables.maps.insert(
                map.id,
                MapRow {
                    num_rows: map.num_rows,
                    num_cols: map.num_cols,
                    interactions: map.interactions.serialize(),
                },
            );

            let player_ids = match &game.player {
                Some(player) => vec![tables.insert_player(player)?.id],
                None => Vec::new(),
            };
            tables.before_insert("parties")?;
            let party_id = tables.next_id();
            tables.parties.insert(
                party_id,
                PartyRow {
                    player_ids,
                    location: Location::ORIGIN,
                },
            );

            let dungeon_master_id = match &game.dungeon_master {
                Some(dm) => Some(tables.insert_dungeon_master(dm)?.id),
                None => None,
            };

            tables.before_insert("games")?;
            let id = tables.next_id();
            tables.games.insert(
                id,
                GameRow {
                    party_id,
                    dungeon_master_id,
                    map_id: map.id,
                    combat_id: None,
                    active: false,
                },
            );
            tables
                .game(id)?
                .ok_or_else(|| RepoError::not_found("Game", id))
        })
        .await
    }

    async fn get(&self, id: GameId) -> Result<Option<Game>, RepoError> {
        self.read("get_game", |tables| tables.game(id)).await
    }

    async fn list_summaries(&self) -> Result<Vec<GameSummary>, RepoError> {
        self.read("list_game_summaries", |tables| {
            let mut summaries = Vec::with_capacity(tables.games.len());
            for (id, row) in &tables.games {
                let player_ids = tables
                    .parties
                    .get(&row.party_id)
                    .map(|party| party.player_ids.clone())
                    .ok_or_else(|| RepoError::not_found("Party", row.party_id))?;
                summaries.push(GameSummary {
                    game_id: *id,
                    active: row.active,
                    player_ids,
                    dungeon_master_id: row.dungeon_master_id,
                });
            }
            summaries.sort_by_key(|s| s.game_id);
            Ok(summaries)
        })
        .await
    }

    async fn get_party(&self, id: PartyId) -> Result<Option<Party>, RepoError> {
        self.read("get_party", |tables| tables.party(id)).await
    }

    async fn add_player(&self, game_id: GameId, player: &NewPlayer) -> Result<Player, RepoError> {
        self.transact("add_player", |tables| {
            let party_id = tables.game_row_mut(game_id)?.party_id;
            let seated = tables
                .parties
                .get(&party_id)
                .map(|party| party.player_ids.len())
                .ok_or_else(|| RepoError::not_found("Party", party_id))?;
            if seated >= MAX_PLAYERS {
                return Err(RepoError::constraint(format!(
                    "Party {} already has {} players",
                    party_id, MAX_PLAYERS
                )));
            }
            let created = tables.insert_player(player)?;
            if let Some(party) = tables.parties.get_mut(&party_id) {
                party.player_ids.push(created.id);
            }
            Ok(created)
        })
        .await
    }

    async fn assign_dungeon_master(
        &self,
        game_id: GameId,
        dungeon_master: &NewDungeonMaster,
    ) -> Result<DungeonMaster, RepoError> {
        self.transact("assign_dungeon_master", |tables| {
            if tables.game_row_mut(game_id)?.dungeon_master_id.is_some() {
                return Err(RepoError::conflict(format!(
                    "Game {} already has a dungeon master",
                    game_id
                )));
            }
            let created = tables.insert_dungeon_master(dungeon_master)?;
            tables.game_row_mut(game_id)?.dungeon_master_id = Some(created.id);
            Ok(created)
        })
        .await
    }

    async fn update_state(&self, game_id: GameId, state: GameStateUpdate) -> Result<(), RepoError> {
        self.transact("update_game_state", |tables| {
            let row = tables.game_row_mut(game_id)?;
            row.active = state.active;
            let party_id = row.party_id;
            let party = tables
                .parties
                .get_mut(&party_id)
                .ok_or_else(|| RepoError::not_found("Party", party_id))?;
            party.location = state.party_location;
            Ok(())
        })
        .await
    }
}
