//! Treasure type and treasure tables.

use async_trait::async_trait;
use delver_domain::{LootTable, Treasure, TreasureId, TreasureType, TreasureTypeId};

use super::{MemoryStore, Tables, TreasureRow};
use crate::infrastructure::ports::{RepoError, TreasureOpening, TreasureRepo};

impl Tables {
    pub(super) fn insert_treasure(
        &mut self,
        treasure_type_id: TreasureTypeId,
    ) -> Result<TreasureId, RepoError> {
        if !self.treasure_types.contains_key(&treasure_type_id) {
            return Err(RepoError::not_found("TreasureType", treasure_type_id));
        }
        self.before_insert("treasures")?;
        let id = self.next_id();
        self.treasures.insert(
            id,
            TreasureRow {
                treasure_type_id,
                opened: false,
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl TreasureRepo for MemoryStore {
    async fn create_type(&self, loot: &LootTable) -> Result<TreasureType, RepoError> {
        self.transact("create_treasure_type", |tables| {
            tables.before_insert("treasure_types")?;
            let id = tables.next_id();
            tables.treasure_types.insert(id, loot.clone());
            Ok(TreasureType {
                id,
                loot: loot.clone(),
            })
        })
        .await
    }

    async fn get_type(&self, id: TreasureTypeId) -> Result<Option<TreasureType>, RepoError> {
        self.read("get_treasure_type", |tables| {
            Ok(tables.treasure_types.get(&id).map(|loot| TreasureType {
                id,
                loot: loot.clone(),
            }))
        })
        .await
    }

    async fn list_types(&self) -> Result<Vec<TreasureType>, RepoError> {
        self.read("list_treasure_types", |tables| {
            let mut types: Vec<TreasureType> = tables
                .treasure_types
                .iter()
                .map(|(id, loot)| TreasureType {
                    id: *id,
                    loot: loot.clone(),
                })
                .collect();
            types.sort_by_key(|t| t.id);
            Ok(types)
        })
        .await
    }

    async fn update_type(&self, treasure_type: &TreasureType) -> Result<(), RepoError> {
        self.transact("update_treasure_type", |tables| {
            let loot = tables
                .treasure_types
                .get_mut(&treasure_type.id)
                .ok_or_else(|| RepoError::not_found("TreasureType", treasure_type.id))?;
            *loot = treasure_type.loot.clone();
            Ok(())
        })
        .await
    }

    async fn delete_type(&self, id: TreasureTypeId) -> Result<bool, RepoError> {
        self.transact("delete_treasure_type", |tables| {
            if !tables.treasure_types.contains_key(&id) {
                return Ok(false);
            }
            if tables
                .treasures
                .values()
                .any(|treasure| treasure.treasure_type_id == id)
            {
                return Err(RepoError::constraint(format!(
                    "Treasure type {} is still placed on a map",
                    id
                )));
            }
            tables.treasure_types.remove(&id);
            Ok(true)
        })
        .await
    }

    async fn get(&self, id: TreasureId) -> Result<Option<Treasure>, RepoError> {
        self.read("get_treasure", |tables| {
            Ok(tables.treasures.get(&id).map(|row| Treasure {
                id,
                treasure_type_id: row.treasure_type_id,
                opened: row.opened,
            }))
        })
        .await
    }

    async fn commit_opening(&self, opening: &TreasureOpening) -> Result<(), RepoError> {
        self.transact("commit_treasure_opening", |tables| {
            let treasure = tables
                .treasures
                .get_mut(&opening.treasure_id)
                .ok_or_else(|| RepoError::not_found("Treasure", opening.treasure_id))?;
            if treasure.opened {
                return Err(RepoError::conflict(format!(
                    "Treasure {} was already opened",
                    opening.treasure_id
                )));
            }
            treasure.opened = true;
            for inventory in &opening.inventories {
                tables.save_inventory_items(inventory)?;
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delver_domain::{Inventory, InventoryId, Range};

    fn loot() -> LootTable {
        LootTable {
            equipment_ids: vec![],
            consumable_ids: vec![],
            currency_ids: vec![],
            num_equipment: None,
            num_consumables: Some(Range::exactly(1)),
            num_currencies: None,
        }
    }

    #[tokio::test]
    async fn delete_type_reports_missing_rows() {
        let store = MemoryStore::new();

        assert!(!store.delete_type(TreasureTypeId::new(77)).await.unwrap());
    }

    #[tokio::test]
    async fn when_type_is_placed_delete_is_refused() {
        let store = MemoryStore::new();
        let treasure_type = store.create_type(&loot()).await.unwrap();
        store
            .transact("seed", |tables| tables.insert_treasure(treasure_type.id))
            .await
            .unwrap();

        let result = store.delete_type(treasure_type.id).await;

        assert!(matches!(result, Err(RepoError::ConstraintViolation(_))));
        assert!(store.get_type(treasure_type.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_opening_conflicts() {
        let store = MemoryStore::new();
        let treasure_type = store.create_type(&loot()).await.unwrap();
        let treasure_id = store
            .transact("seed", |tables| tables.insert_treasure(treasure_type.id))
            .await
            .unwrap();
        let opening = TreasureOpening {
            treasure_id,
            inventories: vec![],
        };

        store.commit_opening(&opening).await.unwrap();
        let again = store.commit_opening(&opening).await;

        assert!(matches!(again, Err(RepoError::Conflict(_))));
        assert!(store.get(treasure_id).await.unwrap().unwrap().opened);
    }

    #[tokio::test]
    async fn when_inventory_is_missing_opening_rolls_back() {
        let store = MemoryStore::new();
        let treasure_type = store.create_type(&loot()).await.unwrap();
        let treasure_id = store
            .transact("seed", |tables| tables.insert_treasure(treasure_type.id))
            .await
            .unwrap();
        let opening = TreasureOpening {
            treasure_id,
            inventories: vec![Inventory::empty(InventoryId::new(404), 1, 1)],
        };

        let result = store.commit_opening(&opening).await;

        assert!(matches!(result, Err(RepoError::NotFound { .. })));
        assert!(!store.get(treasure_id).await.unwrap().unwrap().opened);
    }
}
