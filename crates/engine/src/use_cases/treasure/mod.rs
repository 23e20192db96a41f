//! Treasure use cases.
//!
//! Treasure types are templates (id pools plus roll counts); treasures are the
//! instances placed on game maps and opened by parties.

mod open;

use std::sync::Arc;

use delver_domain::{DomainError, LootTable, PartyId, TreasureId, TreasureType, TreasureTypeId};

use crate::infrastructure::ports::{ItemRepo, RepoError, TreasureRepo};

pub use open::{OpenTreasure, OpenedTreasure};

/// Container for treasure use cases.
pub struct TreasureUseCases {
    pub types: Arc<TreasureTypeOps>,
    pub open: Arc<OpenTreasure>,
}

impl TreasureUseCases {
    pub fn new(types: Arc<TreasureTypeOps>, open: Arc<OpenTreasure>) -> Self {
        Self { types, open }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TreasureError {
    #[error("Treasure type not found: {0}")]
    TypeNotFound(TreasureTypeId),
    #[error("Treasure not found: {0}")]
    TreasureNotFound(TreasureId),
    #[error("Party not found: {0}")]
    PartyNotFound(PartyId),
    #[error("Treasure {0} has already been opened")]
    AlreadyOpened(TreasureId),
    #[error("Treasure type {0} is still placed on a map")]
    TypeInUse(TreasureTypeId),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Treasure type CRUD.
pub struct TreasureTypeOps {
    treasures: Arc<dyn TreasureRepo>,
    items: Arc<dyn ItemRepo>,
}

impl TreasureTypeOps {
    pub fn new(treasures: Arc<dyn TreasureRepo>, items: Arc<dyn ItemRepo>) -> Self {
        Self { treasures, items }
    }

    pub async fn create(&self, loot: LootTable) -> Result<TreasureType, TreasureError> {
        self.validate_pools(&loot).await?;
        let created = self.treasures.create_type(&loot).await?;
        tracing::info!(treasure_type_id = %created.id, "Treasure type created");
        Ok(created)
    }

    pub async fn get(&self, id: TreasureTypeId) -> Result<TreasureType, TreasureError> {
        self.treasures
            .get_type(id)
            .await?
            .ok_or(TreasureError::TypeNotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<TreasureType>, TreasureError> {
        Ok(self.treasures.list_types().await?)
    }

    pub async fn update(&self, treasure_type: TreasureType) -> Result<TreasureType, TreasureError> {
        self.get(treasure_type.id).await?;
        self.validate_pools(&treasure_type.loot).await?;
        self.treasures.update_type(&treasure_type).await?;
        tracing::debug!(treasure_type_id = %treasure_type.id, "Treasure type updated");
        Ok(treasure_type)
    }

    /// Returns `false` when no such type exists.
    pub async fn delete(&self, id: TreasureTypeId) -> Result<bool, TreasureError> {
        match self.treasures.delete_type(id).await {
            Ok(deleted) => Ok(deleted),
            Err(RepoError::ConstraintViolation(_)) => Err(TreasureError::TypeInUse(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Count ranges must be sane and every pool id must name a catalog item.
    async fn validate_pools(&self, loot: &LootTable) -> Result<(), TreasureError> {
        loot.validate()?;
        self.items
            .get_equipment(&loot.equipment_ids)
            .await
            .map_err(unknown_item)?;
        self.items
            .get_consumables(&loot.consumable_ids)
            .await
            .map_err(unknown_item)?;
        self.items
            .get_currencies(&loot.currency_ids)
            .await
            .map_err(unknown_item)?;
        Ok(())
    }
}

fn unknown_item(e: RepoError) -> TreasureError {
    match e {
        RepoError::NotFound { entity_type, id } => {
            TreasureError::Validation(format!("Loot pool references unknown {} {}", entity_type, id))
        }
        other => TreasureError::Repo(other),
    }
}
