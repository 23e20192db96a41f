//! Creature use cases.
//!
//! Monsters and characters share one table; every operation is scoped to the
//! kind the caller is working with.

use std::sync::Arc;

use delver_domain::{Creature, CreatureId, CreatureKind, CreatureUpdate, DomainError, NewCreature};

use crate::infrastructure::locks::AggregateLocks;
use crate::infrastructure::ports::{CreatureRepo, RepoError};

/// Container for creature use cases.
pub struct CreatureUseCases {
    pub ops: Arc<CreatureOps>,
}

impl CreatureUseCases {
    pub fn new(ops: Arc<CreatureOps>) -> Self {
        Self { ops }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreatureError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: CreatureKind, id: CreatureId },
    #[error("Creature {0} is in a combat that has not ended")]
    InCombat(CreatureId),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Kind-scoped creature CRUD.
pub struct CreatureOps {
    creatures: Arc<dyn CreatureRepo>,
    locks: Arc<AggregateLocks>,
}

impl CreatureOps {
    pub fn new(creatures: Arc<dyn CreatureRepo>, locks: Arc<AggregateLocks>) -> Self {
        Self { creatures, locks }
    }

    pub async fn create(
        &self,
        kind: CreatureKind,
        creature: NewCreature,
    ) -> Result<Creature, CreatureError> {
        creature.expect_kind(kind)?;
        creature.validate()?;

        let created = self.creatures.create(&creature).await?;
        tracing::info!(creature_id = %created.id, kind = %kind, "Creature created");
        Ok(created)
    }

    pub async fn get(&self, kind: CreatureKind, id: CreatureId) -> Result<Creature, CreatureError> {
        self.creatures
            .get(id)
            .await?
            .filter(|creature| creature.kind == kind)
            .ok_or(CreatureError::NotFound { kind, id })
    }

    /// All creatures of `kind`, or only those in `ids` when it is non-empty.
    pub async fn list(
        &self,
        kind: CreatureKind,
        ids: &[CreatureId],
    ) -> Result<Vec<Creature>, CreatureError> {
        Ok(self.creatures.list(ids, Some(kind)).await?)
    }

    /// Full replace of an existing creature. Sub-row ids must be supplied.
    pub async fn update(
        &self,
        kind: CreatureKind,
        id: CreatureId,
        update: CreatureUpdate,
    ) -> Result<Creature, CreatureError> {
        let targets = update.validate()?;
        if update.kind != kind {
            return Err(CreatureError::Validation(format!(
                "Could not update {} {} to kind {}",
                kind, id, update.kind
            )));
        }
        let _guard = self.locks.lock_creatures(&[id]).await;
        self.get(kind, id).await?;

        let updated = self.creatures.update(id, &update, targets).await?;
        tracing::debug!(creature_id = %id, kind = %kind, "Creature updated");
        Ok(updated)
    }

    /// Returns `false` when no creature has this id.
    ///
    /// A creature enlisted in a live combat cannot be deleted until the
    /// combat resolves.
    pub async fn delete(&self, kind: CreatureKind, id: CreatureId) -> Result<bool, CreatureError> {
        let _guard = self.locks.lock_creatures(&[id]).await;
        let Some(creature) = self.creatures.get(id).await? else {
            tracing::warn!(creature_id = %id, kind = %kind, "Delete of missing creature");
            return Ok(false);
        };
        if creature.kind != kind {
            return Err(CreatureError::Validation(format!(
                "Could not delete {} because {} is a {}",
                kind, id, creature.kind
            )));
        }

        match self.creatures.delete(id).await {
            Ok(()) => {}
            Err(RepoError::Conflict(_)) => return Err(CreatureError::InCombat(id)),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(creature_id = %id, kind = %kind, "Creature deleted");
        Ok(true)
    }
}
