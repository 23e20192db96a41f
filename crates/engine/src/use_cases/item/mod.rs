//! Item catalog use cases.

use std::sync::Arc;

use delver_domain::{CatalogItem, NewItem};

use crate::infrastructure::ports::{ItemRepo, RepoError};

/// Container for item catalog use cases.
pub struct ItemUseCases {
    pub catalog: Arc<ItemCatalog>,
}

impl ItemUseCases {
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self { catalog }
    }
}

/// Adds entries to the shared equipment, consumable and currency catalog.
pub struct ItemCatalog {
    items: Arc<dyn ItemRepo>,
}

impl ItemCatalog {
    pub fn new(items: Arc<dyn ItemRepo>) -> Self {
        Self { items }
    }

    pub async fn create(&self, item: NewItem) -> Result<CatalogItem, RepoError> {
        let created = self.items.create(&item).await?;
        tracing::info!(item_id = created.raw_id(), "Catalog item created");
        Ok(created)
    }
}
