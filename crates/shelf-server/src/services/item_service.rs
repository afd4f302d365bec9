//! Item service
//!
//! Owns the one validation rule (a name is required) and maps store misses
//! to `NotFound`. Holds no state of its own; every call reads or writes
//! through the backend.

use crate::storage::ItemStore;
use shelf_types::Item;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("item {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Item>, ItemError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Item, ItemError> {
        self.store.get(id).await?.ok_or(ItemError::NotFound(id))
    }

    /// Creates an item. Validation runs before the store is touched, so a
    /// rejected create never consumes an id.
    pub async fn create(&self, name: &str, description: &str) -> Result<Item, ItemError> {
        validate_name(name)?;

        let item = self.store.insert(name, description).await?;
        info!("Item created with id {}", item.id);
        Ok(item)
    }

    /// Overwrites `name` and `description` in place; the id never changes.
    ///
    /// A description omitted on the wire arrives here as `""` and clears
    /// the stored field.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        description: &str,
    ) -> Result<Item, ItemError> {
        validate_name(name)?;

        if !self.store.update(id, name, description).await? {
            return Err(ItemError::NotFound(id));
        }

        info!("Item with id {} updated", id);
        Ok(Item {
            id,
            name: name.to_string(),
            description: description.to_string(),
        })
    }

    pub async fn delete(&self, id: i64) -> Result<(), ItemError> {
        if !self.store.delete(id).await? {
            return Err(ItemError::NotFound(id));
        }

        info!("Item with id {} deleted", id);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ItemError> {
    if name.trim().is_empty() {
        return Err(ItemError::EmptyName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    async fn service() -> ItemService {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        ItemService::new(store)
    }

    #[tokio::test]
    async fn rejected_create_consumes_no_id() {
        let service = service().await;

        assert!(matches!(
            service.create("", "text").await,
            Err(ItemError::EmptyName)
        ));
        assert!(matches!(
            service.create("   ", "text").await,
            Err(ItemError::EmptyName)
        ));

        // The first accepted create still gets id 1.
        let item = service.create("a", "b").await.unwrap();
        assert_eq!(item.id, 1);
        assert!(service.list().await.unwrap().len() == 1);
    }

    #[tokio::test]
    async fn get_on_never_created_id_is_not_found() {
        let service = service().await;

        assert!(matches!(service.get(1).await, Err(ItemError::NotFound(1))));
    }

    #[tokio::test]
    async fn update_rejects_empty_name_before_touching_the_store() {
        let service = service().await;
        let item = service.create("a", "b").await.unwrap();

        assert!(matches!(
            service.update(item.id, "", "x").await,
            Err(ItemError::EmptyName)
        ));

        // Untouched.
        let fetched = service.get(item.id).await.unwrap();
        assert_eq!(fetched, item);
    }

    #[tokio::test]
    async fn update_and_delete_on_missing_ids_are_not_found() {
        let service = service().await;

        assert!(matches!(
            service.update(7, "n", "d").await,
            Err(ItemError::NotFound(7))
        ));
        assert!(matches!(service.delete(7).await, Err(ItemError::NotFound(7))));
    }

    #[tokio::test]
    async fn concurrent_creates_allocate_distinct_ids() {
        let service = Arc::new(service().await);

        let mut handles = Vec::new();
        for i in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create(&format!("item-{i}"), "").await.unwrap().id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn full_lifecycle_scenario() {
        let service = service().await;

        let first = service.create("a", "b").await.unwrap();
        assert_eq!(
            first,
            Item {
                id: 1,
                name: "a".to_string(),
                description: "b".to_string()
            }
        );

        let second = service.create("second", "").await.unwrap();
        assert_eq!(second.id, 2);

        // Name-only update clears the description.
        service.update(first.id, "c", "").await.unwrap();
        assert_eq!(
            service.get(first.id).await.unwrap(),
            Item {
                id: 1,
                name: "c".to_string(),
                description: String::new()
            }
        );

        service.delete(second.id).await.unwrap();
        assert!(matches!(
            service.get(second.id).await,
            Err(ItemError::NotFound(2))
        ));
        let remaining = service.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, first.id);
    }
}
