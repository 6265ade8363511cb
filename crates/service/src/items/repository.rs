use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Item, ItemChanges, ItemCreate, ItemsPage};
use crate::errors::ServiceError;
use crate::pagination::PageWindow;

/// Storage capability for items. Absence is reported as data (`None`/`false`),
/// never as an error; `Err` means the store itself failed.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn fetch(&self, id: Uuid) -> Result<Option<Item>, ServiceError>;
    /// Persist a new item with a fresh id. `owner_id` is written once and never changed.
    async fn create(&self, owner_id: &str, fields: ItemCreate) -> Result<Item, ServiceError>;
    /// Merge `changes` into the item; `None` when the id does not exist. An empty change
    /// set writes nothing.
    async fn apply_update(&self, id: Uuid, changes: ItemChanges) -> Result<Option<Item>, ServiceError>;
    /// `false` when there was nothing to delete.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Items ordered by `(created_at, id)`; `owner` restricts both the page and the count.
    async fn list(&self, owner: Option<&str>, window: PageWindow) -> Result<ItemsPage, ServiceError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    use crate::pagination::Page;

    #[derive(Default)]
    pub struct MockItemStore {
        items: Mutex<Vec<Item>>, // insertion order == (created_at, id) order
    }

    impl MockItemStore {
        fn items(&self) -> Result<MutexGuard<'_, Vec<Item>>, ServiceError> {
            self.items.lock().map_err(|_| ServiceError::Db("item store lock poisoned".into()))
        }

        /// Number of stored items regardless of owner.
        pub fn len(&self) -> usize {
            self.items.lock().map(|v| v.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    #[async_trait]
    impl ItemStore for MockItemStore {
        async fn fetch(&self, id: Uuid) -> Result<Option<Item>, ServiceError> {
            Ok(self.items()?.iter().find(|i| i.id == id).cloned())
        }

        async fn create(&self, owner_id: &str, fields: ItemCreate) -> Result<Item, ServiceError> {
            models::item::validate_owner_id(owner_id)?;
            let now = Utc::now();
            let item = Item {
                id: Uuid::new_v4(),
                owner_id: owner_id.to_string(),
                title: fields.title,
                description: fields.description,
                created_at: now,
                updated_at: now,
            };
            self.items()?.push(item.clone());
            Ok(item)
        }

        async fn apply_update(&self, id: Uuid, changes: ItemChanges) -> Result<Option<Item>, ServiceError> {
            let mut items = self.items()?;
            let Some(item) = items.iter_mut().find(|i| i.id == id) else { return Ok(None) };
            if changes.apply_to(item) {
                item.updated_at = Utc::now();
            }
            Ok(Some(item.clone()))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let mut items = self.items()?;
            let before = items.len();
            items.retain(|i| i.id != id);
            Ok(items.len() < before)
        }

        async fn list(&self, owner: Option<&str>, window: PageWindow) -> Result<ItemsPage, ServiceError> {
            let items = self.items()?;
            let visible: Vec<&Item> = items.iter().filter(|i| owner.map_or(true, |o| i.owner_id == o)).collect();
            let count = visible.len() as u64;
            let data = visible
                .into_iter()
                .skip(usize::try_from(window.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(Page { data, count })
        }
    }
}
