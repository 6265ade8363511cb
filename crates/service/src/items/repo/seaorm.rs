use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use models::item;

use crate::errors::ServiceError;
use crate::items::domain::{Item, ItemChanges, ItemCreate, ItemsPage, Patch};
use crate::items::repository::ItemStore;
use crate::pagination::{Page, PageWindow};

/// SeaORM-backed store. Each call borrows a pooled connection, or opens a
/// transaction, for its own duration only; a dropped transaction rolls back.
pub struct SeaOrmItemStore {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ItemStore for SeaOrmItemStore {
    async fn fetch(&self, id: Uuid) -> Result<Option<Item>, ServiceError> {
        let found = item::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Item::from))
    }

    async fn create(&self, owner_id: &str, fields: ItemCreate) -> Result<Item, ServiceError> {
        let created = item::create(&self.db, owner_id, &fields.title, fields.description.as_deref()).await?;
        Ok(created.into())
    }

    async fn apply_update(&self, id: Uuid, changes: ItemChanges) -> Result<Option<Item>, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(existing) = item::Entity::find_by_id(id).lock_exclusive().one(&txn).await? else {
            return Ok(None);
        };
        if changes.is_empty() {
            return Ok(Some(existing.into()));
        }

        let mut am: item::ActiveModel = existing.into();
        if let Some(t) = changes.title { am.title = Set(t); }
        match changes.description {
            Patch::Absent => {}
            Patch::Null => am.description = Set(None),
            Patch::Value(d) => am.description = Set(Some(d)),
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&txn).await?;
        txn.commit().await?;
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = item::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self, owner: Option<&str>, window: PageWindow) -> Result<ItemsPage, ServiceError> {
        // count and page must see the same snapshot
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::RepeatableRead), Some(AccessMode::ReadOnly))
            .await?;

        let mut finder = item::Entity::find();
        if let Some(o) = owner { finder = finder.filter(item::Column::OwnerId.eq(o)); }

        let count = finder.clone().count(&txn).await?;
        let rows = finder
            .order_by_asc(item::Column::CreatedAt)
            .order_by_asc(item::Column::Id)
            .offset(window.offset)
            .limit(window.limit)
            .all(&txn)
            .await?;
        txn.commit().await?;

        Ok(Page { data: rows.into_iter().map(Item::from).collect(), count })
    }
}
