use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_item::Item;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Scoped listing filters on owner_id
        manager
            .create_index(
                Index::create()
                    .name("idx_item_owner")
                    .if_not_exists()
                    .table(Item::Table)
                    .col(Item::OwnerId)
                    .to_owned(),
            )
            .await?;

        // List order: (created_at, id)
        manager
            .create_index(
                Index::create()
                    .name("idx_item_created_id")
                    .if_not_exists()
                    .table(Item::Table)
                    .col(Item::CreatedAt)
                    .col(Item::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_item_created_id").table(Item::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_item_owner").table(Item::Table).to_owned())
            .await
    }
}
