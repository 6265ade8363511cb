//! Create `item` table.
//!
//! `owner_id` holds the token subject of the creator and is never updated.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Item::Table)
                    .if_not_exists()
                    .col(uuid(Item::Id).primary_key())
                    .col(string_len(Item::OwnerId, 255).not_null())
                    .col(string_len(Item::Title, 255).not_null())
                    .col(string_len_null(Item::Description, 255))
                    .col(timestamp_with_time_zone(Item::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Item::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Item::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Item {
    Table,
    Id,
    OwnerId,
    Title,
    Description,
    CreatedAt,
    UpdatedAt,
}
