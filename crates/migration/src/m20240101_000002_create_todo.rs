//! Create `todo` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Todo::Table)
                    .if_not_exists()
                    .col(pk_auto(Todo::TodoId))
                    .col(string(Todo::Name))
                    .col(string(Todo::Description))
                    .col(boolean(Todo::Complete).default(false))
                    .col(timestamp_with_time_zone(Todo::Deadline))
                    .col(timestamp_with_time_zone(Todo::CreatedAt))
                    .col(
                        ColumnDef::new(Todo::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(string_len_null(Todo::CreatedBy, 50))
                    .col(string_len_null(Todo::UpdatedBy, 50))
                    .col(boolean(Todo::IsDeleted).default(false))
                    .col(boolean(Todo::IsActive).default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Todo::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Todo {
    Table,
    TodoId,
    Name,
    Description,
    Complete,
    Deadline,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
    IsDeleted,
    IsActive,
}
