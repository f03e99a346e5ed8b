//! Create `users` table.
//!
//! Holds login credentials plus the shared audit and soft-delete columns.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::UserId))
                    .col(string_len(Users::Username, 50).unique_key())
                    .col(string_len(Users::PasswordHash, 255))
                    .col(string_len_null(Users::Email, 100).unique_key())
                    .col(string_len(Users::Role, 16).default("user"))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(string_len_null(Users::CreatedBy, 50))
                    .col(string_len_null(Users::UpdatedBy, 50))
                    .col(boolean(Users::IsDeleted).default(false))
                    .col(boolean(Users::IsActive).default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    UserId,
    Username,
    PasswordHash,
    Email,
    Role,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
    IsDeleted,
    IsActive,
}
