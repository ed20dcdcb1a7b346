//! Create contestant table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contestant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contestant::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contestant::Email)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Contestant::PasswordHash)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contestant::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Contestant::Kind)
                            .string_len(32)
                            .not_null()
                            .default("email"),
                    )
                    .col(ColumnDef::new(Contestant::Dp).string_len(512))
                    .col(
                        ColumnDef::new(Contestant::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Contestant::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Contestant::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contestant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contestant {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Kind,
    Dp,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
