//! Create contest table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contest::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contest::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Contest::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contest::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contest::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Contest::NoVotes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Contest::Revenue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Contest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Contest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Contest::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: end_date (lapsed/active contest lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_contest_end_date")
                    .table(Contest::Table)
                    .col(Contest::EndDate)
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_contest_status")
                    .table(Contest::Table)
                    .col(Contest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contest::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contest {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    Status,
    NoVotes,
    Revenue,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
