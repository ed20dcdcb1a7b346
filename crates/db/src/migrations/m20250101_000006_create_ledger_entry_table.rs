//! Create `ledger_entry` table (vote purchases).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntry::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntry::ContestId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntry::ContestantId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntry::Name).string_len(256).not_null())
                    .col(ColumnDef::new(LedgerEntry::Vote).integer().not_null())
                    .col(ColumnDef::new(LedgerEntry::Payment).double().not_null())
                    .col(
                        ColumnDef::new(LedgerEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LedgerEntry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(LedgerEntry::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entry_contest")
                            .from(LedgerEntry::Table, LedgerEntry::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entry_contestant")
                            .from(LedgerEntry::Table, LedgerEntry::ContestantId)
                            .to(Contestant::Table, Contestant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (contest_id, contestant_id) for per-pair history and sums
        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entry_contest_contestant")
                    .table(LedgerEntry::Table)
                    .col(LedgerEntry::ContestId)
                    .col(LedgerEntry::ContestantId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entry_created_at")
                    .table(LedgerEntry::Table)
                    .col(LedgerEntry::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LedgerEntry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LedgerEntry {
    Table,
    Id,
    ContestId,
    ContestantId,
    Name,
    Vote,
    Payment,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Contest {
    Table,
    Id,
}

#[derive(Iden)]
enum Contestant {
    Table,
    Id,
}
