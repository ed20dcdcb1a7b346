//! Create tally table (per-contest vote totals).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tally::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tally::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tally::ContestantId).string_len(32).not_null())
                    .col(ColumnDef::new(Tally::ContestId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Tally::Vote)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tally::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tally::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Tally::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tally_contestant")
                            .from(Tally::Table, Tally::ContestantId)
                            .to(Contestant::Table, Contestant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tally_contest")
                            .from(Tally::Table, Tally::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (contest_id, vote DESC) for leaderboards
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE INDEX IF NOT EXISTS idx_tally_contest_vote
                ON tally (contest_id, vote DESC)
                WHERE deleted_at IS NULL;
                ",
            )
            .await?;

        // One live tally row per (contestant, contest)
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_tally_contestant_contest_live
                ON tally (contestant_id, contest_id)
                WHERE deleted_at IS NULL;
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tally::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tally {
    Table,
    Id,
    ContestantId,
    ContestId,
    Vote,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Contestant {
    Table,
    Id,
}

#[derive(Iden)]
enum Contest {
    Table,
    Id,
}
