//! Create invite table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invite::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invite::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Invite::ContestId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Invite::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Invite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Invite::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Invite::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invite_contest")
                            .from(Invite::Table, Invite::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One live invite per (email, contest); consumed invites keep their tombstone
        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_invite_email_contest_live
                ON invite (email, contest_id)
                WHERE deleted_at IS NULL;
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invite::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Invite {
    Table,
    Id,
    Email,
    ContestId,
    Status,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum Contest {
    Table,
    Id,
}
