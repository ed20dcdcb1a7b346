//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_admin_table;
mod m20250101_000002_create_contest_table;
mod m20250101_000003_create_contestant_table;
mod m20250101_000004_create_invite_table;
mod m20250101_000005_create_tally_table;
mod m20250101_000006_create_ledger_entry_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_admin_table::Migration),
            Box::new(m20250101_000002_create_contest_table::Migration),
            Box::new(m20250101_000003_create_contestant_table::Migration),
            Box::new(m20250101_000004_create_invite_table::Migration),
            Box::new(m20250101_000005_create_tally_table::Migration),
            Box::new(m20250101_000006_create_ledger_entry_table::Migration),
        ]
    }
}
