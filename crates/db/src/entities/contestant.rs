//! Contestant entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered contestant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contestant")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 hash; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub name: String,

    /// Contestant type (exposed as `type`), e.g. "email".
    pub kind: String,

    /// Display image reference.
    #[sea_orm(nullable)]
    pub dp: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tally::Entity")]
    Tally,

    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntry,
}

impl Related<super::tally::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tally.def()
    }
}

impl Related<super::ledger_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
