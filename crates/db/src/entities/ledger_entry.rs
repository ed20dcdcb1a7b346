//! Ledger entry entity: one immutable paid vote purchase.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub contest_id: String,

    #[sea_orm(indexed)]
    pub contestant_id: String,

    /// Name supplied by the purchaser.
    pub name: String,

    /// Number of votes bought.
    pub vote: i32,

    /// Amount paid.
    pub payment: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contest::Entity",
        from = "Column::ContestId",
        to = "super::contest::Column::Id",
        on_delete = "Cascade"
    )]
    Contest,

    #[sea_orm(
        belongs_to = "super::contestant::Entity",
        from = "Column::ContestantId",
        to = "super::contestant::Column::Id",
        on_delete = "Cascade"
    )]
    Contestant,
}

impl Related<super::contest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contest.def()
    }
}

impl Related<super::contestant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contestant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
