//! Contest entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored contest status.
///
/// The status seen by clients is derived at read time from this value and
/// the end date; only `Complete` is ever written by the lifecycle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    /// Open for votes.
    #[sea_orm(string_value = "active")]
    Active,
    /// Closed because its end date passed.
    #[sea_orm(string_value = "expired")]
    Expired,
    /// Explicitly closed by an administrator. Terminal.
    #[sea_orm(string_value = "complete")]
    Complete,
}

impl ContestStatus {
    /// Whether a stored status may move to `next`.
    ///
    /// Statuses only move forward: `active -> expired -> complete`, with
    /// `active -> complete` allowed directly. Keeping the same status is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, _)
                | (Self::Expired, Self::Expired | Self::Complete)
                | (Self::Complete, Self::Complete)
        )
    }

    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Complete => "complete",
        }
    }
}

/// A voting contest.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub start_date: DateTime<Utc>,

    #[sea_orm(indexed)]
    pub end_date: DateTime<Utc>,

    pub status: ContestStatus,

    /// Informational vote counter set by administrators.
    pub no_votes: i64,

    /// Informational revenue figure set by administrators.
    pub revenue: f64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Tombstone for soft deletion.
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tally::Entity")]
    Tally,

    #[sea_orm(has_many = "super::ledger_entry::Entity")]
    LedgerEntry,

    #[sea_orm(has_many = "super::invite::Entity")]
    Invite,
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

impl Related<super::invite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invite.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::ContestStatus;

    #[test]
    fn test_status_moves_forward_only() {
        assert!(ContestStatus::Active.can_transition_to(ContestStatus::Complete));
        assert!(ContestStatus::Active.can_transition_to(ContestStatus::Expired));
        assert!(ContestStatus::Expired.can_transition_to(ContestStatus::Complete));
        assert!(ContestStatus::Complete.can_transition_to(ContestStatus::Complete));

        assert!(!ContestStatus::Complete.can_transition_to(ContestStatus::Active));
        assert!(!ContestStatus::Complete.can_transition_to(ContestStatus::Expired));
        assert!(!ContestStatus::Expired.can_transition_to(ContestStatus::Active));
    }
}
