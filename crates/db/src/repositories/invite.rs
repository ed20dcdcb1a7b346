//! Invite repository.

use std::sync::Arc;

use super::insert_error;
use crate::entities::{Invite, invite};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use voteboard_common::{AppError, AppResult};

/// Invite repository for database operations.
#[derive(Clone)]
pub struct InviteRepository {
    db: Arc<DatabaseConnection>,
}

impl InviteRepository {
    /// Create a new invite repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Oldest live invite for an email, whichever contest it is for.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<invite::Model>> {
        Invite::find()
            .filter(invite::Column::Email.eq(email))
            .filter(invite::Column::DeletedAt.is_null())
            .order_by_asc(invite::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Live invite for an email in one contest.
    pub async fn find_by_email_and_contest(
        &self,
        email: &str,
        contest_id: &str,
    ) -> AppResult<Option<invite::Model>> {
        Invite::find()
            .filter(invite::Column::Email.eq(email))
            .filter(invite::Column::ContestId.eq(contest_id))
            .filter(invite::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new invite.
    ///
    /// A second live invite for the same email and contest is a `Conflict`.
    pub async fn create(&self, model: invite::ActiveModel) -> AppResult<invite::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_error(e, "Email is already invited to this contest."))
    }
}
