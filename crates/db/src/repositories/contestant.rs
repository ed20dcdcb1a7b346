//! Contestant repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait, sea_query::Expr,
};
use voteboard_common::{AppError, AppResult};

use super::{contest::ensure_live, insert_error};
use crate::entities::{
    Contestant, Invite, contestant,
    invite::{self, InviteStatus},
    tally,
};

/// Contestant repository for database operations.
#[derive(Clone)]
pub struct ContestantRepository {
    db: Arc<DatabaseConnection>,
}

impl ContestantRepository {
    /// Create a new contestant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live contestant by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contestant::Model>> {
        Contestant::find_by_id(id)
            .filter(contestant::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a live contestant by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<contestant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contestant not found.".to_string()))
    }

    /// Find a live contestant by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<contestant::Model>> {
        Contestant::find()
            .filter(contestant::Column::Email.eq(email))
            .filter(contestant::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find live contestants by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<contestant::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Contestant::find()
            .filter(contestant::Column::Id.is_in(ids.to_vec()))
            .filter(contestant::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Register a contestant from an invite.
    ///
    /// Inserts the contestant and its tally row for the invite's contest, then
    /// marks the invite accepted and tombstones it. All three writes commit
    /// together or not at all. An invite whose contest was deleted fails with
    /// `NotFound`.
    pub async fn register_from_invite(
        &self,
        model: contestant::ActiveModel,
        tally_id: String,
        invite: &invite::Model,
        now: DateTime<Utc>,
    ) -> AppResult<(contestant::Model, tally::Model)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        ensure_live(&txn, &invite.contest_id).await?;

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| insert_error(e, "An account with this email already exists."))?;

        let row = tally::ActiveModel {
            id: Set(tally_id),
            contestant_id: Set(created.id.clone()),
            contest_id: Set(invite.contest_id.clone()),
            vote: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| insert_error(e, "Contestant is already added to the contest."))?;

        Invite::update_many()
            .col_expr(invite::Column::Status, Expr::value(InviteStatus::Accepted))
            .col_expr(invite::Column::DeletedAt, Expr::value(now))
            .col_expr(invite::Column::UpdatedAt, Expr::value(now))
            .filter(invite::Column::Id.eq(invite.id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((created, row))
    }
}
