//! Tally repository.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use voteboard_common::{AppError, AppResult};

use super::insert_error;
use crate::entities::{Tally, tally};

/// Tally repository for database operations.
///
/// Leaderboard queries return rows ordered by `vote DESC, id ASC`, so ties
/// keep insertion order.
#[derive(Clone)]
pub struct TallyRepository {
    db: Arc<DatabaseConnection>,
}

impl TallyRepository {
    /// Create a new tally repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Live tally rows for a contest, highest vote first.
    pub async fn find_by_contest(&self, contest_id: &str) -> AppResult<Vec<tally::Model>> {
        Tally::find()
            .filter(tally::Column::ContestId.eq(contest_id))
            .filter(tally::Column::DeletedAt.is_null())
            .order_by_desc(tally::Column::Vote)
            .order_by_asc(tally::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Live tally rows for several contests, highest vote first.
    pub async fn find_by_contests(&self, contest_ids: &[String]) -> AppResult<Vec<tally::Model>> {
        if contest_ids.is_empty() {
            return Ok(vec![]);
        }

        Tally::find()
            .filter(tally::Column::ContestId.is_in(contest_ids.to_vec()))
            .filter(tally::Column::DeletedAt.is_null())
            .order_by_desc(tally::Column::Vote)
            .order_by_asc(tally::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Live tally rows of one contestant across contests.
    pub async fn find_by_contestant(&self, contestant_id: &str) -> AppResult<Vec<tally::Model>> {
        Tally::find()
            .filter(tally::Column::ContestantId.eq(contestant_id))
            .filter(tally::Column::DeletedAt.is_null())
            .order_by_asc(tally::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Live tally row for a (contest, contestant) pair.
    pub async fn find_pair(
        &self,
        contest_id: &str,
        contestant_id: &str,
    ) -> AppResult<Option<tally::Model>> {
        Tally::find()
            .filter(tally::Column::ContestId.eq(contest_id))
            .filter(tally::Column::ContestantId.eq(contestant_id))
            .filter(tally::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of live tally rows per contest.
    pub async fn count_by_contests(&self, contest_ids: &[String]) -> AppResult<HashMap<String, u64>> {
        if contest_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(FromQueryResult)]
        struct CountRow {
            contest_id: String,
            total: i64,
        }

        let rows = Tally::find()
            .select_only()
            .column(tally::Column::ContestId)
            .column_as(tally::Column::Id.count(), "total")
            .filter(tally::Column::ContestId.is_in(contest_ids.to_vec()))
            .filter(tally::Column::DeletedAt.is_null())
            .group_by(tally::Column::ContestId)
            .into_model::<CountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| (r.contest_id, r.total.max(0) as u64))
            .collect())
    }

    /// Create a new tally row.
    ///
    /// A second live row for the same pair is a `Conflict`.
    pub async fn create(&self, model: tally::ActiveModel) -> AppResult<tally::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| insert_error(e, "Contestant is already added to the contest."))
    }

    /// Tombstone a tally row. Returns the number of rows affected.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<u64> {
        let result = Tally::update_many()
            .col_expr(tally::Column::DeletedAt, Expr::value(now))
            .col_expr(tally::Column::UpdatedAt, Expr::value(now))
            .filter(tally::Column::Id.eq(id))
            .filter(tally::Column::DeletedAt.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
