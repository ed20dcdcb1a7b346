//! Contest repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};
use voteboard_common::{AppError, AppResult};

use crate::entities::{
    Contest,
    contest::{self, ContestStatus},
};

/// Fail with `NotFound` unless the contest exists and is not tombstoned.
///
/// Takes any connection so writers can check inside their own transaction.
pub(crate) async fn ensure_live<C: ConnectionTrait>(
    conn: &C,
    contest_id: &str,
) -> AppResult<()> {
    Contest::find_by_id(contest_id)
        .filter(contest::Column::DeletedAt.is_null())
        .one(conn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound("Contest not found.".to_string()))
}

/// Contest repository for database operations.
///
/// Every lookup skips tombstoned contests.
#[derive(Clone)]
pub struct ContestRepository {
    db: Arc<DatabaseConnection>,
}

impl ContestRepository {
    /// Create a new contest repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live contest by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<contest::Model>> {
        Contest::find_by_id(id)
            .filter(contest::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a live contest by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<contest::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found.".to_string()))
    }

    /// Find live contests by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<contest::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Contest::find()
            .filter(contest::Column::Id.is_in(ids.to_vec()))
            .filter(contest::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All live contests, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<contest::Model>> {
        Contest::find()
            .filter(contest::Column::DeletedAt.is_null())
            .order_by_desc(contest::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Contests open for voting at `now`: stored active and `start_date <= now < end_date`.
    pub async fn find_open(&self, now: DateTime<Utc>) -> AppResult<Vec<contest::Model>> {
        Contest::find()
            .filter(contest::Column::DeletedAt.is_null())
            .filter(contest::Column::Status.eq(ContestStatus::Active))
            .filter(contest::Column::StartDate.lte(now))
            .filter(contest::Column::EndDate.gt(now))
            .order_by_asc(contest::Column::EndDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Contests that are finished at `now`: stored complete, or stored
    /// active with an end date already behind us. Latest end date first.
    pub async fn find_finished(&self, now: DateTime<Utc>) -> AppResult<Vec<contest::Model>> {
        Contest::find()
            .filter(contest::Column::DeletedAt.is_null())
            .filter(
                Condition::any()
                    .add(contest::Column::Status.eq(ContestStatus::Complete))
                    .add(
                        Condition::all()
                            .add(contest::Column::Status.eq(ContestStatus::Active))
                            .add(contest::Column::EndDate.lt(now)),
                    ),
            )
            .order_by_desc(contest::Column::EndDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new contest.
    pub async fn create(&self, model: contest::ActiveModel) -> AppResult<contest::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a contest.
    pub async fn update(&self, model: contest::ActiveModel) -> AppResult<contest::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Tombstone a contest. Returns the number of rows affected.
    pub async fn soft_delete(&self, id: &str, now: DateTime<Utc>) -> AppResult<u64> {
        let result = Contest::update_many()
            .col_expr(contest::Column::DeletedAt, Expr::value(now))
            .col_expr(contest::Column::UpdatedAt, Expr::value(now))
            .filter(contest::Column::Id.eq(id))
            .filter(contest::Column::DeletedAt.is_null())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_contest(id: &str, status: ContestStatus) -> contest::Model {
        let now = Utc::now();
        contest::Model {
            id: id.to_string(),
            name: format!("Contest {id}"),
            start_date: now - Duration::days(3),
            end_date: now + Duration::days(3),
            status,
            no_votes: 0,
            revenue: 0.0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let contest = create_test_contest("c1", ContestStatus::Active);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest.clone()]])
                .into_connection(),
        );

        let repo = ContestRepository::new(db);
        let result = repo.get_by_id("c1").await.unwrap();

        assert_eq!(result, contest);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest::Model>::new()])
                .into_connection(),
        );

        let repo = ContestRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_ids_empty_skips_query() {
        // No query results queued: any query would fail.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ContestRepository::new(db);
        let result = repo.find_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_find_finished_returns_rows() {
        let complete = create_test_contest("c1", ContestStatus::Complete);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[complete]])
                .into_connection(),
        );

        let repo = ContestRepository::new(db);
        let result = repo.find_finished(Utc::now()).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, ContestStatus::Complete);
    }

    #[tokio::test]
    async fn test_soft_delete_reports_rows_affected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ContestRepository::new(db);
        let affected = repo.soft_delete("c1", Utc::now()).await.unwrap();

        assert_eq!(affected, 1);
    }
}
