//! Ledger repository.
//!
//! Ledger entries are written once and never updated. Appending an entry
//! and bumping the matching tally row happen in one transaction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use voteboard_common::{AppError, AppResult};

use super::contest::ensure_live;
use crate::entities::{LedgerEntry, Tally, ledger_entry, tally};

/// A vote purchase to be appended.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub id: String,
    pub contest_id: String,
    pub contestant_id: String,
    /// Purchaser's display name.
    pub name: String,
    /// Votes bought; added to the tally row.
    pub vote: i32,
    /// Amount paid.
    pub payment: f64,
}

/// Per-contest sums over the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContestTotals {
    /// Sum of purchased votes.
    pub votes: i64,
    /// Sum of payments.
    pub revenue: f64,
}

/// Ledger repository for database operations.
#[derive(Clone)]
pub struct LedgerRepository {
    db: Arc<DatabaseConnection>,
}

impl LedgerRepository {
    /// Create a new ledger repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append a ledger entry and add its votes to the pair's tally row.
    ///
    /// Fails with `NotFound` when the contest is gone or the contestant has no
    /// live tally row in it. Nothing is written in that case.
    pub async fn append(
        &self,
        entry: NewLedgerEntry,
        now: DateTime<Utc>,
    ) -> AppResult<(ledger_entry::Model, tally::Model)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Dropping `txn` on an early return rolls it back.
        ensure_live(&txn, &entry.contest_id).await?;

        let row = Tally::find()
            .filter(tally::Column::ContestId.eq(entry.contest_id.as_str()))
            .filter(tally::Column::ContestantId.eq(entry.contestant_id.as_str()))
            .filter(tally::Column::DeletedAt.is_null())
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Contestant not found in the contest.".to_string()))?;

        let model = ledger_entry::ActiveModel {
            id: Set(entry.id),
            contest_id: Set(entry.contest_id),
            contestant_id: Set(entry.contestant_id),
            name: Set(entry.name),
            vote: Set(entry.vote),
            payment: Set(entry.payment),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };
        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Tally::update_many()
            .col_expr(
                tally::Column::Vote,
                Expr::col(tally::Column::Vote).add(i64::from(inserted.vote)),
            )
            .col_expr(tally::Column::UpdatedAt, Expr::value(now))
            .filter(tally::Column::Id.eq(row.id.as_str()))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let updated = Tally::find_by_id(row.id.as_str())
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Internal("Tally row vanished during append".to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((inserted, updated))
    }

    /// Live ledger entries for a (contest, contestant) pair, oldest first.
    pub async fn find_by_pair(
        &self,
        contest_id: &str,
        contestant_id: &str,
    ) -> AppResult<Vec<ledger_entry::Model>> {
        LedgerEntry::find()
            .filter(ledger_entry::Column::ContestId.eq(contest_id))
            .filter(ledger_entry::Column::ContestantId.eq(contestant_id))
            .filter(ledger_entry::Column::DeletedAt.is_null())
            .order_by_asc(ledger_entry::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Vote and revenue sums per contest.
    ///
    /// Contests without ledger entries are absent from the map.
    pub async fn totals_by_contests(
        &self,
        contest_ids: &[String],
    ) -> AppResult<HashMap<String, ContestTotals>> {
        if contest_ids.is_empty() {
            return Ok(HashMap::new());
        }

        #[derive(FromQueryResult)]
        struct TotalsRow {
            contest_id: String,
            votes: Option<i64>,
            revenue: Option<f64>,
        }

        let rows = LedgerEntry::find()
            .select_only()
            .column(ledger_entry::Column::ContestId)
            .column_as(ledger_entry::Column::Vote.sum(), "votes")
            .column_as(ledger_entry::Column::Payment.sum(), "revenue")
            .filter(ledger_entry::Column::ContestId.is_in(contest_ids.to_vec()))
            .filter(ledger_entry::Column::DeletedAt.is_null())
            .group_by(ledger_entry::Column::ContestId)
            .into_model::<TotalsRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.contest_id,
                    ContestTotals {
                        votes: r.votes.unwrap_or(0),
                        revenue: r.revenue.unwrap_or(0.0),
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::contest::{self, ContestStatus};
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};

    fn create_test_contest() -> contest::Model {
        let now = Utc::now();
        contest::Model {
            id: "c1".to_string(),
            name: "Spring Cup".to_string(),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(6),
            status: ContestStatus::Active,
            no_votes: 0,
            revenue: 0.0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn create_test_tally(vote: i64) -> tally::Model {
        tally::Model {
            id: "t1".to_string(),
            contestant_id: "u1".to_string(),
            contest_id: "c1".to_string(),
            vote,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn create_test_entry(vote: i32) -> ledger_entry::Model {
        ledger_entry::Model {
            id: "l1".to_string(),
            contest_id: "c1".to_string(),
            contestant_id: "u1".to_string(),
            name: "Ada".to_string(),
            vote,
            payment: 5.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn new_entry(vote: i32) -> NewLedgerEntry {
        NewLedgerEntry {
            id: "l1".to_string(),
            contest_id: "c1".to_string(),
            contestant_id: "u1".to_string(),
            name: "Ada".to_string(),
            vote,
            payment: 5.0,
        }
    }

    #[tokio::test]
    async fn test_append_increments_tally() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // live contest check
                .append_query_results([[create_test_contest()]])
                // tally lookup
                .append_query_results([[create_test_tally(0)]])
                // ledger insert (RETURNING)
                .append_query_results([[create_test_entry(10)]])
                // re-read after increment
                .append_query_results([[create_test_tally(10)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = LedgerRepository::new(db);
        let (entry, tally) = repo.append(new_entry(10), Utc::now()).await.unwrap();

        assert_eq!(entry.vote, 10);
        assert_eq!(tally.vote, 10);
    }

    #[tokio::test]
    async fn test_append_without_tally_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_contest()]])
                .append_query_results([Vec::<tally::Model>::new()])
                .into_connection(),
        );

        let repo = LedgerRepository::new(db);
        let result = repo.append(new_entry(10), Utc::now()).await;

        // No insert result was queued; reaching the insert would be a Database error.
        assert!(
            matches!(result, Err(AppError::NotFound(msg)) if msg == "Contestant not found in the contest.")
        );
    }

    #[tokio::test]
    async fn test_append_to_deleted_contest_is_not_found() {
        // The tally row is still live, but the contest lookup comes back empty.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest::Model>::new()])
                .append_query_results([[create_test_tally(0)]])
                .into_connection(),
        );

        let repo = LedgerRepository::new(db);
        let result = repo.append(new_entry(10), Utc::now()).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Contest not found."));
    }

    #[tokio::test]
    async fn test_totals_by_contests() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "contest_id" => Value::from("c1"),
                    "votes" => Value::BigInt(Some(30)),
                    "revenue" => Value::Double(Some(12.5)),
                }]])
                .into_connection(),
        );

        let repo = LedgerRepository::new(db);
        let totals = repo
            .totals_by_contests(&["c1".to_string(), "c2".to_string()])
            .await
            .unwrap();

        assert_eq!(
            totals.get("c1"),
            Some(&ContestTotals {
                votes: 30,
                revenue: 12.5
            })
        );
        assert!(!totals.contains_key("c2"));
    }

    #[tokio::test]
    async fn test_find_by_pair() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_entry(10), create_test_entry(5)]])
                .into_connection(),
        );

        let repo = LedgerRepository::new(db);
        let entries = repo.find_by_pair("c1", "u1").await.unwrap();

        assert_eq!(entries.len(), 2);
    }
}
