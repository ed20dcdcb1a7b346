//! Contest service.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voteboard_common::{AppError, AppResult, IdGenerator};
use voteboard_db::{
    entities::contest::{self, ContestStatus},
    repositories::{ContestRepository, LedgerRepository, TallyRepository},
};

use crate::lifecycle::{EffectiveStatus, effective_status};

/// Contest service for business logic.
#[derive(Clone)]
pub struct ContestService {
    contest_repo: ContestRepository,
    tally_repo: TallyRepository,
    ledger_repo: LedgerRepository,
    id_gen: IdGenerator,
}

/// Input for creating a contest.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateContestInput {
    #[validate(length(
        min = 1,
        max = 256,
        message = "Contest name, start date, end date, and status are required."
    ))]
    pub contest_name: String,

    #[validate(required(message = "Contest name, start date, end date, and status are required."))]
    pub start_date: Option<DateTime<Utc>>,

    #[validate(required(message = "Contest name, start date, end date, and status are required."))]
    pub end_date: Option<DateTime<Utc>>,

    #[validate(required(message = "Contest name, start date, end date, and status are required."))]
    pub status: Option<ContestStatus>,

    #[validate(range(min = 0, message = "noVotes must not be negative."))]
    pub no_votes: Option<i64>,

    #[validate(range(min = 0.0, message = "revenue must not be negative."))]
    pub revenue: Option<f64>,
}

/// Input for updating a contest. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateContestInput {
    #[serde(alias = "contestId")]
    #[validate(length(min = 1, message = "Id is required."))]
    pub id: String,

    #[validate(length(min = 1, max = 256, message = "Contest name must not be empty."))]
    pub contest_name: Option<String>,

    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,

    pub status: Option<ContestStatus>,

    #[validate(range(min = 0, message = "noVotes must not be negative."))]
    pub no_votes: Option<i64>,

    #[validate(range(min = 0.0, message = "revenue must not be negative."))]
    pub revenue: Option<f64>,
}

/// A contest addressed by ID.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContestIdInput {
    #[serde(alias = "contestId")]
    #[validate(length(min = 1, message = "Id is required."))]
    pub id: String,
}

/// A contest with its derived status and ledger totals.
#[derive(Debug, Clone)]
pub struct ContestWithTotals {
    pub contest: contest::Model,
    pub status: EffectiveStatus,
    pub total_contestants: u64,
    pub total_votes: i64,
    pub total_revenue: f64,
}

/// Every contest plus totals over the active ones.
#[derive(Debug, Clone)]
pub struct ContestOverview {
    pub contests: Vec<ContestWithTotals>,
    pub total_active_contests: u64,
    pub total_active_contestants: u64,
    pub total_active_votes: i64,
    pub total_active_revenue: f64,
}

impl ContestService {
    /// Create a new contest service.
    #[must_use]
    pub const fn new(
        contest_repo: ContestRepository,
        tally_repo: TallyRepository,
        ledger_repo: LedgerRepository,
    ) -> Self {
        Self {
            contest_repo,
            tally_repo,
            ledger_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a contest.
    pub async fn create(&self, input: CreateContestInput) -> AppResult<contest::Model> {
        input.validate()?;

        let name = input.contest_name.trim();
        let (Some(start_date), Some(end_date), Some(status)) =
            (input.start_date, input.end_date, input.status)
        else {
            return Err(AppError::Validation(
                "Contest name, start date, end date, and status are required.".to_string(),
            ));
        };
        if name.is_empty() {
            return Err(AppError::Validation(
                "Contest name, start date, end date, and status are required.".to_string(),
            ));
        }
        ensure_dates_ordered(start_date, end_date)?;

        let now = Utc::now();
        let model = contest::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            start_date: Set(start_date),
            end_date: Set(end_date),
            status: Set(status),
            no_votes: Set(input.no_votes.unwrap_or(0)),
            revenue: Set(input.revenue.unwrap_or(0.0)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let contest = self.contest_repo.create(model).await?;
        tracing::info!(contest_id = %contest.id, status = contest.status.as_str(), "Created contest");
        Ok(contest)
    }

    /// Update a contest.
    pub async fn update(&self, input: UpdateContestInput) -> AppResult<contest::Model> {
        input.validate()?;

        let existing = self.contest_repo.get_by_id(&input.id).await?;

        if let Some(next) = input.status {
            if !existing.status.can_transition_to(next) {
                return Err(AppError::Conflict(format!(
                    "Cannot change contest status from {} to {}.",
                    existing.status.as_str(),
                    next.as_str()
                )));
            }
        }

        let start_date = input.start_date.unwrap_or(existing.start_date);
        let end_date = input.end_date.unwrap_or(existing.end_date);
        ensure_dates_ordered(start_date, end_date)?;

        let mut active: contest::ActiveModel = existing.into();
        if let Some(name) = input.contest_name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation(
                    "Contest name must not be empty.".to_string(),
                ));
            }
            active.name = Set(name);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(no_votes) = input.no_votes {
            active.no_votes = Set(no_votes);
        }
        if let Some(revenue) = input.revenue {
            active.revenue = Set(revenue);
        }
        active.updated_at = Set(Utc::now());

        let contest = self.contest_repo.update(active).await?;
        tracing::info!(contest_id = %contest.id, status = contest.status.as_str(), "Updated contest");
        Ok(contest)
    }

    /// Mark a contest complete.
    ///
    /// Fails with `Conflict` when it already is; nothing is written then.
    pub async fn complete(&self, input: ContestIdInput) -> AppResult<contest::Model> {
        input.validate()?;

        let existing = self.contest_repo.get_by_id(&input.id).await?;
        if existing.status == ContestStatus::Complete {
            return Err(AppError::Conflict(
                "Contest is already marked as complete.".to_string(),
            ));
        }

        let mut active: contest::ActiveModel = existing.into();
        active.status = Set(ContestStatus::Complete);
        active.updated_at = Set(Utc::now());

        let contest = self.contest_repo.update(active).await?;
        tracing::info!(contest_id = %contest.id, "Completed contest");
        Ok(contest)
    }

    /// Tombstone a contest.
    pub async fn delete(&self, input: ContestIdInput) -> AppResult<()> {
        input.validate()?;

        let affected = self.contest_repo.soft_delete(&input.id, Utc::now()).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Contest not found.".to_string()));
        }

        tracing::info!(contest_id = %input.id, "Deleted contest");
        Ok(())
    }

    /// Every live contest with totals, newest first.
    pub async fn list(&self) -> AppResult<ContestOverview> {
        let contests = self.contest_repo.find_all().await?;
        let contests = self.with_totals(contests, Utc::now()).await?;

        let active = contests.iter().filter(|c| c.status.is_active());
        let mut overview = ContestOverview {
            contests: Vec::new(),
            total_active_contests: 0,
            total_active_contestants: 0,
            total_active_votes: 0,
            total_active_revenue: 0.0,
        };
        for c in active {
            overview.total_active_contests += 1;
            overview.total_active_contestants += c.total_contestants;
            overview.total_active_votes += c.total_votes;
            overview.total_active_revenue += c.total_revenue;
        }
        overview.contests = contests;

        Ok(overview)
    }

    /// One contest with totals. The derived status is not persisted.
    pub async fn get(&self, id: &str) -> AppResult<ContestWithTotals> {
        let contest = self.contest_repo.get_by_id(id).await?;
        let mut with_totals = self.with_totals(vec![contest], Utc::now()).await?;

        with_totals
            .pop()
            .ok_or_else(|| AppError::NotFound("Contest not found.".to_string()))
    }

    async fn with_totals(
        &self,
        contests: Vec<contest::Model>,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ContestWithTotals>> {
        let ids: Vec<String> = contests.iter().map(|c| c.id.clone()).collect();
        let counts = self.tally_repo.count_by_contests(&ids).await?;
        let totals = self.ledger_repo.totals_by_contests(&ids).await?;

        Ok(contests
            .into_iter()
            .map(|contest| {
                let sums = totals.get(&contest.id).copied().unwrap_or_default();
                ContestWithTotals {
                    status: effective_status(&contest, now),
                    total_contestants: counts.get(&contest.id).copied().unwrap_or(0),
                    total_votes: sums.votes,
                    total_revenue: sums.revenue,
                    contest,
                }
            })
            .collect())
    }
}

fn ensure_dates_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end < start {
        return Err(AppError::Validation(
            "End date must not precede start date.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn create_test_contest(id: &str, status: ContestStatus, end_offset: Duration) -> contest::Model {
        let now = Utc::now();
        contest::Model {
            id: id.to_string(),
            name: format!("Contest {id}"),
            start_date: now - Duration::days(10),
            end_date: now + end_offset,
            status,
            no_votes: 0,
            revenue: 0.0,
            created_at: now - Duration::days(10),
            updated_at: now - Duration::days(10),
            deleted_at: None,
        }
    }

    fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_test_service(
        contest_db: Arc<DatabaseConnection>,
        tally_db: Arc<DatabaseConnection>,
        ledger_db: Arc<DatabaseConnection>,
    ) -> ContestService {
        ContestService::new(
            ContestRepository::new(contest_db),
            TallyRepository::new(tally_db),
            LedgerRepository::new(ledger_db),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let service = create_test_service(empty_db(), empty_db(), empty_db());

        let result = service.create(CreateContestInput::default()).await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(
                msg,
                "Contest name, start date, end date, and status are required."
            ),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_reversed_dates() {
        let service = create_test_service(empty_db(), empty_db(), empty_db());
        let now = Utc::now();

        let result = service
            .create(CreateContestInput {
                contest_name: "Spring Cup".to_string(),
                start_date: Some(now),
                end_date: Some(now - Duration::days(1)),
                status: Some(ContestStatus::Active),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_success() {
        let contest = create_test_contest("c1", ContestStatus::Active, Duration::days(5));
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest.clone()]])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let created = service
            .create(CreateContestInput {
                contest_name: contest.name.clone(),
                start_date: Some(contest.start_date),
                end_date: Some(contest.end_date),
                status: Some(ContestStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created, contest);
    }

    #[tokio::test]
    async fn test_complete_already_complete_is_conflict() {
        let contest = create_test_contest("c1", ContestStatus::Complete, Duration::days(5));
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest]])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let result = service
            .complete(ContestIdInput {
                id: "c1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_complete_sets_status() {
        let contest = create_test_contest("c1", ContestStatus::Active, Duration::days(5));
        let mut completed = contest.clone();
        completed.status = ContestStatus::Complete;
        completed.updated_at = Utc::now();

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest.clone()]])
                .append_query_results([[completed]])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let result = service
            .complete(ContestIdInput {
                id: "c1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.status, ContestStatus::Complete);
        assert!(result.updated_at > contest.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_backward_transition() {
        let contest = create_test_contest("c1", ContestStatus::Complete, Duration::days(5));
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest]])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let result = service
            .update(UpdateContestInput {
                id: "c1".to_string(),
                status: Some(ContestStatus::Active),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_allows_forward_transition() {
        let contest = create_test_contest("c1", ContestStatus::Active, Duration::days(5));
        let mut updated = contest.clone();
        updated.status = ContestStatus::Expired;
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest]])
                .append_query_results([[updated]])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let result = service
            .update(UpdateContestInput {
                id: "c1".to_string(),
                status: Some(ContestStatus::Expired),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.status, ContestStatus::Expired);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<contest::Model>::new()])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let result = service
            .update(UpdateContestInput {
                id: "missing".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = create_test_service(contest_db, empty_db(), empty_db());

        let result = service
            .delete(ContestIdInput {
                id: "missing".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_sums_active_contests_only() {
        let running = create_test_contest("c2", ContestStatus::Active, Duration::days(5));
        let lapsed = create_test_contest("c1", ContestStatus::Active, -Duration::days(1));

        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[running, lapsed]])
                .into_connection(),
        );
        let tally_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "contest_id" => Value::from("c2"),
                        "total" => Value::BigInt(Some(3)),
                    },
                    maplit::btreemap! {
                        "contest_id" => Value::from("c1"),
                        "total" => Value::BigInt(Some(2)),
                    },
                ]])
                .into_connection(),
        );
        let ledger_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    maplit::btreemap! {
                        "contest_id" => Value::from("c2"),
                        "votes" => Value::BigInt(Some(40)),
                        "revenue" => Value::Double(Some(20.0)),
                    },
                    maplit::btreemap! {
                        "contest_id" => Value::from("c1"),
                        "votes" => Value::BigInt(Some(7)),
                        "revenue" => Value::Double(Some(3.5)),
                    },
                ]])
                .into_connection(),
        );
        let service = create_test_service(contest_db, tally_db, ledger_db);

        let overview = service.list().await.unwrap();

        assert_eq!(overview.contests.len(), 2);
        assert_eq!(overview.contests[0].status, EffectiveStatus::Active);
        assert_eq!(overview.contests[1].status, EffectiveStatus::Expired);
        assert_eq!(overview.contests[1].total_votes, 7);
        assert_eq!(overview.total_active_contests, 1);
        assert_eq!(overview.total_active_contestants, 3);
        assert_eq!(overview.total_active_votes, 40);
        assert_eq!(overview.total_active_revenue, 20.0);
    }

    #[tokio::test]
    async fn test_get_without_ledger_entries_reports_zero() {
        let contest = create_test_contest("c1", ContestStatus::Active, Duration::days(5));
        let contest_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[contest]])
                .into_connection(),
        );
        let tally_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );
        let ledger_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );
        let service = create_test_service(contest_db, tally_db, ledger_db);

        let result = service.get("c1").await.unwrap();

        assert_eq!(result.total_contestants, 0);
        assert_eq!(result.total_votes, 0);
        assert_eq!(result.total_revenue, 0.0);
        assert_eq!(result.status, EffectiveStatus::Active);
    }
}
