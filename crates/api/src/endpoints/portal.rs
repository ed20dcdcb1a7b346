//! Contestant dashboard and public voting endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voteboard_common::AppResult;
use voteboard_core::{
    ContestWithContestants, CreatePaymentInput, FinishedContest, Membership, Memberships,
    TransactionHistory,
};

use super::views::{ContestHeader, LedgerEntryView, RankedView, TallyView, ranked};
use crate::{extractors::ApiJson, middleware::AppState, response::ApiResponse};

/// Membership list request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipsRequest {
    pub contestant_id: String,
}

/// Transaction history request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRequest {
    pub contest_id: String,
    pub contestant_id: String,
}

/// Contest header with the time left to vote.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipContest {
    #[serde(flatten)]
    pub header: ContestHeader,
    pub remaining_days: String,
}

/// One membership.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    #[serde(flatten)]
    pub entry: TallyView,
    pub contest: MembershipContest,
    pub votes: i64,
    pub position: usize,
    pub progress: f64,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        Self {
            votes: m.tally.vote,
            contest: MembershipContest {
                header: ContestHeader {
                    id: m.contest.id,
                    name: m.contest.name,
                    status: m.status,
                    end_date: m.contest.end_date,
                },
                remaining_days: m.remaining_days,
            },
            entry: m.tally.into(),
            position: m.position,
            progress: m.progress,
        }
    }
}

/// Membership list response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipsResponse {
    pub total_active_contests: u64,
    pub total_votes: i64,
    pub average_progress: f64,
    pub contestant_lists: Vec<MembershipResponse>,
}

impl From<Memberships> for MembershipsResponse {
    fn from(m: Memberships) -> Self {
        Self {
            total_active_contests: m.total_active_contests,
            total_votes: m.total_votes,
            average_progress: m.average_progress,
            contestant_lists: m.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Transaction history response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub transaction_history: Vec<LedgerEntryView>,
    pub total_votes: i64,
    pub progress: f64,
    pub rank: Option<usize>,
    pub end_date: DateTime<Utc>,
    pub remaining_days: String,
}

impl From<TransactionHistory> for HistoryResponse {
    fn from(h: TransactionHistory) -> Self {
        Self {
            transaction_history: h.entries.into_iter().map(Into::into).collect(),
            total_votes: h.total_votes,
            progress: h.progress,
            rank: h.rank,
            end_date: h.contest.end_date,
            remaining_days: h.remaining_days,
        }
    }
}

/// An open contest with its contestants.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenContestResponse {
    pub id: String,
    pub name: String,
    pub end_date: DateTime<Utc>,
    pub contestants: Vec<RankedView>,
}

impl From<ContestWithContestants> for OpenContestResponse {
    fn from(c: ContestWithContestants) -> Self {
        Self {
            id: c.contest.id,
            name: c.contest.name,
            end_date: c.contest.end_date,
            contestants: ranked(c.contestants),
        }
    }
}

/// Open contests response.
#[derive(Serialize)]
pub struct OpenContestsResponse {
    pub contests: Vec<OpenContestResponse>,
}

/// Payment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub transaction: LedgerEntryView,
    pub updated_contestant: TallyView,
}

/// A finished contest with its final standings.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedContestResponse {
    pub id: String,
    pub title: String,
    pub status: voteboard_db::entities::contest::ContestStatus,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub time_passed: Option<String>,
    pub top_contestant: Option<RankedView>,
    pub contestants: Vec<RankedView>,
}

impl From<FinishedContest> for FinishedContestResponse {
    fn from(f: FinishedContest) -> Self {
        let top_contestant = f.top_contestant().cloned().map(Into::into);
        Self {
            id: f.contest.id,
            title: f.contest.name,
            status: f.contest.status,
            end_date: f.contest.end_date,
            created_at: f.contest.created_at,
            updated_at: f.contest.updated_at,
            time_passed: f.time_passed,
            top_contestant,
            contestants: ranked(f.contestants),
        }
    }
}

/// Every contest a contestant takes part in.
async fn memberships(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MembershipsRequest>,
) -> AppResult<ApiResponse<MembershipsResponse>> {
    let memberships = state
        .leaderboard_service
        .memberships(&req.contestant_id)
        .await?;

    Ok(ApiResponse::ok(
        "Contestant lists fetched successfully.",
        memberships.into(),
    ))
}

/// A contestant's vote purchases in one contest.
async fn transaction_history(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<HistoryRequest>,
) -> AppResult<ApiResponse<HistoryResponse>> {
    let history = state
        .leaderboard_service
        .transaction_history(&req.contest_id, &req.contestant_id)
        .await?;

    Ok(ApiResponse::ok(
        "Transaction history fetched successfully.",
        history.into(),
    ))
}

/// Contests currently open for voting.
async fn open_contests(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<OpenContestsResponse>> {
    let contests = state.leaderboard_service.active_contests().await?;

    Ok(ApiResponse::ok(
        "Active contests with contestants fetched successfully.",
        OpenContestsResponse {
            contests: contests.into_iter().map(Into::into).collect(),
        },
    ))
}

/// Buy votes for a contestant.
async fn create_payment(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreatePaymentInput>,
) -> AppResult<ApiResponse<PaymentResponse>> {
    let (entry, tally) = state.ledger_service.append_vote(input).await?;

    Ok(ApiResponse::created(
        "Transaction created and votes incremented successfully.",
        PaymentResponse {
            transaction: entry.into(),
            updated_contestant: tally.into(),
        },
    ))
}

/// Finished contests with their winners.
async fn finished_contests(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<FinishedContestResponse>>> {
    let contests = state.leaderboard_service.finished_contests().await?;

    Ok(ApiResponse::ok(
        "Contests with top contestants and details fetched successfully.",
        contests.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subuser-contestlist", post(memberships))
        .route("/subuser-transaction", post(transaction_history))
        .route("/web-contest-list", get(open_contests))
        .route("/web-create-payment", post(create_payment))
        .route("/web-gettop-contest", get(finished_contests))
}
