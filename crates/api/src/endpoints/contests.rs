//! Contest administration endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use voteboard_common::AppResult;
use voteboard_core::{
    ContestIdInput, ContestOverview, ContestWithTotals, CreateContestInput, EffectiveStatus,
    UpdateContestInput,
};

use super::views::ContestView;
use crate::{extractors::ApiJson, middleware::AppState, response::ApiResponse};

/// A contest with its ledger totals.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestSummaryResponse {
    #[serde(flatten)]
    pub contest: ContestView,
    pub effective_status: EffectiveStatus,
    pub total_contestants: u64,
    pub total_votes: i64,
    pub total_revenue: f64,
}

impl From<ContestWithTotals> for ContestSummaryResponse {
    fn from(c: ContestWithTotals) -> Self {
        Self {
            contest: c.contest.into(),
            effective_status: c.status,
            total_contestants: c.total_contestants,
            total_votes: c.total_votes,
            total_revenue: c.total_revenue,
        }
    }
}

/// Contest list response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestListResponse {
    pub contests: Vec<ContestSummaryResponse>,
    pub total_active_contests: u64,
    pub total_active_contestants: u64,
    pub total_active_votes: i64,
    pub total_active_revenue: f64,
}

impl From<ContestOverview> for ContestListResponse {
    fn from(o: ContestOverview) -> Self {
        Self {
            contests: o.contests.into_iter().map(Into::into).collect(),
            total_active_contests: o.total_active_contests,
            total_active_contestants: o.total_active_contestants,
            total_active_votes: o.total_active_votes,
            total_active_revenue: o.total_active_revenue,
        }
    }
}

/// Create a contest.
async fn create_contest(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateContestInput>,
) -> AppResult<ApiResponse<ContestView>> {
    let contest = state.contest_service.create(input).await?;

    Ok(ApiResponse::created(
        "Contest created successfully.",
        contest.into(),
    ))
}

/// Update a contest.
async fn update_contest(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateContestInput>,
) -> AppResult<ApiResponse<ContestView>> {
    let contest = state.contest_service.update(input).await?;

    Ok(ApiResponse::ok("Contest updated successfully.", contest.into()))
}

/// Mark a contest as complete.
async fn complete_contest(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ContestIdInput>,
) -> AppResult<ApiResponse<ContestView>> {
    let contest = state.contest_service.complete(input).await?;

    Ok(ApiResponse::ok(
        "Contest marked as complete successfully.",
        contest.into(),
    ))
}

/// Soft-delete a contest.
async fn delete_contest(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ContestIdInput>,
) -> AppResult<ApiResponse<()>> {
    state.contest_service.delete(input).await?;

    Ok(ApiResponse::message("Contest deleted successfully."))
}

/// List every contest with totals.
async fn list_contests(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ContestListResponse>> {
    let overview = state.contest_service.list().await?;

    Ok(ApiResponse::ok("Contests fetched successfully.", overview.into()))
}

/// Get one contest with totals.
async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ContestSummaryResponse>> {
    let contest = state.contest_service.get(&id).await?;

    Ok(ApiResponse::ok("Contest fetched successfully.", contest.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-contest", post(create_contest))
        .route("/update-contest", put(update_contest))
        .route("/complete-contest", post(complete_contest))
        .route("/delete-contest", delete(delete_contest))
        .route("/contests", get(list_contests))
        .route("/contest/{id}", get(get_contest))
}
