//! Contest standings and contestant lookups.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voteboard_common::AppResult;
use voteboard_core::ContestStandings;

use super::views::{ContestView, ContestantView, RankedView, ranked};
use crate::{extractors::ApiJson, middleware::AppState, response::ApiResponse};

/// Standings request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandingsRequest {
    pub contest_id: String,
}

/// Contestant lookup request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContestantRequest {
    pub contestant_id: String,
}

/// Contestant entry removal request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveEntryRequest {
    pub id: String,
}

/// Contest totals shown beside the standings.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestDetails {
    pub end_date: DateTime<Utc>,
    pub total_contestants: u64,
    pub total_votes: i64,
    pub total_revenue: f64,
}

/// Standings response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    pub contest: ContestView,
    pub contestants: Vec<RankedView>,
    pub contest_details: ContestDetails,
}

impl From<ContestStandings> for StandingsResponse {
    fn from(s: ContestStandings) -> Self {
        Self {
            contest_details: ContestDetails {
                end_date: s.contest.end_date,
                total_contestants: s.total_contestants,
                total_votes: s.total_votes,
                total_revenue: s.total_revenue,
            },
            contest: s.contest.into(),
            contestants: ranked(s.contestants),
        }
    }
}

async fn standings(
    state: &AppState,
    contest_id: &str,
) -> AppResult<ApiResponse<StandingsResponse>> {
    let standings = state
        .leaderboard_service
        .contest_standings(contest_id)
        .await?;

    Ok(ApiResponse::ok(
        "Contestants fetched successfully.",
        standings.into(),
    ))
}

/// Ranked contestants of a contest.
async fn contest_standings(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<StandingsRequest>,
) -> AppResult<ApiResponse<StandingsResponse>> {
    standings(&state, &req.contest_id).await
}

/// Ranked contestants of a contest addressed in the path.
async fn contest_standings_by_path(
    State(state): State<AppState>,
    Path(contest_id): Path<String>,
) -> AppResult<ApiResponse<StandingsResponse>> {
    standings(&state, &contest_id).await
}

/// Get a contestant's profile.
async fn get_contestant(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ContestantRequest>,
) -> AppResult<ApiResponse<ContestantView>> {
    let contestant = state
        .contestant_service
        .get_contestant(&req.contestant_id)
        .await?;

    Ok(ApiResponse::ok(
        "Contestant fetched successfully.",
        contestant.into(),
    ))
}

/// Remove a contestant from a contest.
async fn remove_entry(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RemoveEntryRequest>,
) -> AppResult<ApiResponse<()>> {
    state.leaderboard_service.remove_entry(&req.id).await?;

    Ok(ApiResponse::message(format!(
        "Contestant entry with id {} deleted successfully.",
        req.id
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contestants", post(contest_standings))
        .route("/contestants/{contest_id}", post(contest_standings_by_path))
        .route("/contestant", post(get_contestant))
        .route("/contestant-list-delete-byid", delete(remove_entry))
}
