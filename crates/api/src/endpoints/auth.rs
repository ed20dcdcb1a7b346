//! Contestant signup and signin.

use axum::{Router, extract::State, routing::post};
use serde::Serialize;
use voteboard_common::AppResult;
use voteboard_core::{CredentialsInput, SignupInput};

use super::views::{ContestantView, TallyView};
use crate::{extractors::ApiJson, middleware::AppState, response::ApiResponse};

/// Signup response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub contestant: ContestantView,
    pub entry: TallyView,
}

/// Register an invited contestant and add them to the invited contest.
async fn signup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SignupInput>,
) -> AppResult<ApiResponse<SignupResponse>> {
    let (contestant, entry) = state.contestant_service.signup(input).await?;

    Ok(ApiResponse::created(
        "Account created successfully, and you are added to the contest.",
        SignupResponse {
            contestant: contestant.into(),
            entry: entry.into(),
        },
    ))
}

/// Sign a contestant in.
async fn signin(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CredentialsInput>,
) -> AppResult<ApiResponse<ContestantView>> {
    let contestant = state.contestant_service.login(input).await?;

    Ok(ApiResponse::ok("Login successful.", contestant.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}
