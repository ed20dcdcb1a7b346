//! Invite endpoint.

use axum::{Router, extract::State, routing::post};
use serde::Serialize;
use voteboard_common::AppResult;
use voteboard_core::{InviteInput, InviteOutcome};

use super::views::{InviteView, TallyView};
use crate::{extractors::ApiJson, middleware::AppState, response::ApiResponse};

/// Invite response. Exactly one of the fields is present.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<TallyView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<InviteView>,
}

/// Add an existing contestant to a contest, or invite a new email.
async fn invite(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InviteInput>,
) -> AppResult<ApiResponse<InviteResponse>> {
    let response = match state.contestant_service.invite_or_add(input).await? {
        InviteOutcome::Added(entry) => ApiResponse::ok(
            "Contestant added to the contest successfully.",
            InviteResponse {
                entry: Some(entry.into()),
                invite: None,
            },
        ),
        InviteOutcome::Invited(invite) => ApiResponse::ok(
            "Email invited successfully.",
            InviteResponse {
                entry: None,
                invite: Some(invite.into()),
            },
        ),
    };

    Ok(response)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/invite", post(invite))
}
