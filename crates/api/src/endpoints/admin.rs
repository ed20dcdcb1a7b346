//! Administrator endpoints.

use axum::{Router, extract::State, routing::post};
use chrono::{DateTime, Utc};
use serde::Serialize;
use voteboard_common::AppResult;
use voteboard_core::CredentialsInput;
use voteboard_db::entities::admin;

use crate::{extractors::ApiJson, middleware::AppState, response::ApiResponse};

/// Administrator response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: String,
    pub email: String,
    pub status: i32,
    pub created_at: DateTime<Utc>,
}

impl From<admin::Model> for AdminResponse {
    fn from(a: admin::Model) -> Self {
        Self {
            id: a.id,
            email: a.email,
            status: a.status,
            created_at: a.created_at,
        }
    }
}

/// Create an administrator.
async fn create_admin(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CredentialsInput>,
) -> AppResult<ApiResponse<AdminResponse>> {
    let admin = state.admin_service.create(input).await?;

    Ok(ApiResponse::created(
        "Admin created successfully.",
        admin.into(),
    ))
}

/// Sign an administrator in.
async fn signin_admin(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CredentialsInput>,
) -> AppResult<ApiResponse<AdminResponse>> {
    let admin = state.admin_service.signin(input).await?;

    Ok(ApiResponse::ok("Admin signed in successfully.", admin.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-admin", post(create_admin))
        .route("/signin-admin", post(signin_admin))
}
