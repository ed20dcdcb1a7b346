//! API endpoints.

mod admin;
mod auth;
mod contestants;
mod contests;
mod invites;
mod portal;
mod views;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(admin::router())
        .merge(auth::router())
        .merge(invites::router())
        .merge(contests::router())
        .merge(contestants::router())
        .merge(portal::router())
}
