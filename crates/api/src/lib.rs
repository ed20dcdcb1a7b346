//! HTTP API layer for voteboard.
//!
//! - **Endpoints**: contest administration, invites, leaderboards, vote purchases
//! - **Extractors**: JSON bodies with enveloped rejections
//! - **Response**: the `{ success, message, data }` envelope
//!
//! Built on Axum 0.8. The server nests [`router`] under `/apis`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
