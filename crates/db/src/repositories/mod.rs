//! Repositories: query and persistence helpers over the entities.

use sea_orm::{DbErr, SqlErr};
use voteboard_common::AppError;

pub mod admin;
pub mod contest;
pub mod contestant;
pub mod invite;
pub mod ledger;
pub mod tally;

pub use admin::AdminRepository;
pub use contest::ContestRepository;
pub use contestant::ContestantRepository;
pub use invite::InviteRepository;
pub use ledger::{ContestTotals, LedgerRepository, NewLedgerEntry};
pub use tally::TallyRepository;

/// Map an insert failure, turning a unique-index violation into `Conflict`.
pub(crate) fn insert_error(err: DbErr, conflict: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(conflict.to_string()),
        _ => AppError::Database(err.to_string()),
    }
}
