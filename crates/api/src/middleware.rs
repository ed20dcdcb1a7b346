//! Shared application state.

#![allow(missing_docs)]

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use voteboard_core::{
    AdminService, ContestService, ContestantService, LeaderboardService, LedgerService,
};
use voteboard_db::repositories::{
    AdminRepository, ContestRepository, ContestantRepository, InviteRepository, LedgerRepository,
    TallyRepository,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub admin_service: AdminService,
    pub contest_service: ContestService,
    pub contestant_service: ContestantService,
    pub ledger_service: LedgerService,
    pub leaderboard_service: LeaderboardService,
}

impl AppState {
    /// Wire every repository and service onto one shared connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let admin_repo = AdminRepository::new(Arc::clone(&db));
        let contest_repo = ContestRepository::new(Arc::clone(&db));
        let contestant_repo = ContestantRepository::new(Arc::clone(&db));
        let invite_repo = InviteRepository::new(Arc::clone(&db));
        let tally_repo = TallyRepository::new(Arc::clone(&db));
        let ledger_repo = LedgerRepository::new(db);

        Self {
            admin_service: AdminService::new(admin_repo),
            contest_service: ContestService::new(
                contest_repo.clone(),
                tally_repo.clone(),
                ledger_repo.clone(),
            ),
            contestant_service: ContestantService::new(
                contestant_repo.clone(),
                contest_repo.clone(),
                invite_repo,
                tally_repo.clone(),
            ),
            ledger_service: LedgerService::new(ledger_repo.clone()),
            leaderboard_service: LeaderboardService::new(
                contest_repo,
                tally_repo,
                contestant_repo,
                ledger_repo,
            ),
        }
    }
}
