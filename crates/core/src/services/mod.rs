//! Business logic services.

#![allow(missing_docs)]

pub mod admin;
pub mod contest;
pub mod contestant;
pub mod leaderboard;
pub mod ledger;

pub use admin::{AdminService, CredentialsInput};
pub use contest::{
    ContestIdInput, ContestOverview, ContestService, ContestWithTotals, CreateContestInput,
    UpdateContestInput,
};
pub use contestant::{ContestantService, InviteInput, InviteOutcome, SignupInput};
pub use leaderboard::{
    ContestStandings, ContestWithContestants, FinishedContest, LeaderboardService, Membership,
    Memberships, RankedContestant, TransactionHistory,
};
pub use ledger::{CreatePaymentInput, LedgerService};
