//! Ledger service: vote purchases.

use chrono::Utc;
use serde::Deserialize;
use validator::Validate;
use voteboard_common::{AppError, AppResult, IdGenerator};
use voteboard_db::{
    entities::{ledger_entry, tally},
    repositories::{LedgerRepository, NewLedgerEntry},
};

/// Ledger service for business logic.
#[derive(Clone)]
pub struct LedgerService {
    ledger_repo: LedgerRepository,
    id_gen: IdGenerator,
}

/// Input for a vote purchase.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePaymentInput {
    #[validate(length(
        min = 1,
        message = "contestId, contestantId, vote, payment and name are required."
    ))]
    pub contest_id: String,

    #[validate(length(
        min = 1,
        message = "contestId, contestantId, vote, payment and name are required."
    ))]
    pub contestant_id: String,

    #[validate(range(min = 1, message = "vote must be a positive number."))]
    pub vote: i32,

    #[validate(range(exclusive_min = 0.0, message = "payment must be a positive amount."))]
    pub payment: f64,

    #[validate(length(
        min = 1,
        max = 256,
        message = "contestId, contestantId, vote, payment and name are required."
    ))]
    pub name: String,
}

impl LedgerService {
    /// Create a new ledger service.
    #[must_use]
    pub const fn new(ledger_repo: LedgerRepository) -> Self {
        Self {
            ledger_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a vote purchase and credit its votes to the contestant.
    ///
    /// Fails with `NotFound` when the contestant is not in the contest; no
    /// ledger entry is written in that case.
    pub async fn append_vote(
        &self,
        input: CreatePaymentInput,
    ) -> AppResult<(ledger_entry::Model, tally::Model)> {
        input.validate()?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "contestId, contestantId, vote, payment and name are required.".to_string(),
            ));
        }

        let entry = NewLedgerEntry {
            id: self.id_gen.generate(),
            contest_id: input.contest_id,
            contestant_id: input.contestant_id,
            name: name.to_string(),
            vote: input.vote,
            payment: input.payment,
        };

        let (entry, row) = self.ledger_repo.append(entry, Utc::now()).await?;
        tracing::info!(
            contest_id = %entry.contest_id,
            contestant_id = %entry.contestant_id,
            votes = entry.vote,
            total = row.vote,
            "Recorded vote purchase"
        );
        Ok((entry, row))
    }
}
