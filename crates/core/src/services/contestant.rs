//! Contestant service: invites, signup and sign-in.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voteboard_common::{AppError, AppResult, IdGenerator};
use voteboard_db::{
    entities::{
        contestant,
        invite::{self, InviteStatus},
        tally,
    },
    repositories::{ContestRepository, ContestantRepository, InviteRepository, TallyRepository},
};

use crate::{
    password::{hash_password, verify_password},
    services::admin::CredentialsInput,
};

/// Contestant service for business logic.
#[derive(Clone)]
pub struct ContestantService {
    contestant_repo: ContestantRepository,
    contest_repo: ContestRepository,
    invite_repo: InviteRepository,
    tally_repo: TallyRepository,
    id_gen: IdGenerator,
}

/// Input for inviting or adding a contestant to a contest.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct InviteInput {
    #[validate(length(min = 1, message = "Email and contestId are required."))]
    pub email: String,

    #[validate(length(min = 1, message = "Email and contestId are required."))]
    pub contest_id: String,
}

/// Input for contestant signup.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupInput {
    #[validate(
        length(min = 1, message = "Name, Type, Email, and Password are required."),
        email(message = "Email is invalid.")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Name, Type, Email, and Password are required."))]
    pub password: String,

    #[validate(length(min = 1, max = 256, message = "Name, Type, Email, and Password are required."))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "Name, Type, Email, and Password are required."))]
    pub kind: String,
}

/// What an invite request did.
#[derive(Debug, Clone)]
pub enum InviteOutcome {
    /// The email belongs to an existing contestant, who now has a tally row.
    Added(tally::Model),
    /// No account yet; an invite was recorded.
    Invited(invite::Model),
}

impl ContestantService {
    /// Create a new contestant service.
    #[must_use]
    pub const fn new(
        contestant_repo: ContestantRepository,
        contest_repo: ContestRepository,
        invite_repo: InviteRepository,
        tally_repo: TallyRepository,
    ) -> Self {
        Self {
            contestant_repo,
            contest_repo,
            invite_repo,
            tally_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add an existing contestant to a contest, or invite the email.
    pub async fn invite_or_add(&self, input: InviteInput) -> AppResult<InviteOutcome> {
        input.validate()?;

        let contest = self.contest_repo.get_by_id(&input.contest_id).await?;
        let now = Utc::now();

        if let Some(existing) = self.contestant_repo.find_by_email(&input.email).await? {
            if self
                .tally_repo
                .find_pair(&contest.id, &existing.id)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict(
                    "Contestant is already added to the contest.".to_string(),
                ));
            }

            let row = self
                .tally_repo
                .create(tally::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    contestant_id: Set(existing.id),
                    contest_id: Set(contest.id),
                    vote: Set(0),
                    created_at: Set(now),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                })
                .await?;

            tracing::info!(
                contest_id = %row.contest_id,
                contestant_id = %row.contestant_id,
                "Added contestant to contest"
            );
            return Ok(InviteOutcome::Added(row));
        }

        if self
            .invite_repo
            .find_by_email_and_contest(&input.email, &contest.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Email is already invited to this contest.".to_string(),
            ));
        }

        let invite = self
            .invite_repo
            .create(invite::ActiveModel {
                id: Set(self.id_gen.generate()),
                email: Set(input.email),
                contest_id: Set(contest.id),
                status: Set(InviteStatus::Pending),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            })
            .await?;

        tracing::info!(contest_id = %invite.contest_id, invite_id = %invite.id, "Invited email to contest");
        Ok(InviteOutcome::Invited(invite))
    }

    /// Register a contestant who holds an invite.
    ///
    /// The contestant, its tally row and the consumed invite are written in
    /// one transaction.
    pub async fn signup(&self, input: SignupInput) -> AppResult<(contestant::Model, tally::Model)> {
        input.validate()?;

        if self
            .contestant_repo
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "An account with this email already exists.".to_string(),
            ));
        }

        let invite = self
            .invite_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::BadRequest("You are not invited to any contest.".to_string()))?;

        let now = Utc::now();
        let model = contestant::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            name: Set(input.name.trim().to_string()),
            kind: Set(input.kind),
            dp: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let (contestant, row) = self
            .contestant_repo
            .register_from_invite(model, self.id_gen.generate(), &invite, now)
            .await?;

        tracing::info!(
            contestant_id = %contestant.id,
            contest_id = %row.contest_id,
            "Contestant signed up"
        );
        Ok((contestant, row))
    }

    /// Sign a contestant in.
    pub async fn login(&self, input: CredentialsInput) -> AppResult<contestant::Model> {
        input.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password.".to_string());

        let contestant = self
            .contestant_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&input.password, &contestant.password_hash)? {
            return Err(invalid());
        }

        Ok(contestant)
    }

    /// Get a contestant's public profile.
    pub async fn get_contestant(&self, id: &str) -> AppResult<contestant::Model> {
        if id.is_empty() {
            return Err(AppError::Validation("contestantId is required.".to_string()));
        }
        self.contestant_repo.get_by_id(id).await
    }
}
