//! Admin service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use voteboard_common::{AppError, AppResult, IdGenerator};
use voteboard_db::{entities::admin, repositories::AdminRepository};

use crate::password::{hash_password, verify_password};

/// Admin service for business logic.
#[derive(Clone)]
pub struct AdminService {
    admin_repo: AdminRepository,
    id_gen: IdGenerator,
}

/// Email and password pair, shared by admin and contestant sign-in.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CredentialsInput {
    #[validate(length(min = 1, message = "Email and password are required."))]
    pub email: String,

    #[validate(length(min = 1, message = "Email and password are required."))]
    pub password: String,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(admin_repo: AdminRepository) -> Self {
        Self {
            admin_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new administrator.
    pub async fn create(&self, input: CredentialsInput) -> AppResult<admin::Model> {
        input.validate()?;

        if self.admin_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "Admin with this email already exists.".to_string(),
            ));
        }

        let now = Utc::now();
        let model = admin::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            status: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let admin = self.admin_repo.create(model).await?;
        tracing::info!(admin_id = %admin.id, "Created admin");
        Ok(admin)
    }

    /// Sign an administrator in.
    pub async fn signin(&self, input: CredentialsInput) -> AppResult<admin::Model> {
        input.validate()?;

        let admin = self
            .admin_repo
            .find_by_email(&input.email)
            .await?
            .ok_or_else(|| AppError::NotFound("Admin not found.".to_string()))?;

        if !verify_password(&input.password, &admin.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid email or password.".to_string(),
            ));
        }

        Ok(admin)
    }
}
