//! Admin repository.

use std::sync::Arc;

use crate::entities::{Admin, admin};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use voteboard_common::{AppError, AppResult};

/// Admin repository for database operations.
#[derive(Clone)]
pub struct AdminRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminRepository {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live admin by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<admin::Model>> {
        Admin::find()
            .filter(admin::Column::Email.eq(email))
            .filter(admin::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new admin.
    pub async fn create(&self, model: admin::ActiveModel) -> AppResult<admin::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_admin(id: &str, email: &str) -> admin::Model {
        admin::Model {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$hash".to_string(),
            status: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_found() {
        let admin = create_test_admin("a1", "root@example.com");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[admin]])
                .into_connection(),
        );

        let repo = AdminRepository::new(db);
        let found = repo.find_by_email("root@example.com").await.unwrap();

        assert_eq!(found.unwrap().id, "a1");
    }

    #[tokio::test]
    async fn test_find_by_email_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<admin::Model>::new()])
                .into_connection(),
        );

        let repo = AdminRepository::new(db);
        let found = repo.find_by_email("nobody@example.com").await.unwrap();

        assert!(found.is_none());
    }
}
