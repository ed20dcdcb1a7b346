//! Live `PostgreSQL` fixtures for the ignored integration tests.
//!
//! Each fixture either attaches to an existing, already migrated database or
//! creates a throwaway one that the test drops when it is done.

use crate::migrations::Migrator;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use voteboard_common::IdGenerator;

/// Where the test server lives. Every field can be overridden with a
/// `TEST_DB_*` environment variable.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// `TEST_DB_HOST`, default `localhost`.
    pub host: String,
    /// `TEST_DB_PORT`, default 5433.
    pub port: u16,
    /// `TEST_DB_USER`.
    pub username: String,
    /// `TEST_DB_PASSWORD`.
    pub password: String,
    /// Database to attach to; replaced by a generated name in
    /// [`TestDatabase::create_unique`].
    pub database: String,
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: env_or("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: env_or("TEST_DB_USER", "voteboard_test"),
            password: env_or("TEST_DB_PASSWORD", "voteboard_test"),
            database: env_or("TEST_DB_NAME", "voteboard_test"),
        }
    }
}

impl TestDbConfig {
    fn url_for(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }

    /// URL of the configured test database.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.url_for(&self.database)
    }

    /// URL of the server's `postgres` maintenance database, used to create
    /// and drop throwaway databases.
    #[must_use]
    pub fn postgres_url(&self) -> String {
        self.url_for("postgres")
    }
}

/// An open connection to a test database.
pub struct TestDatabase {
    conn: DatabaseConnection,
    config: TestDbConfig,
}

impl TestDatabase {
    /// Attach to the database named by [`TestDbConfig::default`].
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Attach to an existing database. Migrations are not run.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(&config.database_url()).await?;
        info!(database = %config.database, "Connected to test database");

        Ok(Self { conn, config })
    }

    /// Create a fresh, fully migrated database under a random name.
    ///
    /// Tests using this can run in parallel. Call [`Self::drop_database`]
    /// at the end.
    pub async fn create_unique() -> Result<Self, DbErr> {
        let mut config = TestDbConfig::default();
        config.database = format!("voteboard_test_{}", IdGenerator::new().generate_suffix());

        let admin = Database::connect(&config.postgres_url()).await?;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("CREATE DATABASE \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        let conn = Database::connect(&config.database_url()).await?;
        Migrator::up(&conn, None).await?;
        info!(database = %config.database, "Created test database");

        Ok(Self { conn, config })
    }

    /// The open connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Close the connection and drop the database.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        let Self { conn, config } = self;
        conn.close().await?;

        let admin = Database::connect(&config.postgres_url()).await?;

        // Clones of the connection held by repositories may still be open.
        let _ = admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!(
                    "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}'",
                    config.database
                ),
            ))
            .await;

        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                format!("DROP DATABASE IF EXISTS \"{}\"", config.database),
            ))
            .await?;
        admin.close().await?;

        info!(database = %config.database, "Dropped test database");
        Ok(())
    }
}
