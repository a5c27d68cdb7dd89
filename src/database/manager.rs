use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database unavailable after {attempts} attempts: {message}")]
    Unavailable { attempts: u32, message: String },

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationError(err.to_string())
    }
}

/// Builds and checks the Postgres pool used by `PgStore`
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect, retrying until the database accepts connections.
    ///
    /// Containers usually start the API before Postgres is ready, so startup
    /// polls `wait_attempts` times, `wait_interval_secs` apart.
    pub async fn wait_until_ready(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = Self::database_url(config)?;
        let attempts = config.wait_attempts.max(1);
        let interval = Duration::from_secs(config.wait_interval_secs);

        info!("Waiting for database at {}...", Self::redact(&url));
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match Self::pool_options(config).connect(&url).await {
                Ok(pool) => match sqlx::query("SELECT 1").execute(&pool).await {
                    Ok(_) => {
                        info!("Database available!");
                        return Ok(pool);
                    }
                    Err(e) => last_error = e.to_string(),
                },
                Err(e) => last_error = e.to_string(),
            }

            if attempt < attempts {
                warn!(
                    "Database unavailable (attempt {}/{}), waiting {}s ...",
                    attempt, attempts, config.wait_interval_secs
                );
                tokio::time::sleep(interval).await;
            }
        }

        Err(DatabaseError::Unavailable { attempts, message: last_error })
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    fn database_url(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        let raw = config
            .url
            .clone()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let parsed = url::Url::parse(&raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match parsed.scheme() {
            "postgres" | "postgresql" => Ok(raw),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Strip the password from a connection string before it is logged
    fn redact(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("****"));
                }
                parsed.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}
