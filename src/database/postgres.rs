use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{NewUser, Resource, ResourceKind, User, UserChanges};
use super::store::Store;

const USER_COLUMNS: &str =
    "id, email, password_hash, name, is_active, is_staff, is_superuser, created_at, updated_at";

/// Postgres-backed `Store`
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a unique index violation onto our own error so callers can turn it
/// into a validation message instead of a 500.
fn map_unique(err: sqlx::Error, what: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DatabaseError::UniqueViolation(what.to_string())
        }
        _ => DatabaseError::Sqlx(err),
    }
}

fn map_missing_owner(err: sqlx::Error, owner: Uuid) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            DatabaseError::NotFound(format!("user {owner}"))
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, name, is_active, is_staff, is_superuser) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique(e, "email"))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        // COALESCE keeps the stored value for every field left as NULL
        let query = format!(
            "UPDATE users SET \
                email = COALESCE($2, email), \
                password_hash = COALESCE($3, password_hash), \
                name = COALESCE($4, name), \
                updated_at = $5 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.name)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique(e, "email"))?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    // Byte-order collation, so the result does not depend on the database
    // locale and matches `MemoryStore`
    async fn list_resources(&self, kind: ResourceKind, owner: Uuid) -> Result<Vec<Resource>, DatabaseError> {
        let query = format!(
            "SELECT id, user_id, name, created_at FROM {} \
             WHERE user_id = $1 \
             ORDER BY name COLLATE \"C\" DESC, created_at DESC",
            kind.table_name()
        );

        let rows = sqlx::query_as::<_, Resource>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_resource(
        &self,
        kind: ResourceKind,
        owner: Uuid,
        name: &str,
    ) -> Result<Resource, DatabaseError> {
        let query = format!(
            "INSERT INTO {} (id, user_id, name) VALUES ($1, $2, $3) \
             RETURNING id, user_id, name, created_at",
            kind.table_name()
        );

        let row = sqlx::query_as::<_, Resource>(&query)
            .bind(Uuid::new_v4())
            .bind(owner)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_missing_owner(e, owner))?;
        Ok(row)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
