use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewUser, Resource, ResourceKind, User, UserChanges};

/// Storage interface used by the service layer.
///
/// Every resource method takes the owning user's id; there is deliberately no
/// way to read or write a tag or ingredient without one.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Fails with `UniqueViolation` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Exact match on the (already normalized) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// Apply a partial update and return the fresh row.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user is gone, `UniqueViolation` if a new email is taken.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError>;

    /// Records of `kind` owned by `owner`, ordered by name descending
    async fn list_resources(&self, kind: ResourceKind, owner: Uuid) -> Result<Vec<Resource>, DatabaseError>;

    async fn create_resource(
        &self,
        kind: ResourceKind,
        owner: Uuid,
        name: &str,
    ) -> Result<Resource, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
