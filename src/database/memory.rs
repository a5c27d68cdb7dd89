//! In-memory `Store` used by tests and `STORE_BACKEND=memory` runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{NewUser, Resource, ResourceKind, User, UserChanges};
use super::store::Store;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order is kept so name ties list newest first, like the SQL store
    resources: HashMap<ResourceKind, Vec<Resource>>,
}

/// All state behind one lock; the write lock doubles as the unique-email constraint.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("email".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            is_active: true,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if let Some(email) = &changes.email {
            if tables.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(DatabaseError::UniqueViolation("email".to_string()));
            }
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_resources(&self, kind: ResourceKind, owner: Uuid) -> Result<Vec<Resource>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Resource> = tables
            .resources
            .get(&kind)
            .map(|rows| rows.iter().rev().filter(|r| r.user_id == owner).cloned().collect())
            .unwrap_or_default();
        // Byte order like `COLLATE "C"`; stable, so equal names stay newest first
        rows.sort_by(|a, b| b.name.as_bytes().cmp(a.name.as_bytes()));
        Ok(rows)
    }

    async fn create_resource(
        &self,
        kind: ResourceKind,
        owner: Uuid,
        name: &str,
    ) -> Result<Resource, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner) {
            return Err(DatabaseError::NotFound(format!("user {owner}")));
        }

        let resource = Resource {
            id: Uuid::new_v4(),
            user_id: owner,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.resources.entry(kind).or_default().push(resource.clone());
        Ok(resource)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: String::new(),
            is_staff: false,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();
        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn resources_are_scoped_and_sorted() {
        let store = MemoryStore::new();
        let alice = store.create_user(new_user("alice@example.com")).await.unwrap();
        let bob = store.create_user(new_user("bob@example.com")).await.unwrap();

        store.create_resource(ResourceKind::Tag, alice.id, "Dessert").await.unwrap();
        store.create_resource(ResourceKind::Tag, alice.id, "Vegan").await.unwrap();
        store.create_resource(ResourceKind::Tag, bob.id, "Fruity").await.unwrap();
        store.create_resource(ResourceKind::Ingredient, alice.id, "Kale").await.unwrap();

        let names: Vec<String> = store
            .list_resources(ResourceKind::Tag, alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Vegan", "Dessert"]);

        let bob_tags = store.list_resources(ResourceKind::Tag, bob.id).await.unwrap();
        assert_eq!(bob_tags.len(), 1);
        assert_eq!(bob_tags[0].name, "Fruity");

        let bob_ingredients = store.list_resources(ResourceKind::Ingredient, bob.id).await.unwrap();
        assert!(bob_ingredients.is_empty());
    }

    #[tokio::test]
    async fn ordering_is_by_bytes_not_locale() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        for name in ["apple", "Banana", "cherry"] {
            store.create_resource(ResourceKind::Ingredient, user.id, name).await.unwrap();
        }
        let names: Vec<String> = store
            .list_resources(ResourceKind::Ingredient, user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["cherry", "apple", "Banana"]);
    }

    #[tokio::test]
    async fn update_keeps_untouched_fields() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        let updated = store
            .update_user(
                user.id,
                UserChanges {
                    name: Some("Alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "a@example.com");
        assert_eq!(updated.password_hash, "hash");
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();
        let b = store.create_user(new_user("b@example.com")).await.unwrap();
        let err = store
            .update_user(
                b.id,
                UserChanges {
                    email: Some("a@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }
}
