use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::validation::{self, FieldErrors};
use super::{ensure_valid, ServiceError};
use crate::database::models::{ResourceKind, ResourceView};
use crate::database::{DatabaseError, Store};

/// Body of `POST /recipe/tags` and `POST /recipe/ingredients`
#[derive(Debug, Default, Deserialize)]
pub struct CreateResourceRequest {
    pub name: Option<String>,
}

/// List/create for tags and ingredients, always on behalf of one owner
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn Store>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self, kind: ResourceKind, owner: Uuid) -> Result<Vec<ResourceView>, ServiceError> {
        let rows = self.store.list_resources(kind, owner).await?;
        debug!(%owner, %kind, count = rows.len(), "Listed resources");
        Ok(rows.into_iter().map(ResourceView::from).collect())
    }

    pub async fn create(
        &self,
        kind: ResourceKind,
        owner: Uuid,
        request: CreateResourceRequest,
    ) -> Result<ResourceView, ServiceError> {
        let mut errors = FieldErrors::new();
        let name = validation::check_name("name", request.name.as_deref(), &mut errors);
        ensure_valid(errors)?;
        let name = name.ok_or_else(|| ServiceError::Validation(Default::default()))?;

        let created = self
            .store
            .create_resource(kind, owner, &name)
            .await
            .map_err(|e| match e {
                DatabaseError::NotFound(what) => ServiceError::NotFound(what),
                other => ServiceError::Database(other),
            })?;
        debug!(%owner, %kind, id = %created.id, "Created resource");
        Ok(ResourceView::from(created))
    }
}
