use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// The per-user recipe attributes. Both share one table shape and one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Tag,
    Ingredient,
}

impl ResourceKind {
    /// Backing table. Only ever one of these two literals, so it is safe to
    /// interpolate into SQL.
    pub fn table_name(self) -> &'static str {
        match self {
            ResourceKind::Tag => "tags",
            ResourceKind::Ingredient => "ingredients",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Tag => "tag",
            ResourceKind::Ingredient => "ingredient",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tag or ingredient row, owned by exactly one user
#[derive(Debug, Clone, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Wire shape for tags and ingredients: `{ "id": ..., "name": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceView {
    pub id: Uuid,
    pub name: String,
}

impl From<Resource> for ResourceView {
    fn from(resource: Resource) -> Self {
        Self {
            id: resource.id,
            name: resource.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_tables() {
        assert_eq!(ResourceKind::Tag.table_name(), "tags");
        assert_eq!(ResourceKind::Ingredient.table_name(), "ingredients");
        assert_eq!(ResourceKind::Ingredient.to_string(), "ingredient");
    }

    #[test]
    fn view_hides_owner() {
        let resource = Resource {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Vegan".to_string(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(ResourceView::from(resource)).unwrap();
        assert_eq!(value["name"], "Vegan");
        assert!(value.get("user_id").is_none());
    }
}
