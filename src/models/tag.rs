use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Represents the 'tags' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: i64,
    /// Unique, trimmed tag name.
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagsBody {
    pub tags: Vec<String>,
}
