// src/handlers/tag.rs

use axum::{extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{error::AppError, extract::Json, models::tag::TagsBody, services};

pub const TAG_TAG: &str = "tags";

/// Every tag name in use.
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = TAG_TAG,
    responses(
        (status = 200, description = "All tags", body = TagsBody)
    )
)]
pub async fn list_tags(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let tags = services::tag::list_all(&pool).await?;
    Ok(Json(TagsBody { tags }))
}
