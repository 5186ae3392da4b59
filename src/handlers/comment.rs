// src/handlers/comment.rs

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, ErrorsResponse},
    extract::{Json, Path},
    models::comment::{CommentBody, CommentsBody, NewCommentRequest},
    services,
    utils::jwt::CurrentUser,
};

pub const COMMENT_TAG: &str = "comments";

/// Comments on an article, newest first.
#[utoipa::path(
    get,
    path = "/api/articles/{slug}/comments",
    tag = COMMENT_TAG,
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Comments", body = CommentsBody),
        (status = 404, description = "No such article", body = ErrorsResponse)
    )
)]
pub async fn list_comments(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comments = services::comment::list_for_article(&pool, current.id(), &slug).await?;
    Ok(Json(CommentsBody { comments }))
}

#[utoipa::path(
    post,
    path = "/api/articles/{slug}/comments",
    tag = COMMENT_TAG,
    security(("token" = [])),
    params(("slug" = String, Path, description = "Article slug")),
    request_body = NewCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CommentBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 404, description = "No such article", body = ErrorsResponse),
        (status = 422, description = "Blank body", body = ErrorsResponse)
    )
)]
pub async fn add_comment(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
    Json(payload): Json<NewCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    payload.validate()?;

    let comment =
        services::comment::create(&pool, auth.id, &slug, &payload.comment.body).await?;

    Ok((StatusCode::CREATED, Json(CommentBody { comment })))
}

/// Deletes one of the caller's own comments.
#[utoipa::path(
    delete,
    path = "/api/articles/{slug}/comments/{id}",
    tag = COMMENT_TAG,
    security(("token" = [])),
    params(
        ("slug" = String, Path, description = "Article slug"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 403, description = "Not the comment's author", body = ErrorsResponse),
        (status = 404, description = "No such article or comment", body = ErrorsResponse)
    )
)]
pub async fn delete_comment(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path((slug, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    services::comment::delete(&pool, auth.id, &slug, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
