// src/services/comment.rs

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::comment::{Comment, CommentRow},
    services::user,
};

const SELECT_COMMENTS: &str = r#"
    SELECT
        c.id, c.body, c.created_at, c.updated_at, c.author_id,
        u.username AS author_username, u.bio AS author_bio, u.image AS author_image,
        EXISTS (SELECT 1 FROM follows fo WHERE fo.followee_id = c.author_id AND fo.follower_id = ?)
            AS following
    FROM comments c
    JOIN users u ON u.id = c.author_id
"#;

async fn article_id_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM articles WHERE slug = ?")
        .bind(slug)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existing article with given slug: {}", slug)))
}

/// Adds a comment by `author_id` to the article at `slug`.
pub async fn create(
    pool: &SqlitePool,
    author_id: i64,
    slug: &str,
    body: &str,
) -> Result<Comment, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("Body cannot be null or empty".to_string()));
    }

    let mut tx = pool.begin().await?;

    if user::fetch_by_id(&mut tx, author_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "No existing user with given id: {}",
            author_id
        )));
    }
    let article_id = article_id_by_slug(&mut tx, slug).await?;

    let now = Utc::now();
    let comment_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO comments (body, article_id, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(body)
    .bind(article_id)
    .bind(author_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let row = sqlx::query_as::<_, CommentRow>(&format!("{SELECT_COMMENTS} WHERE c.id = ?"))
        .bind(author_id)
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(comment_id, article_id, author_id, "comment added");
    Ok(row.into())
}

/// Comments on the article at `slug`, newest first.
pub async fn list_for_article(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    slug: &str,
) -> Result<Vec<Comment>, AppError> {
    let mut conn = pool.acquire().await?;
    let article_id = article_id_by_slug(&mut conn, slug).await?;

    let rows = sqlx::query_as::<_, CommentRow>(&format!(
        "{SELECT_COMMENTS} WHERE c.article_id = ? ORDER BY c.created_at DESC, c.id DESC"
    ))
    .bind(viewer_id)
    .bind(article_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

/// Deletes one comment. The comment must belong to the article at `slug` and
/// be written by `user_id`.
pub async fn delete(
    pool: &SqlitePool,
    user_id: i64,
    slug: &str,
    comment_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let article_id = article_id_by_slug(&mut tx, slug).await?;

    let (author_id, comment_article_id) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT author_id, article_id FROM comments WHERE id = ?",
    )
    .bind(comment_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Comment not found: {}", comment_id)))?;

    if comment_article_id != article_id {
        return Err(AppError::NotFound(format!(
            "Comment {} does not belong to article {}",
            comment_id, slug
        )));
    }
    if author_id != user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(comment_id, user_id, "comment deleted");
    Ok(())
}
