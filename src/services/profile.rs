// src/services/profile.rs
//
// The follow graph: `follows (follower_id, followee_id)` is a set of directed
// edges. Following is never reciprocated automatically.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::{profile::Profile, user::User},
    services::user::{fetch_by_id, fetch_by_username},
};

pub(crate) async fn is_following(
    conn: &mut SqliteConnection,
    follower_id: i64,
    followee_id: i64,
) -> Result<bool, sqlx::Error> {
    let edge = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM follows WHERE follower_id = ? AND followee_id = ?",
    )
    .bind(follower_id)
    .bind(followee_id)
    .fetch_optional(conn)
    .await?;

    Ok(edge.is_some())
}

async fn followee_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<User, AppError> {
    fetch_by_username(conn, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", username)))
}

async fn follower_by_id(conn: &mut SqliteConnection, id: i64) -> Result<User, AppError> {
    fetch_by_id(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with ID: {}", id)))
}

/// Profile of `username`; `following` is relative to `viewer_id` when present.
pub async fn view(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    username: &str,
) -> Result<Profile, AppError> {
    let mut conn = pool.acquire().await?;

    let user = fetch_by_username(&mut conn, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", username)))?;

    let following = match viewer_id {
        Some(viewer_id) => is_following(&mut conn, viewer_id, user.id).await?,
        None => false,
    };

    Ok(user.profile(following))
}

/// Adds the edge `follower -> followee`. Following twice is a validation error.
pub async fn follow(
    pool: &SqlitePool,
    follower_id: i64,
    followee_username: &str,
) -> Result<Profile, AppError> {
    let mut tx = pool.begin().await?;

    let followee = followee_by_username(&mut tx, followee_username).await?;
    let follower = follower_by_id(&mut tx, follower_id).await?;

    if follower.id == followee.id {
        return Err(AppError::Validation("You cannot follow yourself".to_string()));
    }
    if is_following(&mut tx, follower.id, followee.id).await? {
        return Err(AppError::Validation(
            "User is already following this followee".to_string(),
        ));
    }

    sqlx::query("INSERT INTO follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)")
        .bind(follower.id)
        .bind(followee.id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(follower_id, followee = %followee.username, "followed user");
    Ok(followee.profile(true))
}

/// Removes the edge `follower -> followee`. Unfollowing a user who is not
/// followed is a validation error.
pub async fn unfollow(
    pool: &SqlitePool,
    follower_id: i64,
    followee_username: &str,
) -> Result<Profile, AppError> {
    let mut tx = pool.begin().await?;

    let followee = followee_by_username(&mut tx, followee_username).await?;
    let follower = follower_by_id(&mut tx, follower_id).await?;

    if !is_following(&mut tx, follower.id, followee.id).await? {
        return Err(AppError::Validation(
            "User is not following this followee".to_string(),
        ));
    }

    sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
        .bind(follower.id)
        .bind(followee.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(follower_id, followee = %followee.username, "unfollowed user");
    Ok(followee.profile(false))
}
