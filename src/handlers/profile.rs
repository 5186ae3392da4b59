// src/handlers/profile.rs

use axum::{Extension, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, ErrorsResponse},
    extract::{Json, Path},
    models::profile::ProfileBody,
    services,
    utils::jwt::CurrentUser,
};

pub const PROFILE_TAG: &str = "profiles";

/// Public profile of `username`. `following` reflects the caller, if any.
#[utoipa::path(
    get,
    path = "/api/profiles/{username}",
    tag = PROFILE_TAG,
    params(("username" = String, Path, description = "Username of the profile")),
    responses(
        (status = 200, description = "Profile", body = ProfileBody),
        (status = 404, description = "No such user", body = ErrorsResponse)
    )
)]
pub async fn get_profile(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let profile = services::profile::view(&pool, current.id(), &username).await?;
    Ok(Json(ProfileBody { profile }))
}

#[utoipa::path(
    post,
    path = "/api/profiles/{username}/follow",
    tag = PROFILE_TAG,
    security(("token" = [])),
    params(("username" = String, Path, description = "User to follow")),
    responses(
        (status = 200, description = "Now following", body = ProfileBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 404, description = "No such user", body = ErrorsResponse),
        (status = 422, description = "Already following, or following oneself", body = ErrorsResponse)
    )
)]
pub async fn follow(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    let profile = services::profile::follow(&pool, auth.id, &username).await?;
    Ok(Json(ProfileBody { profile }))
}

#[utoipa::path(
    delete,
    path = "/api/profiles/{username}/follow",
    tag = PROFILE_TAG,
    security(("token" = [])),
    params(("username" = String, Path, description = "User to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = ProfileBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 404, description = "No such user", body = ErrorsResponse),
        (status = 422, description = "Not following", body = ErrorsResponse)
    )
)]
pub async fn unfollow(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    let profile = services::profile::unfollow(&pool, auth.id, &username).await?;
    Ok(Json(ProfileBody { profile }))
}
