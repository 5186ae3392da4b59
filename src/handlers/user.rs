// src/handlers/user.rs

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, ErrorsResponse},
    extract::Json,
    models::{
        profile::ProfilesBody,
        user::{LoginRequest, NewUserRequest, UpdateUserRequest, User, UserBody, UserResponse},
    },
    services,
    utils::jwt::{CurrentUser, sign_jwt},
};

pub const USER_TAG: &str = "users";

fn user_body(user: User, config: &Config) -> Result<Json<UserBody>, AppError> {
    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;
    Ok(Json(UserBody {
        user: UserResponse::new(user, token),
    }))
}

/// Registers a new user.
///
/// Returns 201 Created with the user and a fresh token.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = USER_TAG,
    request_body = NewUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserBody),
        (status = 422, description = "Invalid payload, or email/username taken", body = ErrorsResponse)
    )
)]
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<NewUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = services::user::register(&pool, payload.user).await?;

    Ok((StatusCode::CREATED, user_body(user, &config)?))
}

/// Authenticates by email and password and returns a token.
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = USER_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserBody),
        (status = 401, description = "Invalid email or password", body = ErrorsResponse),
        (status = 422, description = "Invalid payload", body = ErrorsResponse)
    )
)]
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = services::user::login(&pool, &payload.user.email, &payload.user.password).await?;

    user_body(user, &config)
}

/// Lists every registered user's public profile.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All profiles", body = ProfilesBody)
    )
)]
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let profiles = services::user::list_profiles(&pool).await?;
    Ok(Json(ProfilesBody { profiles }))
}

/// Returns the authenticated user with a refreshed token.
#[utoipa::path(
    get,
    path = "/api/user",
    tag = USER_TAG,
    security(("token" = [])),
    responses(
        (status = 200, description = "Current user", body = UserBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse)
    )
)]
pub async fn current_user(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    let user = services::user::find_by_id(&pool, auth.id).await?;

    user_body(user, &config)
}

/// Updates the authenticated user. Absent fields keep their value.
#[utoipa::path(
    put,
    path = "/api/user",
    tag = USER_TAG,
    security(("token" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 422, description = "Invalid payload, or email/username taken", body = ErrorsResponse)
    )
)]
pub async fn update_user(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    payload.validate()?;

    let user = services::user::update(&pool, auth.id, payload.user).await?;

    user_body(user, &config)
}

/// Deletes the authenticated user's account along with everything they own.
#[utoipa::path(
    delete,
    path = "/api/user",
    tag = USER_TAG,
    security(("token" = [])),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not authenticated", body = ErrorsResponse)
    )
)]
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    services::user::delete(&pool, auth.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
