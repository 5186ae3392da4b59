// src/services/user.rs

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::{
        profile::Profile,
        user::{NewUser, User, UserChanges},
    },
    utils::hash::{hash_password, verify_password},
};

const USER_COLUMNS: &str = "id, email, username, password, bio, image, created_at";

pub(crate) async fn fetch_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub(crate) async fn fetch_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(conn)
    .await
}

async fn fetch_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(conn)
        .await
}

/// Whether `column = value` is used by a user other than `except_id`.
async fn is_taken(
    conn: &mut SqliteConnection,
    column: &'static str,
    value: &str,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let taken = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM users WHERE {column} = ? AND (? IS NULL OR id != ?)"
    ))
    .bind(value)
    .bind(except_id)
    .bind(except_id)
    .fetch_one(conn)
    .await?;

    Ok(taken > 0)
}

pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<User, AppError> {
    let mut conn = pool.acquire().await?;

    fetch_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existing user with given id: {}", id)))
}

/// Registers a new user.
///
/// Email and username must both be unused. The password is stored as an Argon2 hash.
pub async fn register(pool: &SqlitePool, new_user: NewUser) -> Result<User, AppError> {
    let email = new_user.email.trim();
    let username = new_user.username.trim();

    if email.is_empty() {
        return Err(AppError::Validation("Email cannot be null or empty".to_string()));
    }
    if username.is_empty() {
        return Err(AppError::Validation("Username cannot be null or empty".to_string()));
    }

    let mut tx = pool.begin().await?;

    if is_taken(&mut tx, "email", email, None).await? {
        return Err(AppError::Validation("Email has already been taken".to_string()));
    }
    if is_taken(&mut tx, "username", username, None).await? {
        return Err(AppError::Validation("Username has already been taken".to_string()));
    }

    let hashed_password = hash_password(&new_user.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, username, password, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(email)
    .bind(username)
    .bind(&hashed_password)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to register user: {:?}", e);
        AppError::from(e)
    })?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Authenticates by email and password.
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<User, AppError> {
    let mut conn = pool.acquire().await?;

    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = fetch_by_email(&mut conn, email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, &user.password)? {
        tracing::debug!(user_id = user.id, "login rejected: wrong password");
        return Err(invalid());
    }

    Ok(user)
}

/// Applies a partial update to the user's account and profile.
pub async fn update(pool: &SqlitePool, id: i64, changes: UserChanges) -> Result<User, AppError> {
    let mut tx = pool.begin().await?;

    let existing = fetch_by_id(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No existing user with given id: {}", id)))?;

    let email = match changes.email.as_deref().map(str::trim) {
        Some(email) if email != existing.email => {
            if is_taken(&mut tx, "email", email, Some(id)).await? {
                return Err(AppError::Validation("Email has already been taken".to_string()));
            }
            email.to_string()
        }
        _ => existing.email,
    };

    let username = match changes.username.as_deref().map(str::trim) {
        Some(username) if username != existing.username => {
            if is_taken(&mut tx, "username", username, Some(id)).await? {
                return Err(AppError::Validation(
                    "Username has already been taken".to_string(),
                ));
            }
            username.to_string()
        }
        _ => existing.username,
    };

    let password = match changes.password {
        Some(password) => hash_password(&password)?,
        None => existing.password,
    };

    // An empty string clears an optional profile field; absence keeps it.
    let clearable = |change: Option<String>, current: Option<String>| match change {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value),
        None => current,
    };
    let bio = clearable(changes.bio, existing.bio);
    let image = clearable(changes.image, existing.image);

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET email = ?, username = ?, password = ?, bio = ?, image = ?
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&email)
    .bind(&username)
    .bind(&password)
    .bind(&bio)
    .bind(&image)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = id, "user updated");
    Ok(user)
}

/// Deletes the account. Articles, comments, follows and favorites cascade.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "No existing user with given id: {}",
            id
        )));
    }

    tracing::info!(user_id = id, "user deleted");
    Ok(())
}

/// Every user as an anonymous viewer sees them.
pub async fn list_profiles(pool: &SqlitePool) -> Result<Vec<Profile>, AppError> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(pool)
        .await?;

    Ok(users.iter().map(|user| user.profile(false)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;

    fn new_user(email: &str, username: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn register_rejects_taken_email_and_username() {
        let pool = test_support::pool().await;
        register(&pool, new_user("jake@jake.jake", "jake")).await.unwrap();

        let err = register(&pool, new_user("jake@jake.jake", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email has already been taken"));

        let err = register(&pool, new_user("other@jake.jake", "jake"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m == "Username has already been taken")
        );
    }

    #[tokio::test]
    async fn login_checks_password() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "jake").await;

        let logged_in = login(&pool, "jake@example.com", "password123").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            login(&pool, "jake@example.com", "wrong").await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            login(&pool, "nobody@example.com", "password123").await,
            Err(AppError::AuthError(_))
        ));
    }

    #[tokio::test]
    async fn update_changes_only_given_fields() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "jake").await;
        test_support::user(&pool, "celeb").await;

        let updated = update(
            &pool,
            user.id,
            UserChanges {
                bio: Some("I like to skateboard".into()),
                image: Some("https://i.stack.imgur.com/xHWG8.jpg".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("I like to skateboard"));
        assert_eq!(updated.email, "jake@example.com");
        assert_eq!(updated.password, user.password);

        let err = update(
            &pool,
            user.id,
            UserChanges {
                username: Some("celeb".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Re-submitting one's own username is not a conflict.
        update(
            &pool,
            user.id,
            UserChanges {
                username: Some("jake".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn empty_bio_and_image_clear_the_fields() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "jake").await;

        let changes = || UserChanges {
            bio: Some("I like to skateboard".into()),
            image: Some("https://i.stack.imgur.com/xHWG8.jpg".into()),
            ..Default::default()
        };
        update(&pool, user.id, changes()).await.unwrap();

        let kept = update(&pool, user.id, UserChanges::default()).await.unwrap();
        assert_eq!(kept.bio.as_deref(), Some("I like to skateboard"));

        let cleared = update(
            &pool,
            user.id,
            UserChanges {
                bio: Some(String::new()),
                image: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.bio, None);
        assert_eq!(cleared.image, None);
    }

    #[tokio::test]
    async fn new_password_is_rehashed() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "jake").await;

        update(
            &pool,
            user.id,
            UserChanges {
                password: Some("new-password".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(login(&pool, "jake@example.com", "password123").await.is_err());
        login(&pool, "jake@example.com", "new-password").await.unwrap();
    }

    #[tokio::test]
    async fn delete_requires_existing_user() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "jake").await;

        delete(&pool, user.id).await.unwrap();
        assert!(!exists(&pool, user.id).await.unwrap());
        assert!(matches!(
            delete(&pool, user.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
