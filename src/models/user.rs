// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use utoipa::ToSchema;
use validator::Validate;

use super::{profile::Profile, validate_not_blank};

/// Represents the 'users' table in the database.
/// The public profile (username, bio, image) lives on the same row.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,

    /// Unique login email.
    pub email: String,

    /// Unique public handle.
    pub username: String,

    /// Argon2 password hash.
    pub password: String,

    pub bio: Option<String>,
    pub image: Option<String>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn profile(&self, following: bool) -> Profile {
        Profile {
            username: self.username.clone(),
            bio: self.bio.clone(),
            image: self.image.clone(),
            following,
        }
    }
}

/// Authenticated user as returned by the `/users` and `/user` endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl UserResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            email: user.email,
            token,
            username: user.username,
            bio: user.bio,
            image: user.image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserBody {
    pub user: UserResponse,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(
        length(max = 50, message = "Username must be at most 50 characters."),
        custom(function = validate_not_blank)
    )]
    pub username: String,
    #[validate(
        length(max = 128, message = "Password must be at most 128 characters."),
        custom(function = validate_not_blank)
    )]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewUserRequest {
    #[validate(nested)]
    pub user: NewUser,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUser {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(custom(function = validate_not_blank))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(nested)]
    pub user: LoginUser,
}

/// DTO for updating the current user. Fields are optional.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserChanges {
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(
        length(max = 50, message = "Username must be at most 50 characters."),
        custom(function = validate_not_blank)
    )]
    pub username: Option<String>,
    #[validate(
        length(max = 128, message = "Password must be at most 128 characters."),
        custom(function = validate_not_blank)
    )]
    pub password: Option<String>,
    pub bio: Option<String>,
    /// Absolute URL, or an empty string to clear the image.
    #[validate(custom(function = validate_image_url))]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(nested)]
    pub user: UserChanges,
}

/// Validates that a profile image is either empty or a correctly formatted URL.
fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    if url.len() > 500 {
        return Err(validator::ValidationError::new("url_too_long"));
    }
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_valid_email_and_non_blank_fields() {
        let ok = NewUser {
            email: "jake@jake.jake".into(),
            username: "jake".into(),
            password: "jakejake".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = NewUser {
            email: "jake".into(),
            ..ok
        };
        assert!(bad_email.validate().is_err());

        let blank_name = NewUser {
            email: "jake@jake.jake".into(),
            username: "   ".into(),
            password: "jakejake".into(),
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        assert!(UserChanges::default().validate().is_ok());

        let changes = UserChanges {
            image: Some("https://api.realworld.io/images/smiley-cyrus.jpg".into()),
            ..Default::default()
        };
        assert!(changes.validate().is_ok());

        let cleared = UserChanges {
            image: Some(String::new()),
            ..Default::default()
        };
        assert!(cleared.validate().is_ok());

        let bad = UserChanges {
            image: Some("not a url".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
