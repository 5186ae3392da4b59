// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, services, state::AppState};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Issued-at time as Unix timestamp.
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }
}

/// Signs a new JWT for the user.
///
/// Arguments:
/// * `id`: User ID, stored in the `sub` claim.
/// * `expiration_seconds`: token lifetime.
pub fn sign_jwt(id: i64, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize;

    let exp = usize::try_from(expiration_seconds)
        .ok()
        .and_then(|lifetime| now.checked_add(lifetime))
        .ok_or_else(|| {
            AppError::InternalServerError(format!(
                "token lifetime of {} seconds overflows",
                expiration_seconds
            ))
        })?;

    let claims = Claims {
        sub: id.to_string(),
        iat: now,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if the signature and expiry check out, otherwise an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Principal resolved from a valid token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

/// Request-scoped principal, `None` for anonymous requests.
/// Inserted into the request extensions by [`auth_middleware`] on every API route.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentUser(pub Option<AuthUser>);

impl CurrentUser {
    /// The authenticated principal, or 401 for anonymous requests.
    pub fn require(&self) -> Result<AuthUser, AppError> {
        self.0
            .ok_or_else(|| AppError::AuthError("Login required".to_string()))
    }

    /// Id of the viewer, if any. Used to compute `following` / `favorited` flags.
    pub fn id(&self) -> Option<i64> {
        self.0.map(|user| user.id)
    }
}

/// Extracts the token from `Authorization: Token <jwt>`.
/// `Bearer <jwt>` is accepted as well.
fn token_from_header(value: &str) -> Option<&str> {
    value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum Middleware: Authentication.
///
/// Without an `Authorization` header the request continues anonymously.
/// With one, the token must verify and its user must still exist, otherwise 401.
/// The outcome is injected as a `CurrentUser` extension; handlers that need a
/// principal call `CurrentUser::require`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let current = match auth_header {
        None => CurrentUser(None),
        Some(value) => {
            let token = token_from_header(value).ok_or_else(|| {
                AppError::AuthError("Authorization header must be 'Token <jwt>'".to_string())
            })?;
            let claims = verify_jwt(token, &state.config.jwt_secret)?;
            let id = claims.user_id()?;

            if !services::user::exists(&state.pool, id).await? {
                tracing::debug!(user_id = id, "token refers to a deleted user");
                return Err(AppError::AuthError("Invalid token".to_string()));
            }

            CurrentUser(Some(AuthUser { id }))
        }
    };

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn sign_then_verify() {
        let token = sign_jwt(42, SECRET, 600).unwrap();
        let claims = verify_jwt(&token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.exp, claims.iat + 600);
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        assert!(matches!(
            sign_jwt(42, SECRET, u64::MAX),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(42, SECRET, 600).unwrap();
        assert!(matches!(
            verify_jwt(&token, "another-secret"),
            Err(AppError::AuthError(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            sub: "7".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn header_prefixes() {
        assert_eq!(token_from_header("Token abc.def"), Some("abc.def"));
        assert_eq!(token_from_header("Bearer abc.def"), Some("abc.def"));
        assert_eq!(token_from_header("Token "), None);
        assert_eq!(token_from_header("abc.def"), None);
    }

    #[test]
    fn anonymous_principal_is_rejected_where_required() {
        assert!(CurrentUser(None).require().is_err());
        assert_eq!(CurrentUser(None).id(), None);

        let user = CurrentUser(Some(AuthUser { id: 3 }));
        assert_eq!(user.require().unwrap().id, 3);
        assert_eq!(user.id(), Some(3));
    }
}
