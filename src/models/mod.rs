// src/models/mod.rs

pub mod article;
pub mod comment;
pub mod profile;
pub mod tag;
pub mod user;

use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
