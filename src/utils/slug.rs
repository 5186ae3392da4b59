use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

// Whitespace is the ASCII set ` \t\n\x0B\f\r`; other Unicode spaces count as symbols.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9 \t\n\x0B\x0C\r-]").expect("static regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("static regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("static regex"));

/// Derives the URL slug of an article title.
///
/// Lowercases the trimmed title, drops everything except ASCII letters, digits,
/// whitespace and dashes, turns whitespace runs into a dash and collapses dash runs.
pub fn generate_slug(title: &str) -> Result<String, AppError> {
    // Only ASCII control characters and space are trimmed.
    let title = title.trim_matches(|c: char| c <= ' ');
    if title.is_empty() {
        return Err(AppError::Validation("Title cannot be null or empty".to_string()));
    }

    let lowered = title.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, "");
    let dashed = WHITESPACE.replace_all(&stripped, "-");
    let slug = DASHES.replace_all(&dashed, "-").into_owned();

    if slug.trim_matches('-').is_empty() {
        return Err(AppError::Validation(
            "Title must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}
