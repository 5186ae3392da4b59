// src/docs.rs

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{error::ErrorsResponse, handlers};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RealWorld Blog API",
        version = "1.0",
        description = "Users, profiles, articles, comments and tags"
    ),
    paths(
        handlers::user::register,
        handlers::user::login,
        handlers::user::list_users,
        handlers::user::current_user,
        handlers::user::update_user,
        handlers::user::delete_user,
        handlers::profile::get_profile,
        handlers::profile::follow,
        handlers::profile::unfollow,
        handlers::article::list_articles,
        handlers::article::feed,
        handlers::article::get_article,
        handlers::article::create_article,
        handlers::article::update_article,
        handlers::article::delete_article,
        handlers::article::favorite_article,
        handlers::article::unfavorite_article,
        handlers::comment::list_comments,
        handlers::comment::add_comment,
        handlers::comment::delete_comment,
        handlers::tag::list_tags,
    ),
    components(schemas(ErrorsResponse)),
    modifiers(&TokenSecurity),
    tags(
        (name = "users", description = "Registration, login and the current user"),
        (name = "profiles", description = "Profiles and the follow graph"),
        (name = "articles", description = "Articles, feed and favorites"),
        (name = "comments", description = "Comments on articles"),
        (name = "tags", description = "Tag listing")
    )
)]
pub struct ApiDoc;

/// Declares the `Authorization: Token <jwt>` header scheme referenced by
/// `security(("token" = []))` on protected paths.
struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <jwt>",
            ))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();

        assert_eq!(doc.info.title, "RealWorld Blog API");
        for path in [
            "/api/users",
            "/api/users/login",
            "/api/user",
            "/api/profiles/{username}/follow",
            "/api/articles/feed",
            "/api/articles/{slug}/favorite",
            "/api/articles/{slug}/comments/{id}",
            "/api/tags",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("token"));
    }
}
