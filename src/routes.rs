// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{article, comment, profile, tag, user},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Every `/api` route passes through `auth_middleware`, which resolves the
///   optional `CurrentUser`; handlers that need a login call `require()`.
/// * Applies global middleware (Trace, CORS).
/// * Serves the OpenAPI document and Swagger UI outside `/api`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let user_routes = Router::new()
        .route("/users", post(user::register).get(user::list_users))
        .route("/users/login", post(user::login))
        .route(
            "/user",
            get(user::current_user)
                .put(user::update_user)
                .delete(user::delete_user),
        );

    let profile_routes = Router::new()
        .route("/profiles/{username}", get(profile::get_profile))
        .route(
            "/profiles/{username}/follow",
            post(profile::follow).delete(profile::unfollow),
        );

    let article_routes = Router::new()
        .route(
            "/articles",
            get(article::list_articles).post(article::create_article),
        )
        .route("/articles/feed", get(article::feed))
        .route(
            "/articles/{slug}",
            get(article::get_article)
                .put(article::update_article)
                .delete(article::delete_article),
        )
        .route(
            "/articles/{slug}/favorite",
            post(article::favorite_article).delete(article::unfavorite_article),
        )
        .route(
            "/articles/{slug}/comments",
            get(comment::list_comments).post(comment::add_comment),
        )
        .route(
            "/articles/{slug}/comments/{id}",
            delete(comment::delete_comment),
        )
        .route("/tags", get(tag::list_tags));

    let api_routes = Router::new()
        .merge(user_routes)
        .merge(profile_routes)
        .merge(article_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
