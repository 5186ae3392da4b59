// src/handlers/article.rs

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::{AppError, ErrorsResponse},
    extract::{Json, Path, Query},
    models::article::{
        ArticleBody, ArticleFilter, ArticleListParams, FeedParams, MultipleArticlesBody,
        NewArticleRequest, Pagination, UpdateArticleRequest,
    },
    services,
    utils::jwt::CurrentUser,
};

pub const ARTICLE_TAG: &str = "articles";

/// Lists articles, newest first.
///
/// `tag`, `author` and `favorited` each narrow the result when present.
/// `articlesCount` is the number of matches across all pages.
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = ARTICLE_TAG,
    params(ArticleListParams),
    responses(
        (status = 200, description = "One page of articles", body = MultipleArticlesBody),
        (status = 422, description = "Invalid limit or offset", body = ErrorsResponse)
    )
)]
pub async fn list_articles(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ArticleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = Pagination::new(params.limit, params.offset)?;
    let filter = ArticleFilter::from(&params);

    let (articles, articles_count) =
        services::article::list(&pool, current.id(), filter, page).await?;

    Ok(Json(MultipleArticlesBody {
        articles,
        articles_count,
    }))
}

/// Articles by authors the caller follows, newest first.
#[utoipa::path(
    get,
    path = "/api/articles/feed",
    tag = ARTICLE_TAG,
    security(("token" = [])),
    params(FeedParams),
    responses(
        (status = 200, description = "One page of the feed", body = MultipleArticlesBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse)
    )
)]
pub async fn feed(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    let page = Pagination::new(params.limit, params.offset)?;

    let (articles, articles_count) = services::article::feed(&pool, auth.id, page).await?;

    Ok(Json(MultipleArticlesBody {
        articles,
        articles_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    tag = ARTICLE_TAG,
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "The article", body = ArticleBody),
        (status = 404, description = "No such article", body = ErrorsResponse)
    )
)]
pub async fn get_article(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let article = services::article::get(&pool, current.id(), &slug).await?;
    Ok(Json(ArticleBody { article }))
}

/// Creates an article. The slug is derived from the title.
#[utoipa::path(
    post,
    path = "/api/articles",
    tag = ARTICLE_TAG,
    security(("token" = [])),
    request_body = NewArticleRequest,
    responses(
        (status = 201, description = "Article created", body = ArticleBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 422, description = "Invalid payload or title taken", body = ErrorsResponse)
    )
)]
pub async fn create_article(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<NewArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    payload.validate()?;

    let article = services::article::create(&pool, auth.id, payload.article).await?;

    Ok((StatusCode::CREATED, Json(ArticleBody { article })))
}

/// Updates an article owned by the caller. A new title also changes the slug.
#[utoipa::path(
    put,
    path = "/api/articles/{slug}",
    tag = ARTICLE_TAG,
    security(("token" = [])),
    params(("slug" = String, Path, description = "Article slug")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ArticleBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 403, description = "Not the author", body = ErrorsResponse),
        (status = 404, description = "No such article", body = ErrorsResponse),
        (status = 422, description = "Invalid payload or title taken", body = ErrorsResponse)
    )
)]
pub async fn update_article(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    payload.validate()?;

    let article = services::article::update(&pool, auth.id, &slug, payload.article).await?;

    Ok(Json(ArticleBody { article }))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{slug}",
    tag = ARTICLE_TAG,
    security(("token" = [])),
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 403, description = "Not the author", body = ErrorsResponse),
        (status = 404, description = "No such article", body = ErrorsResponse)
    )
)]
pub async fn delete_article(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    services::article::delete(&pool, auth.id, &slug).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/articles/{slug}/favorite",
    tag = ARTICLE_TAG,
    security(("token" = [])),
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article favorited", body = ArticleBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 404, description = "No such article", body = ErrorsResponse),
        (status = 422, description = "Already favorited", body = ErrorsResponse)
    )
)]
pub async fn favorite_article(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    let article = services::article::favorite(&pool, auth.id, &slug).await?;
    Ok(Json(ArticleBody { article }))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{slug}/favorite",
    tag = ARTICLE_TAG,
    security(("token" = [])),
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article unfavorited", body = ArticleBody),
        (status = 401, description = "Not authenticated", body = ErrorsResponse),
        (status = 404, description = "No such article", body = ErrorsResponse),
        (status = 422, description = "Not favorited", body = ErrorsResponse)
    )
)]
pub async fn unfavorite_article(
    State(pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let auth = current.require()?;
    let article = services::article::unfavorite(&pool, auth.id, &slug).await?;
    Ok(Json(ArticleBody { article }))
}
