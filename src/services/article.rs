// src/services/article.rs

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::article::{
        Article, ArticleChanges, ArticleFilter, ArticleRow, ArticleSummary, NewArticle,
        Pagination,
    },
    services::{tag, user},
    utils::slug::generate_slug,
};

/// The stored columns needed for ownership checks and partial updates.
#[derive(Debug, FromRow)]
struct ArticleRecord {
    id: i64,
    author_id: i64,
    title: String,
    description: String,
    body: String,
}

/// Which articles a listing covers.
#[derive(Debug, Clone)]
enum ArticleScope {
    /// Tag / author / favorited-by filters, AND-combined.
    Criteria(ArticleFilter),
    /// Articles written by anyone the user follows.
    Feed { follower_id: i64 },
}

/// `SELECT` over articles joined with their author, with the viewer-relative
/// `favorited` / `following` flags. An anonymous viewer binds NULL, which makes
/// both flags false.
fn select_articles<'a>(viewer_id: Option<i64>) -> QueryBuilder<'a, Sqlite> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT
            a.id, a.slug, a.title, a.description, a.body, a.created_at, a.updated_at,
            u.username AS author_username, u.bio AS author_bio, u.image AS author_image,
            (SELECT COUNT(*) FROM favorites f WHERE f.article_id = a.id) AS favorites_count,
            EXISTS (SELECT 1 FROM favorites f WHERE f.article_id = a.id AND f.user_id = "#,
    );
    builder.push_bind(viewer_id);
    builder.push(
        r#") AS favorited,
            EXISTS (SELECT 1 FROM follows fo WHERE fo.followee_id = a.author_id AND fo.follower_id = "#,
    );
    builder.push_bind(viewer_id);
    builder.push(
        r#") AS following
        FROM articles a
        JOIN users u ON u.id = a.author_id"#,
    );
    builder
}

/// Appends the `WHERE` clause for a scope. Absent criteria add nothing.
fn push_scope(builder: &mut QueryBuilder<'_, Sqlite>, scope: &ArticleScope) {
    builder.push(" WHERE 1 = 1");

    match scope {
        ArticleScope::Criteria(filter) => {
            if let Some(tag) = &filter.tag {
                builder
                    .push(
                        " AND EXISTS (SELECT 1 FROM article_tags at JOIN tags t ON t.id = at.tag_id \
                         WHERE at.article_id = a.id AND t.name = ",
                    )
                    .push_bind(tag.clone())
                    .push(")");
            }
            if let Some(author) = &filter.author {
                builder.push(" AND u.username = ").push_bind(author.clone());
            }
            if let Some(favorited_by) = &filter.favorited_by {
                builder
                    .push(
                        " AND EXISTS (SELECT 1 FROM favorites f JOIN users fu ON fu.id = f.user_id \
                         WHERE f.article_id = a.id AND fu.username = ",
                    )
                    .push_bind(favorited_by.clone())
                    .push(")");
            }
        }
        ArticleScope::Feed { follower_id } => {
            builder
                .push(
                    " AND a.author_id IN \
                     (SELECT fo.followee_id FROM follows fo WHERE fo.follower_id = ",
                )
                .push_bind(*follower_id)
                .push(")");
        }
    }
}

async fn with_tags(
    conn: &mut SqliteConnection,
    rows: Vec<ArticleRow>,
) -> Result<Vec<Article>, sqlx::Error> {
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut tags = tag::names_for_articles(conn, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let tag_list = tags.remove(&row.id).unwrap_or_default();
            row.into_article(tag_list)
        })
        .collect())
}

/// One page of articles in `scope`, newest first, plus the total match count.
async fn query_page(
    conn: &mut SqliteConnection,
    viewer_id: Option<i64>,
    scope: &ArticleScope,
    page: Pagination,
) -> Result<(Vec<ArticleSummary>, i64), sqlx::Error> {
    let mut count: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM articles a JOIN users u ON u.id = a.author_id");
    push_scope(&mut count, scope);
    let total = count
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    let mut select = select_articles(viewer_id);
    push_scope(&mut select, scope);
    select
        .push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.page_start());

    let rows = select
        .build_query_as::<ArticleRow>()
        .fetch_all(&mut *conn)
        .await?;

    let articles = with_tags(conn, rows)
        .await?
        .into_iter()
        .map(ArticleSummary::from)
        .collect();

    Ok((articles, total))
}

async fn load(
    conn: &mut SqliteConnection,
    viewer_id: Option<i64>,
    slug: &str,
) -> Result<Option<Article>, sqlx::Error> {
    let mut select = select_articles(viewer_id);
    select.push(" WHERE a.slug = ").push_bind(slug.to_string());

    let Some(row) = select
        .build_query_as::<ArticleRow>()
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    Ok(with_tags(conn, vec![row]).await?.pop())
}

async fn record_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<ArticleRecord, AppError> {
    sqlx::query_as::<_, ArticleRecord>(
        "SELECT id, author_id, title, description, body FROM articles WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| not_found(slug))
}

/// Whether another article already uses this title or slug.
async fn title_taken(
    conn: &mut SqliteConnection,
    title: &str,
    slug: &str,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let clashes = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM articles WHERE (title = ? OR slug = ?) AND (? IS NULL OR id != ?)",
    )
    .bind(title)
    .bind(slug)
    .bind(except_id)
    .bind(except_id)
    .fetch_one(conn)
    .await?;

    Ok(clashes > 0)
}

fn not_found(slug: &str) -> AppError {
    AppError::NotFound(format!("No existing article with given slug: {}", slug))
}

fn require_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be null or empty", field)));
    }
    Ok(())
}

/// Criteria listing. Each filter that is present narrows the result.
pub async fn list(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    filter: ArticleFilter,
    page: Pagination,
) -> Result<(Vec<ArticleSummary>, i64), AppError> {
    let mut conn = pool.acquire().await?;
    Ok(query_page(&mut conn, viewer_id, &ArticleScope::Criteria(filter), page).await?)
}

/// Articles written by the users `user_id` follows.
pub async fn feed(
    pool: &SqlitePool,
    user_id: i64,
    page: Pagination,
) -> Result<(Vec<ArticleSummary>, i64), AppError> {
    let mut conn = pool.acquire().await?;
    let scope = ArticleScope::Feed {
        follower_id: user_id,
    };
    Ok(query_page(&mut conn, Some(user_id), &scope, page).await?)
}

pub async fn get(
    pool: &SqlitePool,
    viewer_id: Option<i64>,
    slug: &str,
) -> Result<Article, AppError> {
    if slug.trim().is_empty() {
        return Err(AppError::Validation("Slug cannot be null or empty".to_string()));
    }

    let mut conn = pool.acquire().await?;
    load(&mut conn, viewer_id, slug)
        .await?
        .ok_or_else(|| not_found(slug))
}

/// Creates an article and links its tags, reusing existing tag rows.
pub async fn create(
    pool: &SqlitePool,
    author_id: i64,
    new_article: NewArticle,
) -> Result<Article, AppError> {
    require_text(&new_article.title, "Title")?;
    require_text(&new_article.description, "Description")?;
    require_text(&new_article.body, "Body")?;

    let title = new_article.title.trim();
    let slug = generate_slug(title)?;

    let mut tx = pool.begin().await?;

    if user::fetch_by_id(&mut tx, author_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "No existing user with given id: {}",
            author_id
        )));
    }
    if title_taken(&mut tx, title, &slug, None).await? {
        return Err(AppError::Validation(
            "Article title has already been taken".to_string(),
        ));
    }

    let now = Utc::now();
    let article_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO articles (slug, title, description, body, author_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&slug)
    .bind(title)
    .bind(&new_article.description)
    .bind(&new_article.body)
    .bind(author_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create article: {:?}", e);
        AppError::from(e)
    })?;

    let tags = tag::reconcile(&mut tx, &new_article.tag_list).await?;
    tag::attach(&mut tx, article_id, &tags).await?;

    let article = load(&mut tx, Some(author_id), &slug)
        .await?
        .ok_or_else(|| AppError::InternalServerError("created article vanished".to_string()))?;

    tx.commit().await?;

    tracing::info!(article_id, author_id, slug = %article.slug, "article created");
    Ok(article)
}

/// Applies the non-blank fields of `changes`. A new title regenerates the slug.
/// Only the author may update.
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    slug: &str,
    changes: ArticleChanges,
) -> Result<Article, AppError> {
    let mut tx = pool.begin().await?;

    let record = record_by_slug(&mut tx, slug).await?;
    if record.author_id != user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let (title, new_slug) = match non_blank(changes.title) {
        Some(title) => {
            let title = title.trim().to_string();
            let new_slug = generate_slug(&title)?;
            if title_taken(&mut tx, &title, &new_slug, Some(record.id)).await? {
                return Err(AppError::Validation(
                    "Article title has already been taken".to_string(),
                ));
            }
            (title, new_slug)
        }
        None => (record.title, slug.to_string()),
    };
    let description = non_blank(changes.description).unwrap_or(record.description);
    let body = non_blank(changes.body).unwrap_or(record.body);

    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, slug = ?, description = ?, body = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&title)
    .bind(&new_slug)
    .bind(&description)
    .bind(&body)
    .bind(Utc::now())
    .bind(record.id)
    .execute(&mut *tx)
    .await?;

    let article = load(&mut tx, Some(user_id), &new_slug)
        .await?
        .ok_or_else(|| not_found(&new_slug))?;

    tx.commit().await?;

    tracing::info!(article_id = record.id, slug = %new_slug, "article updated");
    Ok(article)
}

/// Deletes the article; its comments, favorites and tag links cascade.
/// Only the author may delete.
pub async fn delete(pool: &SqlitePool, user_id: i64, slug: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let record = record_by_slug(&mut tx, slug).await?;
    if record.author_id != user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(article_id = record.id, slug, "article deleted");
    Ok(())
}

async fn has_favorited(
    conn: &mut SqliteConnection,
    user_id: i64,
    article_id: i64,
) -> Result<bool, sqlx::Error> {
    let found =
        sqlx::query_scalar::<_, i64>("SELECT 1 FROM favorites WHERE user_id = ? AND article_id = ?")
            .bind(user_id)
            .bind(article_id)
            .fetch_optional(conn)
            .await?;

    Ok(found.is_some())
}

async fn require_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), AppError> {
    user::fetch_by_id(conn, user_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("No existing user with given id: {}", user_id)))
}

/// Adds the user to the article's favoriting set. Favoriting twice is a
/// validation error.
pub async fn favorite(pool: &SqlitePool, user_id: i64, slug: &str) -> Result<Article, AppError> {
    let mut tx = pool.begin().await?;

    require_user(&mut tx, user_id).await?;
    let record = record_by_slug(&mut tx, slug).await?;

    if has_favorited(&mut tx, user_id, record.id).await? {
        return Err(AppError::Validation(
            "User has already favorited this article".to_string(),
        ));
    }

    sqlx::query("INSERT INTO favorites (user_id, article_id, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(record.id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

    let article = load(&mut tx, Some(user_id), slug)
        .await?
        .ok_or_else(|| not_found(slug))?;

    tx.commit().await?;

    tracing::info!(user_id, slug, "article favorited");
    Ok(article)
}

/// Removes the user from the article's favoriting set. Unfavoriting an article
/// that is not favorited is a validation error.
pub async fn unfavorite(pool: &SqlitePool, user_id: i64, slug: &str) -> Result<Article, AppError> {
    let mut tx = pool.begin().await?;

    require_user(&mut tx, user_id).await?;
    let record = record_by_slug(&mut tx, slug).await?;

    if !has_favorited(&mut tx, user_id, record.id).await? {
        return Err(AppError::Validation(
            "User has not favorited this article".to_string(),
        ));
    }

    sqlx::query("DELETE FROM favorites WHERE user_id = ? AND article_id = ?")
        .bind(user_id)
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

    let article = load(&mut tx, Some(user_id), slug)
        .await?
        .ok_or_else(|| not_found(slug))?;

    tx.commit().await?;

    tracing::info!(user_id, slug, "article unfavorited");
    Ok(article)
}
