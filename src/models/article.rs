// src/models/article.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{profile::Profile, validate_not_blank};
use crate::error::AppError;

/// An 'articles' row joined with its author and the viewer-relative flags.
///
/// `favorited` and `following` come back from SQLite `EXISTS` as integers.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_username: String,
    pub author_bio: Option<String>,
    pub author_image: Option<String>,
    pub favorites_count: i64,
    pub favorited: i64,
    pub following: i64,
}

impl ArticleRow {
    pub fn into_article(self, tag_list: Vec<String>) -> Article {
        Article {
            slug: self.slug,
            title: self.title,
            description: self.description,
            body: self.body,
            tag_list,
            created_at: self.created_at,
            updated_at: self.updated_at,
            favorited: self.favorited != 0,
            favorites_count: self.favorites_count,
            author: Profile {
                username: self.author_username,
                bio: self.author_bio,
                image: self.author_image,
                following: self.following != 0,
            },
        }
    }
}

/// Full article representation, returned by the single-article endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: i64,
    pub author: Profile,
}

/// List-view article: everything but the body.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: i64,
    pub author: Profile,
}

impl From<Article> for ArticleSummary {
    fn from(article: Article) -> Self {
        Self {
            slug: article.slug,
            title: article.title,
            description: article.description,
            tag_list: article.tag_list,
            created_at: article.created_at,
            updated_at: article.updated_at,
            favorited: article.favorited,
            favorites_count: article.favorites_count,
            author: article.author,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleBody {
    pub article: Article,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleArticlesBody {
    pub articles: Vec<ArticleSummary>,
    /// Total number of matches across all pages.
    pub articles_count: i64,
}

/// DTO for creating a new article.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[validate(
        length(max = 200, message = "Title must be at most 200 characters"),
        custom(function = validate_not_blank)
    )]
    pub title: String,

    #[validate(custom(function = validate_not_blank))]
    pub description: String,

    #[validate(custom(function = validate_not_blank))]
    pub body: String,

    #[serde(default)]
    pub tag_list: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewArticleRequest {
    #[validate(nested)]
    pub article: NewArticle,
}

/// DTO for updating an article. Absent or blank fields keep their old value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ArticleChanges {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateArticleRequest {
    #[validate(nested)]
    pub article: ArticleChanges,
}

/// Query parameters for `GET /api/articles`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArticleListParams {
    /// Only articles carrying this tag.
    pub tag: Option<String>,
    /// Only articles written by this username.
    pub author: Option<String>,
    /// Only articles favorited by this username.
    pub favorited: Option<String>,
    /// Page size (default 20, max 100).
    pub limit: Option<i64>,
    /// Number of items to skip (default 0).
    pub offset: Option<i64>,
}

/// Query parameters for `GET /api/articles/feed`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// AND-combined article filters. `None` means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited_by: Option<String>,
}

impl From<&ArticleListParams> for ArticleFilter {
    /// Blank query values (`?tag=`) are treated as absent.
    fn from(params: &ArticleListParams) -> Self {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            tag: present(&params.tag),
            author: present(&params.author),
            favorited_by: present(&params.favorited),
        }
    }
}

/// Limit/offset translated into page-number/page-size.
///
/// The requested offset is rounded down to a page boundary: with `limit = 10`,
/// `offset = 15` reads page 1, i.e. rows 10..20.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, AppError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);

        if limit < 1 {
            return Err(AppError::Validation("limit must be at least 1".to_string()));
        }
        if offset < 0 {
            return Err(AppError::Validation("offset must not be negative".to_string()));
        }

        Ok(Self {
            limit: limit.min(Self::MAX_LIMIT),
            offset,
        })
    }

    pub fn page(&self) -> i64 {
        self.offset / self.limit
    }

    /// Row offset of the first item on the page.
    pub fn page_start(&self) -> i64 {
        self.page() * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let page = Pagination::new(None, None).unwrap();
        assert_eq!(page, Pagination::default());
        assert_eq!(page.page(), 0);
        assert_eq!(page.page_start(), 0);
    }

    #[test]
    fn offset_rounds_down_to_page_boundary() {
        let page = Pagination::new(Some(10), Some(15)).unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.page_start(), 10);

        let page = Pagination::new(Some(5), Some(20)).unwrap();
        assert_eq!(page.page(), 4);
        assert_eq!(page.page_start(), 20);
    }

    #[test]
    fn invalid_values_are_rejected_and_limit_is_capped() {
        assert!(Pagination::new(Some(0), None).is_err());
        assert!(Pagination::new(Some(10), Some(-1)).is_err());
        assert_eq!(
            Pagination::new(Some(1000), None).unwrap().limit,
            Pagination::MAX_LIMIT
        );
    }

    #[test]
    fn blank_filters_are_absent() {
        let params = ArticleListParams {
            tag: Some("  ".into()),
            author: Some(" jake ".into()),
            favorited: None,
            ..Default::default()
        };
        let filter = ArticleFilter::from(&params);
        assert_eq!(filter.tag, None);
        assert_eq!(filter.author.as_deref(), Some("jake"));
        assert_eq!(filter.favorited_by, None);
    }

    #[test]
    fn summary_serialization_has_no_body() {
        let article = Article {
            slug: "how-to-train-your-dragon".into(),
            title: "How to train your dragon".into(),
            description: "Ever wonder how?".into(),
            body: "You have to believe".into(),
            tag_list: vec!["dragons".into(), "training".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            favorited: false,
            favorites_count: 0,
            author: Profile {
                username: "jake".into(),
                bio: None,
                image: None,
                following: false,
            },
        };

        let full = serde_json::to_value(&article).unwrap();
        assert_eq!(full["body"], "You have to believe");
        assert_eq!(full["tagList"][0], "dragons");
        assert_eq!(full["favoritesCount"], 0);

        let summary = serde_json::to_value(ArticleSummary::from(article)).unwrap();
        assert!(summary.get("body").is_none());
        assert_eq!(summary["slug"], "how-to-train-your-dragon");
    }
}
