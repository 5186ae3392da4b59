use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{profile::Profile, validate_not_blank};

/// A 'comments' row joined with its author and the viewer's `following` flag.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub author_bio: Option<String>,
    pub author_image: Option<String>,
    pub following: i64,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            body: row.body,
            author: Profile {
                username: row.author_username,
                bio: row.author_bio,
                image: row.author_image,
                following: row.following != 0,
            },
        }
    }
}

/// DTO for displaying a comment with author info.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub author: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentBody {
    pub comment: Comment,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommentsBody {
    pub comments: Vec<Comment>,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewComment {
    #[validate(
        length(max = 10000, message = "Comment must be at most 10000 characters"),
        custom(function = validate_not_blank)
    )]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewCommentRequest {
    #[validate(nested)]
    pub comment: NewComment,
}
