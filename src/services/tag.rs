use std::collections::{BTreeSet, HashMap};

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::{error::AppError, models::tag::Tag};

/// All tag names, in creation order.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>("SELECT name FROM tags ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(names)
}

/// Trims the names, drops blanks and duplicates, then maps each name to its tag
/// row, inserting only the names that have no row yet.
pub(crate) async fn reconcile(
    conn: &mut SqliteConnection,
    names: &[String],
) -> Result<Vec<Tag>, sqlx::Error> {
    let names: BTreeSet<&str> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    let mut tags = Vec::with_capacity(names.len());
    for name in names {
        let existing = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        let tag = match existing {
            Some(tag) => tag,
            None => {
                tracing::debug!(tag = name, "creating tag");
                sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES (?) RETURNING id, name")
                    .bind(name)
                    .fetch_one(&mut *conn)
                    .await?
            }
        };
        tags.push(tag);
    }

    Ok(tags)
}

pub(crate) async fn attach(
    conn: &mut SqliteConnection,
    article_id: i64,
    tags: &[Tag],
) -> Result<(), sqlx::Error> {
    if tags.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT OR IGNORE INTO article_tags (article_id, tag_id) ");
    builder.push_values(tags, |mut row, tag| {
        row.push_bind(article_id).push_bind(tag.id);
    });
    builder.build().execute(conn).await?;

    Ok(())
}

/// Tag names per article id, each list sorted by name.
pub(crate) async fn names_for_articles(
    conn: &mut SqliteConnection,
    article_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
    let mut by_article: HashMap<i64, Vec<String>> = HashMap::new();
    if article_ids.is_empty() {
        return Ok(by_article);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT at.article_id, t.name FROM article_tags at \
         JOIN tags t ON t.id = at.tag_id \
         WHERE at.article_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in article_ids {
        ids.push_bind(*id);
    }
    builder.push(") ORDER BY t.name");

    let rows = builder
        .build_query_as::<(i64, String)>()
        .fetch_all(conn)
        .await?;

    for (article_id, name) in rows {
        by_article.entry(article_id).or_default().push(name);
    }

    Ok(by_article)
}
