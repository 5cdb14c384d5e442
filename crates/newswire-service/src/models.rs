use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::articles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Article {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: NaiveDateTime,
    pub source_id: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub category: String,
    pub country: String,
    pub language: String,
    pub fetched_at: NaiveDateTime,
}

/// A record ready to be inserted. `fetched_at` is stamped here and never
/// touched again: stored articles are not updated in place.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::articles)]
pub struct NewArticle {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: NaiveDateTime,
    pub source_id: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub category: String,
    pub country: String,
    pub language: String,
    pub fetched_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Wire shape of a stored article, mirroring the provider's field names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: SourceRef,
    pub author: Option<String>,
    pub category: String,
    pub country: String,
    pub language: String,
    pub fetched_at: DateTime<Utc>,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        ArticleView {
            url: article.url,
            title: article.title,
            description: article.description,
            content: article.content,
            url_to_image: article.url_to_image,
            published_at: article.published_at.and_utc(),
            source: SourceRef {
                id: article.source_id,
                name: article.source_name,
            },
            author: article.author,
            category: article.category,
            country: article.country,
            language: article.language,
            fetched_at: article.fetched_at.and_utc(),
        }
    }
}
