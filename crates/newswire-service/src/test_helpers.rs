use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::MigrationHarness;

use crate::db::MIGRATIONS;
use crate::models::NewArticle;
use crate::upstream::{ProviderArticle, ProviderSource};

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    connection
        .run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    connection
}

/// A US/English/general record, ready to tweak field by field.
pub fn new_article(url: &str, published_at: NaiveDateTime) -> NewArticle {
    NewArticle {
        url: url.to_string(),
        title: format!("Title for {url}"),
        description: None,
        content: None,
        url_to_image: None,
        published_at,
        source_id: None,
        source_name: None,
        author: None,
        category: "general".to_string(),
        country: "us".to_string(),
        language: "en".to_string(),
        fetched_at: published_at,
    }
}

pub fn provider_article(url: &str, published_at: &str) -> ProviderArticle {
    ProviderArticle {
        source: Some(ProviderSource {
            id: None,
            name: Some("Example Wire".to_string()),
        }),
        author: Some("Reporter".to_string()),
        title: Some(format!("Headline for {url}")),
        description: Some("Summary".to_string()),
        url: Some(url.to_string()),
        url_to_image: None,
        published_at: Some(published_at.to_string()),
        content: Some("Body".to_string()),
    }
}

pub mod test_utils {
    use super::*;
    use crate::models::Article;
    use crate::schema::articles;

    pub fn count_articles(conn: &mut SqliteConnection) -> i64 {
        articles::table
            .count()
            .get_result(conn)
            .expect("Failed to count articles")
    }

    pub fn get_article_by_url(conn: &mut SqliteConnection, url: &str) -> Option<Article> {
        articles::table
            .filter(articles::url.eq(url))
            .select(Article::as_select())
            .first(conn)
            .optional()
            .expect("Failed to query article by URL")
    }

    pub fn insert_article(conn: &mut SqliteConnection, article: &NewArticle) {
        diesel::insert_into(articles::table)
            .values(article)
            .execute(conn)
            .expect("Failed to insert article");
    }
}
