use super::traits::{ArticleFilter, ArticleRepository, InsertOutcome};
use crate::category::specific_category;
use crate::errors::ApiError;
use crate::models::{Article, NewArticle};
use crate::schema::articles;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct SqliteArticleRepository {
    db: Arc<Mutex<SqliteConnection>>,
}

impl SqliteArticleRepository {
    pub fn new(db: Arc<Mutex<SqliteConnection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> Result<MutexGuard<'_, SqliteConnection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn insert_if_absent(&self, article: &NewArticle) -> Result<InsertOutcome, ApiError> {
        let mut conn = self.conn()?;
        let affected = diesel::insert_into(articles::table)
            .values(article)
            .on_conflict_do_nothing()
            .execute(&mut *conn)?;

        Ok(if affected == 0 {
            InsertOutcome::AlreadyExists
        } else {
            InsertOutcome::Inserted
        })
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, ApiError> {
        let mut conn = self.conn()?;
        let result = articles::table
            .filter(articles::url.eq(url))
            .select(Article::as_select())
            .first(&mut *conn)
            .optional()?;
        Ok(result)
    }

    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ApiError> {
        let mut query = articles::table.select(Article::as_select()).into_boxed();

        if let Some(country) = filter.country.as_deref() {
            query = query.filter(articles::country.eq(country));
        }
        if let Some(category) = specific_category(filter.category.as_deref()) {
            query = query.filter(articles::category.eq(category));
        }
        if let Some(language) = filter.language.as_deref() {
            query = query.filter(articles::language.eq(language));
        }
        if let Some(source) = filter.source.as_deref() {
            query = query.filter(articles::source_id.eq(source));
        }
        if let Some(from) = filter.from {
            query = query.filter(articles::published_at.ge(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(articles::published_at.le(to));
        }

        let mut conn = self.conn()?;
        let items = query
            .order((articles::published_at.desc(), articles::id.desc()))
            .limit(i64::from(filter.limit))
            .load(&mut *conn)?;

        Ok(items)
    }
}
