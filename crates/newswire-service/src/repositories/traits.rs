use crate::errors::ApiError;
use crate::models::{Article, NewArticle};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Conjunctive filter over stored articles. `None` fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub country: Option<String>,
    /// `"all"` is treated like `None`.
    pub category: Option<String>,
    pub language: Option<String>,
    /// Matched against the stored source id.
    pub source: Option<String>,
    /// Inclusive.
    pub from: Option<NaiveDateTime>,
    /// Inclusive.
    pub to: Option<NaiveDateTime>,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

#[async_trait]
pub trait ArticleRepository: Clone + Send + Sync + 'static {
    /// Inserts unless an article with the same URL is stored. Never
    /// overwrites an existing row.
    async fn insert_if_absent(&self, article: &NewArticle) -> Result<InsertOutcome, ApiError>;
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, ApiError>;
    /// Newest `published_at` first, at most `filter.limit` rows.
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ApiError>;
}
