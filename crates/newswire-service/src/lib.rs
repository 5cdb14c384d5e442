use axum::Router;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

pub mod category;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod shutdown;
pub mod upstream;
pub mod validation;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use repositories::{ArticleRepository, SqliteArticleRepository};
use upstream::{NewsApiClient, NewsProvider};

/// Everything a handler needs, handed in at router construction.
pub trait AppState: Clone + Send + Sync + 'static {
    type Articles: ArticleRepository;
    type Provider: NewsProvider;

    fn article_repo(&self) -> &Self::Articles;
    fn news_provider(&self) -> &Self::Provider;
    fn category_hints(&self) -> bool;
}

pub struct DefaultAppState<P = NewsApiClient> {
    articles: SqliteArticleRepository,
    provider: Arc<P>,
    category_hints: bool,
}

impl<P> Clone for DefaultAppState<P> {
    fn clone(&self) -> Self {
        Self {
            articles: self.articles.clone(),
            provider: Arc::clone(&self.provider),
            category_hints: self.category_hints,
        }
    }
}

impl<P: NewsProvider> DefaultAppState<P> {
    pub fn new(db: Arc<Mutex<SqliteConnection>>, provider: P) -> Self {
        Self {
            articles: SqliteArticleRepository::new(db),
            provider: Arc::new(provider),
            category_hints: false,
        }
    }

    pub fn with_category_hints(mut self, enabled: bool) -> Self {
        self.category_hints = enabled;
        self
    }
}

impl<P: NewsProvider> AppState for DefaultAppState<P> {
    type Articles = SqliteArticleRepository;
    type Provider = P;

    fn article_repo(&self) -> &Self::Articles {
        &self.articles
    }

    fn news_provider(&self) -> &Self::Provider {
        &self.provider
    }

    fn category_hints(&self) -> bool {
        self.category_hints
    }
}

pub fn create_app<S: AppState>(state: S) -> Router {
    routes::create_router().with_state(state)
}
