use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod newsapi;

pub use newsapi::NewsApiClient;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Filters forwarded to the provider's top-headlines endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlineRequest {
    pub country: String,
    pub category: Option<String>,
    pub language: Option<String>,
    pub source: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProviderSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// An article as the provider returns it. Everything is optional because
/// providers routinely null out fields of removed or partial stories.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderArticle {
    pub source: Option<ProviderSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headlines {
    pub articles: Vec<ProviderArticle>,
    pub total_results: u64,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("Invalid provider base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[async_trait]
pub trait NewsProvider: Send + Sync + 'static {
    /// Issues exactly one request. Implementations must not retry.
    async fn top_headlines(&self, request: &HeadlineRequest) -> Result<Headlines, ProviderError>;
}
