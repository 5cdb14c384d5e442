use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};
use url::Url;

use super::{DEFAULT_LANGUAGE, HeadlineRequest, Headlines, NewsProvider, ProviderArticle, ProviderError};
use crate::category::specific_category;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch news";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopHeadlinesResponse {
    status: Option<String>,
    total_results: Option<u64>,
    articles: Option<Vec<ProviderArticle>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for a NewsAPI-compatible `top-headlines` endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl NewsApiClient {
    /// A missing `api_key` is allowed here; every fetch then fails with
    /// [`ProviderError::MissingApiKey`] before touching the network.
    pub fn new(base_url: Url, api_key: Option<String>) -> Result<Self, ProviderError> {
        let mut endpoint = base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| ProviderError::InvalidBaseUrl(base_url.to_string()))?
            .pop_if_empty()
            .push("top-headlines");

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Query parameters for one top-headlines call, excluding the API key.
pub fn query_params(request: &HeadlineRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![("country", request.country.clone())];

    if let Some(category) = specific_category(request.category.as_deref()) {
        params.push(("category", category.to_string()));
    }

    let language = request
        .language
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    params.push(("language", language.to_string()));

    let optional = [
        ("sources", &request.source),
        ("from", &request.from),
        ("to", &request.to),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            params.push((name, value.to_string()));
        }
    }

    params
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    #[instrument(skip_all, fields(country = %request.country))]
    async fn top_headlines(&self, request: &HeadlineRequest) -> Result<Headlines, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;

        let mut params = query_params(request);
        debug!(?params, "Requesting top headlines");
        params.push(("apiKey", api_key.to_string()));

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
            error!(status = status.as_u16(), message = %message, "Provider returned an error");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: TopHeadlinesResponse = response.json().await?;

        if body.status.as_deref() == Some("error") {
            let message = body
                .message
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
            error!(message = %message, "Provider reported an error with a success status");
            return Err(ProviderError::Upstream {
                status: http::StatusCode::BAD_GATEWAY.as_u16(),
                message,
            });
        }

        let articles = body.articles.unwrap_or_default();
        debug!(count = articles.len(), "Received top headlines");

        Ok(Headlines {
            total_results: body.total_results.unwrap_or(articles.len() as u64),
            articles,
        })
    }
}
