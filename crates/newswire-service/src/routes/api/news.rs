use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ApiError;
use crate::ingest::{IngestContext, ingest_articles};
use crate::models::ArticleView;
use crate::repositories::{ArticleFilter, ArticleRepository};
use crate::upstream::{DEFAULT_LANGUAGE, HeadlineRequest, NewsProvider};
use crate::validation::{parse_date_range, parse_limit, validate_country, validate_language};
use crate::AppState;

/// Stored articles returned by the country route after each ingest.
pub const COUNTRY_RESULT_LIMIT: u32 = 100;
pub const DEFAULT_SAVED_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
struct CountryNewsQuery {
    category: Option<String>,
    language: Option<String>,
    source: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountryNewsResponse {
    success: bool,
    articles: Vec<ArticleView>,
    total_results: usize,
    source: &'static str,
    fresh_articles_saved: usize,
    duplicates_skipped: usize,
    failed_articles: usize,
}

#[derive(Debug, Deserialize)]
struct SavedNewsQuery {
    category: Option<String>,
    country: Option<String>,
    language: Option<String>,
    source: Option<String>,
    from: Option<String>,
    to: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedNewsResponse {
    success: bool,
    articles: Vec<ArticleView>,
    total_results: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[instrument(skip_all, fields(country = %country, category = ?query.category, language = ?query.language))]
async fn country_news<S: AppState>(
    State(state): State<S>,
    Path(country): Path<String>,
    Query(query): Query<CountryNewsQuery>,
) -> Result<ResponseJson<CountryNewsResponse>, ApiError> {
    debug!("Processing country news request");

    let country = validate_country(&country)?;
    let language = match non_blank(query.language) {
        Some(language) => validate_language(&language)?,
        None => DEFAULT_LANGUAGE.to_string(),
    };
    let range = parse_date_range(query.from.as_deref(), query.to.as_deref())?;
    let category = non_blank(query.category);
    let source = non_blank(query.source);

    let request = HeadlineRequest {
        country: country.clone(),
        category: category.clone(),
        language: Some(language.clone()),
        source: source.clone(),
        from: non_blank(query.from),
        to: non_blank(query.to),
    };
    let headlines = state.news_provider().top_headlines(&request).await?;
    debug!(
        received = headlines.articles.len(),
        provider_total = headlines.total_results,
        "Fetched headlines from provider"
    );

    let context = IngestContext {
        country: country.clone(),
        category: category.clone(),
        language: language.clone(),
        category_hints: state.category_hints(),
    };
    let summary = ingest_articles(state.article_repo(), &headlines.articles, &context).await;

    let filter = ArticleFilter {
        country: Some(country),
        category,
        language: Some(language),
        source,
        from: range.from,
        to: range.to,
        limit: COUNTRY_RESULT_LIMIT,
    };
    let articles: Vec<ArticleView> = state
        .article_repo()
        .list(&filter)
        .await?
        .into_iter()
        .map(ArticleView::from)
        .collect();

    info!(
        returned_count = articles.len(),
        fresh = summary.inserted(),
        "Served country news from database"
    );

    Ok(ResponseJson(CountryNewsResponse {
        success: true,
        total_results: articles.len(),
        articles,
        source: "database",
        fresh_articles_saved: summary.inserted(),
        duplicates_skipped: summary.duplicates(),
        failed_articles: summary.failed(),
    }))
}

#[instrument(skip_all, fields(country = ?query.country, category = ?query.category, limit = ?query.limit))]
async fn saved_news<S: AppState>(
    State(state): State<S>,
    Query(query): Query<SavedNewsQuery>,
) -> Result<ResponseJson<SavedNewsResponse>, ApiError> {
    debug!("Processing saved news request");

    let country = non_blank(query.country)
        .map(|c| validate_country(&c))
        .transpose()?;
    let language = non_blank(query.language)
        .map(|l| validate_language(&l))
        .transpose()?;
    let range = parse_date_range(query.from.as_deref(), query.to.as_deref())?;
    let limit = parse_limit(query.limit.as_deref(), DEFAULT_SAVED_LIMIT);

    let filter = ArticleFilter {
        country,
        category: non_blank(query.category),
        language,
        source: non_blank(query.source),
        from: range.from,
        to: range.to,
        limit,
    };
    let articles: Vec<ArticleView> = state
        .article_repo()
        .list(&filter)
        .await?
        .into_iter()
        .map(ArticleView::from)
        .collect();

    info!(returned_count = articles.len(), "Retrieved saved news");

    Ok(ResponseJson(SavedNewsResponse {
        success: true,
        total_results: articles.len(),
        articles,
    }))
}

pub fn create_news_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/saved-news", get(saved_news::<S>))
        .route("/{country}", get(country_news::<S>))
}
