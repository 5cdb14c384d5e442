//! Persists freshly fetched provider articles, skipping any URL already
//! stored. Each article is handled on its own: a bad record or a failed
//! write is recorded and the loop moves on.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::category::{GENERAL, category_from_source, specific_category};
use crate::models::NewArticle;
use crate::repositories::{ArticleRepository, InsertOutcome};
use crate::upstream::ProviderArticle;

/// Request-level values stamped onto every stored article.
#[derive(Debug, Clone)]
pub struct IngestContext {
    pub country: String,
    pub category: Option<String>,
    pub language: String,
    /// Guess a category from the source name when the request has none.
    pub category_hints: bool,
}

impl IngestContext {
    fn category_for(&self, article: &ProviderArticle) -> String {
        if let Some(category) = specific_category(self.category.as_deref()) {
            return category.to_string();
        }
        if self.category_hints {
            let name = article.source.as_ref().and_then(|s| s.name.as_deref());
            return category_from_source(name).to_string();
        }
        GENERAL.to_string()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("article has no URL")]
    MissingUrl,
    #[error("invalid publishedAt '{0}'")]
    InvalidPublishedAt(String),
    #[error("article has no publishedAt")]
    MissingPublishedAt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Inserted,
    Duplicate,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    pub url: Option<String>,
    pub outcome: IngestOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestSummary {
    pub items: Vec<ItemResult>,
}

impl IngestSummary {
    fn count(&self, wanted: fn(&IngestOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| wanted(&item.outcome)).count()
    }

    pub fn inserted(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Inserted))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Duplicate))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Failed(_)))
    }
}

/// Maps a provider article onto a storable record.
pub fn to_new_article(
    article: &ProviderArticle,
    context: &IngestContext,
    fetched_at: NaiveDateTime,
) -> Result<NewArticle, RecordError> {
    let url = article
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or(RecordError::MissingUrl)?;

    let published_at = article
        .published_at
        .as_deref()
        .ok_or(RecordError::MissingPublishedAt)?;
    let published_at = DateTime::parse_from_rfc3339(published_at)
        .map_err(|_| RecordError::InvalidPublishedAt(published_at.to_string()))?
        .naive_utc();

    let source = article.source.clone().unwrap_or_default();

    Ok(NewArticle {
        url: url.to_string(),
        title: article.title.clone().unwrap_or_default(),
        description: article.description.clone(),
        content: article.content.clone(),
        url_to_image: article.url_to_image.clone(),
        published_at,
        source_id: source.id,
        source_name: source.name,
        author: article.author.clone(),
        category: context.category_for(article),
        country: context.country.clone(),
        language: context.language.clone(),
        fetched_at,
    })
}

pub async fn ingest_articles<R: ArticleRepository>(
    repo: &R,
    articles: &[ProviderArticle],
    context: &IngestContext,
) -> IngestSummary {
    let mut summary = IngestSummary::default();

    for article in articles {
        let outcome = match to_new_article(article, context, Utc::now().naive_utc()) {
            Err(err) => {
                warn!(url = ?article.url, error = %err, "Skipping malformed article");
                IngestOutcome::Failed(err.to_string())
            }
            Ok(record) => match repo.insert_if_absent(&record).await {
                Ok(InsertOutcome::Inserted) => IngestOutcome::Inserted,
                Ok(InsertOutcome::AlreadyExists) => {
                    debug!(url = %record.url, "Article already stored");
                    IngestOutcome::Duplicate
                }
                Err(err) => {
                    warn!(url = %record.url, error = %err, "Failed to store article");
                    IngestOutcome::Failed(err.to_string())
                }
            },
        };

        summary.items.push(ItemResult {
            url: article.url.clone(),
            outcome,
        });
    }

    info!(
        country = %context.country,
        inserted = summary.inserted(),
        duplicates = summary.duplicates(),
        failed = summary.failed(),
        "Ingested provider articles"
    );

    summary
}
