use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "newswire")]
#[command(about = "Browse top headlines cached by the Newswire service")]
struct Cli {
    /// Base URL for the Newswire service
    #[arg(long, default_value = "http://localhost:3000")]
    service_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Filters {
    /// Category, e.g. technology; "all" disables the filter
    #[arg(short, long)]
    category: Option<String>,
    /// Two-letter language code
    #[arg(short, long)]
    language: Option<String>,
    /// Provider source id, e.g. bbc-news
    #[arg(short, long)]
    source: Option<String>,
    /// Earliest publish time (RFC3339 or YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Latest publish time (RFC3339 or YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

impl Filters {
    fn query(&self) -> Vec<(&'static str, String)> {
        [
            ("category", &self.category),
            ("language", &self.language),
            ("source", &self.source),
            ("from", &self.from),
            ("to", &self.to),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|v| (name, v)))
        .collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch fresh headlines for a country and show the cached result
    Headlines {
        /// Two-letter country code
        country: String,
        #[command(flatten)]
        filters: Filters,
    },
    /// List previously saved articles without contacting the provider
    Saved {
        /// Two-letter country code
        #[arg(long)]
        country: Option<String>,
        /// Maximum number of articles
        #[arg(long)]
        limit: Option<u32>,
        #[command(flatten)]
        filters: Filters,
    },
}

#[derive(Deserialize)]
struct SourceRef {
    name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    url: String,
    title: String,
    published_at: String,
    source: SourceRef,
    category: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    total_results: usize,
    fresh_articles_saved: Option<usize>,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let base = Url::parse(&cli.service_url)?;

    let (endpoint, query) = match cli.command {
        Commands::Headlines { country, filters } => {
            (base.join(&format!("api/news/{country}"))?, filters.query())
        }
        Commands::Saved {
            country,
            limit,
            filters,
        } => {
            let mut query = filters.query();
            if let Some(country) = country {
                query.push(("country", country));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            (base.join("api/news/saved-news")?, query)
        }
    };

    fetch_and_print(&client, endpoint, &query).await
}

async fn fetch_and_print(
    client: &Client,
    endpoint: Url,
    query: &[(&'static str, String)],
) -> Result<(), Box<dyn Error>> {
    let response = client.get(endpoint).query(query).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<NewsResponse>(&text)
            .ok()
            .and_then(|body| body.error)
            .unwrap_or(text);
        return Err(format!("{status}: {message}").into());
    }

    let body: NewsResponse = serde_json::from_str(&text)?;

    for article in &body.articles {
        println!("{}", format_article(article));
    }

    match body.fresh_articles_saved {
        Some(fresh) => println!(
            "{} articles ({} newly saved)",
            body.total_results, fresh
        ),
        None => println!("{} articles", body.total_results),
    }

    Ok(())
}

fn format_article(article: &Article) -> String {
    let date = article.published_at.get(..10).unwrap_or(&article.published_at);
    let source = article.source.name.as_deref().unwrap_or("unknown source");
    format!(
        "{date}  [{}] {source}: {}\n            {}",
        article.category, article.title, article.url
    )
}
