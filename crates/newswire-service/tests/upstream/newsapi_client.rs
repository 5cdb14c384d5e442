use crate::common::server_utils::create_test_server;
use anyhow::Result;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use newswire_service::upstream::{HeadlineRequest, NewsApiClient, NewsProvider, ProviderError};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

#[derive(Clone)]
struct FakeProvider {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

async fn top_headlines(
    State(fake): State<FakeProvider>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    fake.seen.lock().unwrap().push(params);
    (
        fake.status,
        [("content-type", "application/json")],
        fake.body.clone(),
    )
        .into_response()
}

/// Serves `body` with `status` at `/v2/top-headlines` on an ephemeral port.
async fn spawn_fake_provider(
    status: StatusCode,
    body: impl Into<String>,
) -> Result<(Url, Arc<Mutex<Vec<HashMap<String, String>>>>)> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeProvider {
        status,
        body: body.into(),
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v2/top-headlines", get(top_headlines))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok((Url::parse(&format!("http://{addr}/v2"))?, seen))
}

fn request(country: &str) -> HeadlineRequest {
    HeadlineRequest {
        country: country.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_successful_fetch_parses_articles() -> Result<()> {
    let body = json!({
        "status": "ok",
        "totalResults": 37,
        "articles": [{
            "source": { "id": "bbc-news", "name": "BBC News" },
            "author": null,
            "title": "Headline",
            "description": "Desc",
            "url": "https://example.com/story",
            "urlToImage": "https://example.com/story.jpg",
            "publishedAt": "2024-01-01T10:00:00Z",
            "content": null
        }]
    });
    let (base_url, seen) = spawn_fake_provider(StatusCode::OK, body.to_string()).await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;

    let mut req = request("gb");
    req.category = Some("all".to_string());
    let headlines = client.top_headlines(&req).await?;

    assert_eq!(headlines.total_results, 37);
    assert_eq!(headlines.articles.len(), 1);
    let article = &headlines.articles[0];
    assert_eq!(article.url.as_deref(), Some("https://example.com/story"));
    assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/story.jpg"));
    assert_eq!(
        article.source.as_ref().and_then(|s| s.id.as_deref()),
        Some("bbc-news")
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let params = &seen[0];
    assert_eq!(params.get("apiKey").map(String::as_str), Some("secret"));
    assert_eq!(params.get("country").map(String::as_str), Some("gb"));
    assert_eq!(params.get("language").map(String::as_str), Some("en"));
    assert!(!params.contains_key("category"));
    Ok(())
}

#[tokio::test]
async fn test_null_articles_is_empty_list() -> Result<()> {
    let (base_url, _seen) =
        spawn_fake_provider(StatusCode::OK, r#"{"status":"ok","articles":null}"#).await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;

    let headlines = client.top_headlines(&request("us")).await?;

    assert!(headlines.articles.is_empty());
    assert_eq!(headlines.total_results, 0);
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_status_and_message_are_surfaced() -> Result<()> {
    let body = json!({
        "status": "error",
        "code": "rateLimited",
        "message": "You have made too many requests recently."
    });
    let (base_url, seen) =
        spawn_fake_provider(StatusCode::TOO_MANY_REQUESTS, body.to_string()).await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;

    let result = client.top_headlines(&request("us")).await;

    match result {
        Err(ProviderError::Upstream { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "You have made too many requests recently.");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    // exactly one attempt, no retry
    assert_eq!(seen.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_error_without_json_message_uses_fallback() -> Result<()> {
    let (base_url, _seen) =
        spawn_fake_provider(StatusCode::SERVICE_UNAVAILABLE, "upstream down").await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;

    let result = client.top_headlines(&request("us")).await;

    assert!(matches!(
        result,
        Err(ProviderError::Upstream { status: 503, ref message }) if message == "Failed to fetch news"
    ));
    Ok(())
}

#[tokio::test]
async fn test_error_status_in_success_body_is_bad_gateway() -> Result<()> {
    let body = json!({ "status": "error", "message": "parametersMissing" });
    let (base_url, _seen) = spawn_fake_provider(StatusCode::OK, body.to_string()).await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;

    let result = client.top_headlines(&request("us")).await;

    assert!(matches!(
        result,
        Err(ProviderError::Upstream { status: 502, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_route_mirrors_real_upstream_429() -> Result<()> {
    let body = json!({ "status": "error", "message": "Slow down" });
    let (base_url, _seen) =
        spawn_fake_provider(StatusCode::TOO_MANY_REQUESTS, body.to_string()).await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;
    let (server, _db) = create_test_server(client);

    let response = server.get("/api/news/us").await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": false, "error": "Slow down" }));
    Ok(())
}

#[tokio::test]
async fn test_route_without_api_key_makes_no_outbound_call() -> Result<()> {
    let (base_url, seen) = spawn_fake_provider(StatusCode::OK, r#"{"status":"ok"}"#).await?;
    let client = NewsApiClient::new(base_url, None)?;
    let (server, _db) = create_test_server(client);

    let response = server.get("/api/news/us").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "error": "API key is not configured" })
    );
    assert!(seen.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_route_ingests_from_real_client() -> Result<()> {
    let body = json!({
        "status": "ok",
        "totalResults": 1,
        "articles": [{
            "source": { "id": null, "name": "ESPN" },
            "title": "Final score",
            "url": "https://example.com/final",
            "publishedAt": "2024-03-03T20:00:00Z"
        }]
    });
    let (base_url, seen) = spawn_fake_provider(StatusCode::OK, body.to_string()).await?;
    let client = NewsApiClient::new(base_url, Some("secret".to_string()))?;
    let (server, _db) = create_test_server(client);

    let response = server
        .get("/api/news/us")
        .add_query_param("category", "sports")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["freshArticlesSaved"], json!(1));
    assert_eq!(body["articles"][0]["category"], json!("sports"));
    assert_eq!(body["articles"][0]["source"], json!({ "id": null, "name": "ESPN" }));
    assert_eq!(
        seen.lock().unwrap()[0].get("category").map(String::as_str),
        Some("sports")
    );
    Ok(())
}
