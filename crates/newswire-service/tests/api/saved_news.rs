use crate::common::{StubProvider, server_utils::create_test_server, test_utils};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

fn seeded_server() -> (axum_test::TestServer, StubProvider) {
    let provider = StubProvider::returning(vec![]);
    let (server, db) = create_test_server(provider.clone());
    let mut conn = db.lock().unwrap();
    for (url, at, country, category) in [
        ("https://example.com/us-tech", "2024-01-03T10:00:00Z", "us", "technology"),
        ("https://example.com/us-sport", "2024-01-02T10:00:00Z", "us", "sports"),
        ("https://example.com/gb-tech", "2024-01-01T10:00:00Z", "gb", "technology"),
    ] {
        test_utils::seed_article(&mut conn, url, at, country, category);
    }
    drop(conn);
    (server, provider)
}

fn urls(body: &Value) -> Vec<&str> {
    body["articles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["url"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_saved_news_empty_database() -> Result<()> {
    let (server, _db) = create_test_server(StubProvider::returning(vec![]));

    let response = server.get("/api/news/saved-news").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body, json!({ "success": true, "articles": [], "totalResults": 0 }));
    Ok(())
}

#[tokio::test]
async fn test_saved_news_never_calls_provider() -> Result<()> {
    let (server, provider) = seeded_server();

    let body: Value = server.get("/api/news/saved-news").await.json();

    assert_eq!(body["totalResults"], json!(3));
    assert_eq!(
        urls(&body),
        vec![
            "https://example.com/us-tech",
            "https://example.com/us-sport",
            "https://example.com/gb-tech"
        ]
    );
    assert_eq!(provider.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_saved_news_category_filter() -> Result<()> {
    let (server, _provider) = seeded_server();

    let body: Value = server
        .get("/api/news/saved-news")
        .add_query_param("category", "technology")
        .await
        .json();

    assert_eq!(
        urls(&body),
        vec!["https://example.com/us-tech", "https://example.com/gb-tech"]
    );
    Ok(())
}

#[tokio::test]
async fn test_saved_news_combined_filters() -> Result<()> {
    let (server, _provider) = seeded_server();

    let body: Value = server
        .get("/api/news/saved-news?category=technology&country=gb&language=en&source=seed-wire")
        .await
        .json();

    assert_eq!(urls(&body), vec!["https://example.com/gb-tech"]);
    Ok(())
}

#[tokio::test]
async fn test_saved_news_unknown_source_matches_nothing() -> Result<()> {
    let (server, _provider) = seeded_server();

    let body: Value = server.get("/api/news/saved-news?source=bbc-news").await.json();

    assert_eq!(body["totalResults"], json!(0));
    Ok(())
}

#[tokio::test]
async fn test_saved_news_plain_date_bounds() -> Result<()> {
    let (server, _provider) = seeded_server();

    // plain dates are midnight UTC
    let body: Value = server
        .get("/api/news/saved-news?from=2024-01-02&to=2024-01-03")
        .await
        .json();

    assert_eq!(urls(&body), vec!["https://example.com/us-sport"]);
    Ok(())
}

#[tokio::test]
async fn test_saved_news_limit() -> Result<()> {
    let (server, _provider) = seeded_server();

    let body: Value = server.get("/api/news/saved-news?limit=2").await.json();

    assert_eq!(body["totalResults"], json!(2));
    assert_eq!(
        urls(&body),
        vec!["https://example.com/us-tech", "https://example.com/us-sport"]
    );
    Ok(())
}

#[tokio::test]
async fn test_saved_news_default_limit_is_fifty() -> Result<()> {
    let (server, db) = create_test_server(StubProvider::returning(vec![]));
    {
        let mut conn = db.lock().unwrap();
        for i in 0..60 {
            test_utils::seed_article(
                &mut conn,
                &format!("https://example.com/{i}"),
                &format!("2024-01-01T00:00:{i:02}Z"),
                "us",
                "general",
            );
        }
    }

    let body: Value = server.get("/api/news/saved-news").await.json();

    assert_eq!(body["totalResults"], json!(50));
    assert_eq!(body["articles"][0]["url"], json!("https://example.com/59"));
    Ok(())
}

#[tokio::test]
async fn test_saved_news_unusable_limit_falls_back_to_default() -> Result<()> {
    let (server, db) = create_test_server(StubProvider::returning(vec![]));
    {
        let mut conn = db.lock().unwrap();
        for i in 0..60 {
            test_utils::seed_article(
                &mut conn,
                &format!("https://example.com/{i}"),
                &format!("2024-01-01T00:00:{i:02}Z"),
                "us",
                "general",
            );
        }
    }

    for limit in ["abc", "0", "-3", ""] {
        let response = server
            .get("/api/news/saved-news")
            .add_query_param("limit", limit)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["totalResults"], json!(50), "for limit {limit:?}");
    }

    // large limits are honoured as given
    let body: Value = server.get("/api/news/saved-news?limit=1000").await.json();
    assert_eq!(body["totalResults"], json!(60));
    Ok(())
}

#[tokio::test]
async fn test_saved_news_invalid_parameters() -> Result<()> {
    let (server, _provider) = seeded_server();

    for query in [
        "country=usa",
        "language=e",
        "to=not_a_date",
    ] {
        let response = server.get(&format!("/api/news/saved-news?{query}")).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false), "for {query}");
        assert!(body["error"].is_string(), "for {query}");
    }
    Ok(())
}
