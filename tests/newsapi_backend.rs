//! NewsAPI backend against a mock server: request shape, normalization and
//! error classification.

use diego::backends::NewsBackend;
use diego::http::build_client;
use diego::{NewsApiBackend, NewsError, ProviderId, Query, ResultStatus};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-newsapi-key";

fn backend(server: &MockServer) -> NewsApiBackend {
    let client = build_client(Duration::from_secs(2)).unwrap();
    NewsApiBackend::new(KEY, client)
        .and_then(|b| b.with_base_url(&server.uri()))
        .unwrap()
}

fn headlines_payload() -> serde_json::Value {
    json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {
                "source": {"id": "bbc-news", "name": "BBC News"},
                "author": "BBC Science",
                "title": "Comet visible tonight",
                "description": "Look north after dusk.",
                "url": "https://bbc.co.uk/comet",
                "publishedAt": "2024-06-01T18:30:00Z",
                "content": "Astronomers say..."
            },
            {
                "source": {"id": null, "name": "Reuters"},
                "author": null,
                "title": "Markets steady",
                "description": null,
                "url": "https://reuters.com/markets",
                "publishedAt": null,
                "content": null
            }
        ]
    })
}

#[tokio::test]
async fn test_top_headlines_sends_header_and_mapped_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(header("X-Api-Key", KEY))
        .and(query_param("category", "science"))
        .and(query_param("country", "gb"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(headlines_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query {
        category: Some("science".to_string()),
        country: Some("uk".to_string()),
        page_size: 500,
        ..Query::default()
    };
    let result = backend(&server).top_headlines(&query).await.unwrap();

    assert_eq!(result.status, ResultStatus::Ok);
    assert_eq!(result.total_results, 2);
    assert_eq!(result.articles[0].title, "Comet visible tonight");
    assert_eq!(result.articles[0].source_name, "BBC News");
    assert!(result.articles[0].published_at.is_some());
    assert_eq!(result.articles[1].author, None);
    assert_eq!(result.articles[1].published_at, None);
}

#[tokio::test]
async fn test_search_hits_everything_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "climate"))
        .and(query_param("sortBy", "popularity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(headlines_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query {
        keywords: Some("climate".to_string()),
        sort_by: Some(diego::SortOrder::Popularity),
        ..Query::default()
    };
    let result = backend(&server).search_articles(&query).await.unwrap();
    assert_eq!(result.articles.len(), 2);
}

#[tokio::test]
async fn test_unsupported_category_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(headlines_payload()))
        .expect(0)
        .mount(&server)
        .await;

    let query = Query {
        category: Some("gardening".to_string()),
        ..Query::default()
    };
    let err = backend(&server).top_headlines(&query).await.unwrap_err();
    assert!(matches!(err, NewsError::UnsupportedParameter { parameter: "category", .. }));
}

#[tokio::test]
async fn test_http_401_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyMissing",
            "message": "Your API key is missing."
        })))
        .mount(&server)
        .await;

    let err = backend(&server).top_headlines(&Query::default()).await.unwrap_err();
    assert!(matches!(err, NewsError::Authentication { provider: ProviderId::NewsApi, .. }));
    assert!(err.is_recoverable());
    assert!(!err.to_string().contains(KEY));
}

#[tokio::test]
async fn test_api_key_invalid_code_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        })))
        .mount(&server)
        .await;

    let err = backend(&server).search_articles(&Query::default()).await.unwrap_err();
    match err {
        NewsError::Authentication { message, .. } => assert!(message.contains("invalid")),
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_429_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "status": "error",
            "code": "rateLimited",
            "message": "You have been rate limited."
        })))
        .mount(&server)
        .await;

    let err = backend(&server).top_headlines(&Query::default()).await.unwrap_err();
    assert!(matches!(err, NewsError::RateLimited { .. }));
}

#[tokio::test]
async fn test_json_error_body_is_in_band() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "code": "parametersMissing",
            "message": "Required parameters are missing."
        })))
        .mount(&server)
        .await;

    let result = backend(&server).search_articles(&Query::default()).await.unwrap();
    assert_eq!(result.status, ResultStatus::Error);
    assert_eq!(result.error_code.as_deref(), Some("parametersMissing"));
    assert_eq!(result.error_message.as_deref(), Some("Required parameters are missing."));
    assert!(result.articles.is_empty());
}

#[tokio::test]
async fn test_non_json_error_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = backend(&server).top_headlines(&Query::default()).await.unwrap_err();
    assert!(matches!(err, NewsError::Provider { status: Some(502), .. }));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_json_error_without_status_field_keeps_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "bad gateway"})))
        .mount(&server)
        .await;

    let err = backend(&server).top_headlines(&Query::default()).await.unwrap_err();
    assert!(matches!(
        err,
        NewsError::Provider { provider: ProviderId::NewsApi, status: Some(502), .. }
    ));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_sources_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines/sources"))
        .and(query_param("category", "technology"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "sources": [{
                "id": "wired",
                "name": "Wired",
                "description": "Tech news",
                "url": "https://www.wired.com",
                "category": "technology",
                "language": "en",
                "country": "us"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query {
        category: Some("technology".to_string()),
        ..Query::default()
    };
    let list = backend(&server).list_sources(&query).await.unwrap();
    assert!(list.is_ok());
    assert_eq!(list.sources.len(), 1);
    assert_eq!(list.sources[0].id, "wired");
    assert_eq!(list.sources[0].url.as_deref(), Some("https://www.wired.com"));
}
