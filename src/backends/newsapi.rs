//! NewsAPI backend.
//!
//! Talks to [newsapi.org](https://newsapi.org/docs), a multi-publisher
//! aggregator with three endpoints that line up with the canonical
//! operations:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `top_headlines` | `/v2/top-headlines` |
//! | `search_articles` | `/v2/everything` |
//! | `list_sources` | `/v2/top-headlines/sources` |
//!
//! NewsAPI already reports `{status, totalResults, articles}` so the
//! normalizer mostly renames fields and fills gaps.

use crate::backends::NewsBackend;
use crate::error::NewsError;
use crate::http::{self, Credential, ProviderParams, RawReply};
use crate::models::{
    CanonicalArticle, CanonicalSearchResult, CanonicalSource, CanonicalSourceList, ProviderId, Query,
    SortOrder,
};
use crate::utils::{non_blank, parse_timestamp};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

/// Production API root.
pub const BASE_URL: &str = "https://newsapi.org/v2/";

/// Largest `pageSize` NewsAPI accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

const PROVIDER: ProviderId = ProviderId::NewsApi;

/// NewsAPI's closed category vocabulary. Canonical names match one to one.
const CATEGORIES: &[(&str, &str)] = &[
    ("business", "business"),
    ("entertainment", "entertainment"),
    ("general", "general"),
    ("health", "health"),
    ("science", "science"),
    ("sports", "sports"),
    ("technology", "technology"),
];

/// Canonical country codes whose NewsAPI spelling differs.
const COUNTRIES: &[(&str, &str)] = &[("uk", "gb")];

const SORT_ORDERS: &[(SortOrder, &str)] = &[
    (SortOrder::Relevance, "relevancy"),
    (SortOrder::Newest, "publishedAt"),
    (SortOrder::Popularity, "popularity"),
];

/// Error codes that mean the key itself is the problem.
const AUTH_ERROR_CODES: &[&str] = &["apiKeyMissing", "apiKeyInvalid", "apiKeyDisabled"];

/// Error codes that mean "slow down".
const RATE_LIMIT_ERROR_CODES: &[&str] = &["rateLimited", "apiKeyExhausted"];

/// NewsAPI client. Cheap to clone; the HTTP client is reference counted.
#[derive(Clone)]
pub struct NewsApiBackend {
    api_key: String,
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for NewsApiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiBackend")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl NewsApiBackend {
    /// Create a backend against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Configuration`] when `api_key` is empty or blank.
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Result<Self, NewsError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NewsError::Configuration(
                "NewsAPI key is empty; get one from https://newsapi.org/".to_string(),
            ));
        }
        Ok(Self {
            api_key,
            client,
            base_url: http::parse_base_url(BASE_URL)?,
        })
    }

    /// Point the backend at another API root (a mock server in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, NewsError> {
        self.base_url = http::parse_base_url(base_url)?;
        Ok(self)
    }

    async fn fetch(&self, path: &str, params: &ProviderParams) -> Result<Value, NewsError> {
        let url = http::endpoint(&self.base_url, path)?;
        let reply = http::get_json(
            &self.client,
            PROVIDER,
            url,
            params,
            Credential::Header("X-Api-Key", &self.api_key),
        )
        .await?;
        classify_reply(reply)
    }
}

impl NewsBackend for NewsApiBackend {
    fn provider(&self) -> ProviderId {
        PROVIDER
    }

    #[instrument(level = "info", skip_all, fields(provider = %PROVIDER))]
    async fn top_headlines(&self, query: &Query) -> Result<CanonicalSearchResult, NewsError> {
        let params = map_headlines_params(query)?;
        debug!(?params, "mapped headline parameters");
        let payload = self.fetch("top-headlines", &params).await?;
        let result = normalize_headlines(&payload)?;
        info!(count = result.articles.len(), total = result.total_results, "fetched headlines");
        Ok(result)
    }

    #[instrument(level = "info", skip_all, fields(provider = %PROVIDER))]
    async fn search_articles(&self, query: &Query) -> Result<CanonicalSearchResult, NewsError> {
        let params = map_search_params(query)?;
        debug!(?params, "mapped search parameters");
        let payload = self.fetch("everything", &params).await?;
        let result = normalize_search(&payload)?;
        info!(count = result.articles.len(), total = result.total_results, "fetched search results");
        Ok(result)
    }

    #[instrument(level = "info", skip_all, fields(provider = %PROVIDER))]
    async fn list_sources(&self, query: &Query) -> Result<CanonicalSourceList, NewsError> {
        let params = map_sources_params(query)?;
        debug!(?params, "mapped source parameters");
        let payload = self.fetch("top-headlines/sources", &params).await?;
        let result = normalize_sources(&payload)?;
        info!(count = result.sources.len(), "fetched sources");
        Ok(result)
    }
}

/// NewsAPI signals key and quota problems through error codes, sometimes
/// with a status other than 401/429, so those are checked first.
fn classify_reply(reply: RawReply) -> Result<Value, NewsError> {
    if let Some(body) = reply.body.as_ref() {
        let code = body.get("code").and_then(Value::as_str).unwrap_or_default();
        let message = || http::error_message(Some(body)).unwrap_or_else(|| code.to_string());
        if AUTH_ERROR_CODES.contains(&code) {
            return Err(NewsError::Authentication {
                provider: PROVIDER,
                message: message(),
            });
        }
        if RATE_LIMIT_ERROR_CODES.contains(&code) {
            return Err(NewsError::RateLimited {
                provider: PROVIDER,
                message: message(),
            });
        }
    }
    let status = reply.status;
    let body = http::classify_status(PROVIDER, reply)?;
    // A failed reply that is not a NewsAPI envelope keeps its HTTP status.
    if !status.is_success() && body.get("status").is_none() {
        return Err(NewsError::Provider {
            provider: PROVIDER,
            status: Some(status.as_u16()),
            message: http::error_message(Some(&body))
                .unwrap_or_else(|| "unexpected error payload".to_string()),
        });
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Parameter mapping
// ---------------------------------------------------------------------------

fn map_category(category: &str) -> Result<&'static str, NewsError> {
    let wanted = category.trim().to_ascii_lowercase();
    CATEGORIES
        .iter()
        .find(|(canonical, _)| *canonical == wanted)
        .map(|(_, native)| *native)
        .ok_or_else(|| NewsError::UnsupportedParameter {
            provider: PROVIDER,
            parameter: "category",
            value: category.to_string(),
        })
}

fn map_country(country: &str) -> String {
    let wanted = country.trim().to_ascii_lowercase();
    COUNTRIES
        .iter()
        .find(|(canonical, _)| *canonical == wanted)
        .map(|(_, native)| native.to_string())
        .unwrap_or(wanted)
}

fn map_sort(sort: SortOrder) -> &'static str {
    SORT_ORDERS
        .iter()
        .find(|(canonical, _)| *canonical == sort)
        .map(|(_, native)| *native)
        .unwrap_or("publishedAt")
}

fn page_size(query: &Query) -> String {
    query.page_size.clamp(1, MAX_PAGE_SIZE).to_string()
}

/// Map a query onto `/top-headlines` parameters.
///
/// NewsAPI refuses `sources` mixed with `country` or `category`, so an
/// explicit source list wins and the other two are dropped. Language, dates
/// and sort order have no equivalent on this endpoint.
pub fn map_headlines_params(query: &Query) -> Result<ProviderParams, NewsError> {
    let mut params = ProviderParams::new();
    if let Some(q) = non_blank(query.keywords.as_deref()) {
        params.insert("q", q);
    }
    match non_blank(query.sources.as_deref()) {
        Some(sources) => {
            params.insert("sources", sources);
        }
        None => {
            if let Some(category) = non_blank(query.category.as_deref()) {
                params.insert("category", map_category(&category)?.to_string());
            }
            if let Some(country) = non_blank(query.country.as_deref()) {
                params.insert("country", map_country(&country));
            }
        }
    }
    params.insert("pageSize", page_size(query));
    Ok(params)
}

/// Map a query onto `/everything` parameters.
///
/// Category and country have no equivalent on this endpoint and are dropped.
pub fn map_search_params(query: &Query) -> Result<ProviderParams, NewsError> {
    let mut params = ProviderParams::new();
    if let Some(q) = non_blank(query.keywords.as_deref()) {
        params.insert("q", q);
    }
    if let Some(sources) = non_blank(query.sources.as_deref()) {
        params.insert("sources", sources);
    }
    if let Some(from) = query.from_date {
        params.insert("from", from.format("%Y-%m-%d").to_string());
    }
    if let Some(to) = query.to_date {
        params.insert("to", to.format("%Y-%m-%d").to_string());
    }
    if let Some(language) = non_blank(query.language.as_deref()) {
        params.insert("language", language.to_ascii_lowercase());
    }
    params.insert("sortBy", map_sort(query.sort_by.unwrap_or(SortOrder::Newest)).to_string());
    params.insert("pageSize", page_size(query));
    Ok(params)
}

/// Map a query onto `/top-headlines/sources` parameters.
pub fn map_sources_params(query: &Query) -> Result<ProviderParams, NewsError> {
    let mut params = ProviderParams::new();
    if let Some(category) = non_blank(query.category.as_deref()) {
        params.insert("category", map_category(&category)?.to_string());
    }
    if let Some(country) = non_blank(query.country.as_deref()) {
        params.insert("country", map_country(&country));
    }
    if let Some(language) = non_blank(query.language.as_deref()) {
        params.insert("language", language.to_ascii_lowercase());
    }
    Ok(params)
}

// ---------------------------------------------------------------------------
// Response normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticlesEnvelope {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    total_results: Option<u64>,
    articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: Option<RawArticleSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawArticleSource {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SourcesEnvelope {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    sources: Option<Vec<RawSource>>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    url: Option<String>,
    category: Option<String>,
    language: Option<String>,
    country: Option<String>,
}

enum Status {
    Ok,
    Error { message: String, code: Option<String> },
}

fn read_status(
    status: Option<&str>,
    message: Option<String>,
    code: Option<String>,
) -> Result<Status, NewsError> {
    match status {
        Some("ok") => Ok(Status::Ok),
        Some("error") => Ok(Status::Error {
            message: message.unwrap_or_else(|| "Unknown API error".to_string()),
            code,
        }),
        Some(other) => Err(malformed(format!("unexpected status '{other}'"))),
        None => Err(malformed("response has no status field".to_string())),
    }
}

fn malformed(message: String) -> NewsError {
    NewsError::Provider {
        provider: PROVIDER,
        status: None,
        message,
    }
}

fn normalize_article(raw: RawArticle) -> CanonicalArticle {
    CanonicalArticle {
        title: raw.title.unwrap_or_default(),
        description: non_blank(raw.description.as_deref()),
        url: raw.url.unwrap_or_default(),
        source_name: raw.source.and_then(|s| s.name).unwrap_or_default(),
        author: non_blank(raw.author.as_deref()),
        published_at: raw.published_at.as_deref().and_then(parse_timestamp),
        content: non_blank(raw.content.as_deref()),
    }
}

fn normalize_articles(payload: &Value) -> Result<CanonicalSearchResult, NewsError> {
    let envelope = ArticlesEnvelope::deserialize(payload)
        .map_err(|e| malformed(format!("unexpected article payload: {e}")))?;
    match read_status(envelope.status.as_deref(), envelope.message, envelope.code)? {
        Status::Error { message, code } => Ok(CanonicalSearchResult::error(message, code)),
        Status::Ok => {
            let articles: Vec<CanonicalArticle> = envelope
                .articles
                .unwrap_or_default()
                .into_iter()
                .map(normalize_article)
                .collect();
            let total = envelope.total_results.unwrap_or(articles.len() as u64);
            Ok(CanonicalSearchResult::ok(total, articles))
        }
    }
}

/// Normalize a `/top-headlines` payload.
pub fn normalize_headlines(payload: &Value) -> Result<CanonicalSearchResult, NewsError> {
    normalize_articles(payload)
}

/// Normalize an `/everything` payload; same envelope as headlines.
pub fn normalize_search(payload: &Value) -> Result<CanonicalSearchResult, NewsError> {
    normalize_articles(payload)
}

/// Normalize a `/top-headlines/sources` payload.
pub fn normalize_sources(payload: &Value) -> Result<CanonicalSourceList, NewsError> {
    let envelope = SourcesEnvelope::deserialize(payload)
        .map_err(|e| malformed(format!("unexpected sources payload: {e}")))?;
    match read_status(envelope.status.as_deref(), envelope.message, envelope.code)? {
        Status::Error { message, code } => Ok(CanonicalSourceList::error(message, code)),
        Status::Ok => {
            let sources = envelope
                .sources
                .unwrap_or_default()
                .into_iter()
                .map(|raw| CanonicalSource {
                    id: raw.id.unwrap_or_default(),
                    name: raw.name.unwrap_or_default(),
                    description: non_blank(raw.description.as_deref()),
                    category: non_blank(raw.category.as_deref()),
                    country: non_blank(raw.country.as_deref()),
                    language: non_blank(raw.language.as_deref()),
                    url: non_blank(raw.url.as_deref()),
                })
                .collect();
            Ok(CanonicalSourceList::ok(sources))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultStatus;
    use chrono::{NaiveDate, TimeZone, Utc};
    use reqwest::StatusCode;
    use serde_json::json;

    /// Every parameter name NewsAPI documents across the three endpoints.
    const VOCABULARY: &[&str] = &[
        "q", "sources", "category", "country", "language", "from", "to", "sortBy", "pageSize",
    ];

    fn full_query() -> Query {
        Query {
            keywords: Some("climate".to_string()),
            category: Some("science".to_string()),
            country: Some("US".to_string()),
            language: Some("EN".to_string()),
            sources: None,
            from_date: NaiveDate::from_ymd_opt(2025, 8, 1),
            to_date: NaiveDate::from_ymd_opt(2025, 8, 2),
            sort_by: Some(SortOrder::Relevance),
            page_size: 20,
        }
    }

    fn sample_payload() -> Value {
        json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": {"id": "bbc-news", "name": "BBC News"},
                    "author": "BBC News",
                    "title": "Breaking News: Important Event",
                    "description": "This is a breaking news story.",
                    "url": "https://www.bbc.co.uk/news/123",
                    "urlToImage": "https://example.com/image.jpg",
                    "publishedAt": "2025-08-02T10:30:00Z",
                    "content": "Full article content here..."
                },
                {
                    "source": {"id": null, "name": "TechCrunch"},
                    "title": "Tech Update",
                    "url": "https://techcrunch.com/456"
                }
            ]
        })
    }

    #[test]
    fn test_new_rejects_blank_key() {
        let client = reqwest::Client::new();
        let err = NewsApiBackend::new("   ", client).unwrap_err();
        assert!(matches!(err, NewsError::Configuration(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let backend = NewsApiBackend::new("secret-key", reqwest::Client::new()).unwrap();
        assert!(!format!("{backend:?}").contains("secret-key"));
    }

    #[test]
    fn test_headlines_params_basic() {
        let params = map_headlines_params(&full_query()).unwrap();
        assert_eq!(params.get("q").map(String::as_str), Some("climate"));
        assert_eq!(params.get("category").map(String::as_str), Some("science"));
        assert_eq!(params.get("country").map(String::as_str), Some("us"));
        assert_eq!(params.get("pageSize").map(String::as_str), Some("20"));
        assert!(!params.contains_key("language"));
        assert!(!params.contains_key("sortBy"));
    }

    #[test]
    fn test_headlines_sources_drop_country_and_category() {
        let query = Query {
            sources: Some("bbc-news,cnn".to_string()),
            ..full_query()
        };
        let params = map_headlines_params(&query).unwrap();
        assert_eq!(params.get("sources").map(String::as_str), Some("bbc-news,cnn"));
        assert!(!params.contains_key("country"));
        assert!(!params.contains_key("category"));
    }

    #[test]
    fn test_headlines_unknown_category_is_unsupported() {
        let query = Query {
            category: Some("gardening".to_string()),
            ..Default::default()
        };
        let err = map_headlines_params(&query).unwrap_err();
        match err {
            NewsError::UnsupportedParameter { provider, parameter, value } => {
                assert_eq!(provider, ProviderId::NewsApi);
                assert_eq!(parameter, "category");
                assert_eq!(value, "gardening");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_country_table_and_passthrough() {
        assert_eq!(map_country("UK"), "gb");
        assert_eq!(map_country("De"), "de");
    }

    #[test]
    fn test_search_params() {
        let params = map_search_params(&full_query()).unwrap();
        assert_eq!(params.get("from").map(String::as_str), Some("2025-08-01"));
        assert_eq!(params.get("to").map(String::as_str), Some("2025-08-02"));
        assert_eq!(params.get("language").map(String::as_str), Some("en"));
        assert_eq!(params.get("sortBy").map(String::as_str), Some("relevancy"));
        assert!(!params.contains_key("category"));
        assert!(!params.contains_key("country"));
    }

    #[test]
    fn test_search_default_sort_is_published_at() {
        let query = Query {
            keywords: Some("rust".to_string()),
            ..Default::default()
        };
        let params = map_search_params(&query).unwrap();
        assert_eq!(params.get("sortBy").map(String::as_str), Some("publishedAt"));
    }

    #[test]
    fn test_sort_table() {
        assert_eq!(map_sort(SortOrder::Newest), "publishedAt");
        assert_eq!(map_sort(SortOrder::Relevance), "relevancy");
        assert_eq!(map_sort(SortOrder::Popularity), "popularity");
    }

    #[test]
    fn test_page_size_clamped_to_ceiling() {
        let query = Query {
            page_size: 500,
            ..Default::default()
        };
        assert_eq!(map_headlines_params(&query).unwrap()["pageSize"], "100");
        assert_eq!(map_search_params(&query).unwrap()["pageSize"], "100");
    }

    #[test]
    fn test_params_stay_within_vocabulary() {
        let queries = [
            full_query(),
            Query::default(),
            Query {
                sources: Some("bbc-news".to_string()),
                ..full_query()
            },
        ];
        for query in &queries {
            for params in [
                map_headlines_params(query).unwrap(),
                map_search_params(query).unwrap(),
                map_sources_params(query).unwrap(),
            ] {
                for key in params.keys() {
                    assert!(VOCABULARY.contains(key), "unexpected parameter {key}");
                }
            }
        }
    }

    #[test]
    fn test_sources_params() {
        let params = map_sources_params(&full_query()).unwrap();
        assert_eq!(params.get("category").map(String::as_str), Some("science"));
        assert_eq!(params.get("country").map(String::as_str), Some("us"));
        assert_eq!(params.get("language").map(String::as_str), Some("en"));
        assert!(!params.contains_key("pageSize"));
    }

    #[test]
    fn test_normalize_headlines() {
        let result = normalize_headlines(&sample_payload()).unwrap();
        assert_eq!(result.status, ResultStatus::Ok);
        assert_eq!(result.total_results, 2);
        assert_eq!(result.articles.len(), 2);

        let first = &result.articles[0];
        assert_eq!(first.title, "Breaking News: Important Event");
        assert_eq!(first.source_name, "BBC News");
        assert_eq!(first.author.as_deref(), Some("BBC News"));
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2025, 8, 2, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_normalize_missing_optional_fields() {
        let result = normalize_search(&sample_payload()).unwrap();
        let second = &result.articles[1];
        assert_eq!(second.source_name, "TechCrunch");
        assert_eq!(second.description, None);
        assert_eq!(second.author, None);
        assert_eq!(second.published_at, None);
        assert_eq!(second.content, None);
    }

    #[test]
    fn test_normalize_preserves_order() {
        let result = normalize_search(&sample_payload()).unwrap();
        let titles: Vec<_> = result.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Breaking News: Important Event", "Tech Update"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let payload = sample_payload();
        assert_eq!(normalize_search(&payload).unwrap(), normalize_search(&payload).unwrap());
    }

    #[test]
    fn test_normalize_fills_total_and_articles() {
        let result = normalize_headlines(&json!({"status": "ok", "articles": [{"title": "x"}]})).unwrap();
        assert_eq!(result.total_results, 1);
        assert_eq!(result.articles[0].url, "");

        let empty = normalize_headlines(&json!({"status": "ok"})).unwrap();
        assert_eq!(empty.total_results, 0);
        assert!(empty.articles.is_empty());
    }

    #[test]
    fn test_normalize_in_band_error() {
        let payload = json!({"status": "error", "code": "parameterInvalid", "message": "You cannot mix sources with country"});
        let result = normalize_headlines(&payload).unwrap();
        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(result.error_message.as_deref(), Some("You cannot mix sources with country"));
        assert_eq!(result.error_code.as_deref(), Some("parameterInvalid"));
    }

    #[test]
    fn test_normalize_missing_status_is_provider_error() {
        let err = normalize_headlines(&json!({"articles": []})).unwrap_err();
        assert!(matches!(err, NewsError::Provider { .. }));
    }

    #[test]
    fn test_normalize_wrong_shape_is_provider_error() {
        let err = normalize_headlines(&json!({"status": "ok", "articles": "nope"})).unwrap_err();
        assert!(matches!(err, NewsError::Provider { .. }));
        let err = normalize_headlines(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, NewsError::Provider { .. }));
    }

    #[test]
    fn test_normalize_sources() {
        let payload = json!({
            "status": "ok",
            "sources": [
                {
                    "id": "bbc-news",
                    "name": "BBC News",
                    "description": "Use BBC News for up-to-the-minute news.",
                    "url": "http://www.bbc.co.uk/news",
                    "category": "general",
                    "language": "en",
                    "country": "gb"
                },
                {"id": "bare", "name": "Bare"}
            ]
        });
        let result = normalize_sources(&payload).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].country.as_deref(), Some("gb"));
        assert_eq!(result.sources[1].description, None);
        assert_eq!(result.sources[1].category, None);
    }

    #[test]
    fn test_classify_reply_auth_code() {
        let reply = RawReply {
            status: StatusCode::BAD_REQUEST,
            body: Some(json!({"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid"})),
            preview: String::new(),
        };
        match classify_reply(reply).unwrap_err() {
            NewsError::Authentication { message, .. } => assert_eq!(message, "Your API key is invalid"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_classify_reply_rate_limit_code() {
        let reply = RawReply {
            status: StatusCode::OK,
            body: Some(json!({"status": "error", "code": "rateLimited"})),
            preview: String::new(),
        };
        match classify_reply(reply).unwrap_err() {
            NewsError::RateLimited { message, .. } => assert_eq!(message, "rateLimited"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_classify_reply_foreign_error_body_keeps_status() {
        let reply = RawReply {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Some(json!({"detail": "maintenance"})),
            preview: String::new(),
        };
        match classify_reply(reply).unwrap_err() {
            NewsError::Provider { status, message, .. } => {
                assert_eq!(status, Some(503));
                assert_eq!(message, "unexpected error payload");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
