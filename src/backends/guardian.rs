//! The Guardian Open Platform backend.
//!
//! The Guardian is a single publisher, so its vocabulary differs from an
//! aggregator's in two ways the backend has to paper over:
//!
//! - Categories are *sections* (`sport`, `culture`, `lifeandstyle`, ...),
//!   reached through a fixed lookup table. Sections are free-form ids, so
//!   a category missing from the table is passed through as-is.
//! - There is no notion of distinct sources. Every article is attributed
//!   to one synthesized publisher record ([`publisher`]), and
//!   `list_sources` returns the publisher's *sections*.
//!
//! Both headlines and search use the `/search` endpoint; only the ordering
//! and date filters differ.

use crate::backends::NewsBackend;
use crate::error::NewsError;
use crate::http::{self, Credential, ProviderParams};
use crate::models::{
    CanonicalArticle, CanonicalSearchResult, CanonicalSource, CanonicalSourceList, ProviderId, Query,
    SortOrder,
};
use crate::utils::{non_blank, parse_timestamp, strip_html, truncate_with_ellipsis};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

/// Production API root.
pub const BASE_URL: &str = "https://content.guardianapis.com/";

/// Largest `page-size` the Content API accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Publisher name stamped on every article.
pub const PUBLISHER_NAME: &str = "The Guardian";

const PUBLISHER_ID: &str = "the-guardian";

/// Prefix turning a section id into a source id.
const SECTION_ID_PREFIX: &str = "guardian-";

const PROVIDER: ProviderId = ProviderId::Guardian;

/// Canonical category -> Guardian section id.
const SECTIONS: &[(&str, &str)] = &[
    ("business", "business"),
    ("technology", "technology"),
    ("science", "science"),
    ("sports", "sport"),
    ("health", "lifeandstyle"),
    ("entertainment", "culture"),
    ("general", "news"),
];

/// Canonical country -> Guardian edition.
const EDITIONS: &[(&str, &str)] = &[("us", "us"), ("gb", "uk"), ("uk", "uk"), ("au", "au")];

const SORT_ORDERS: &[(SortOrder, &str)] = &[
    (SortOrder::Relevance, "relevance"),
    (SortOrder::Newest, "newest"),
    (SortOrder::Popularity, "newest"),
];

/// Article fields requested from the API; everything the normalizer reads.
const SHOW_FIELDS: &str = "headline,standfirst,trailText,byline,body";

const DESCRIPTION_CHARS: usize = 200;
const CONTENT_CHARS: usize = 500;

/// Guardian Content API client. Cheap to clone.
#[derive(Clone)]
pub struct GuardianBackend {
    api_key: String,
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for GuardianBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardianBackend")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GuardianBackend {
    /// Create a backend against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Configuration`] when `api_key` is empty or blank.
    pub fn new(api_key: impl Into<String>, client: reqwest::Client) -> Result<Self, NewsError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(NewsError::Configuration(
                "Guardian API key is empty; get one from https://open-platform.theguardian.com/access/"
                    .to_string(),
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
            Credential::Query("api-key", &self.api_key),
        )
        .await?;
        http::classify_status(PROVIDER, reply)
    }
}

impl NewsBackend for GuardianBackend {
    fn provider(&self) -> ProviderId {
        PROVIDER
    }

    #[instrument(level = "info", skip_all, fields(provider = %PROVIDER))]
    async fn top_headlines(&self, query: &Query) -> Result<CanonicalSearchResult, NewsError> {
        let params = map_headlines_params(query)?;
        debug!(?params, "mapped headline parameters");
        let payload = self.fetch("search", &params).await?;
        let result = normalize_headlines(&payload)?;
        info!(count = result.articles.len(), total = result.total_results, "fetched headlines");
        Ok(result)
    }

    #[instrument(level = "info", skip_all, fields(provider = %PROVIDER))]
    async fn search_articles(&self, query: &Query) -> Result<CanonicalSearchResult, NewsError> {
        let params = map_search_params(query)?;
        debug!(?params, "mapped search parameters");
        let payload = self.fetch("search", &params).await?;
        let result = normalize_search(&payload)?;
        info!(count = result.articles.len(), total = result.total_results, "fetched search results");
        Ok(result)
    }

    #[instrument(level = "info", skip_all, fields(provider = %PROVIDER))]
    async fn list_sources(&self, query: &Query) -> Result<CanonicalSourceList, NewsError> {
        let params = map_sources_params(query)?;
        let payload = self.fetch("sections", &params).await?;
        let mut result = normalize_sources(&payload, query.country.as_deref())?;

        // Categories outside the section table leave the list unfiltered.
        if let Some(section) = non_blank(query.category.as_deref()).and_then(|c| lookup_section(&c)) {
            let wanted = format!("{SECTION_ID_PREFIX}{section}");
            result.sources.retain(|source| source.id == wanted);
        }
        info!(count = result.sources.len(), "fetched sections");
        Ok(result)
    }
}

/// The synthesized record standing in for the publisher itself.
pub fn publisher() -> CanonicalSource {
    CanonicalSource {
        id: PUBLISHER_ID.to_string(),
        name: PUBLISHER_NAME.to_string(),
        description: Some("Articles published by The Guardian".to_string()),
        category: Some("general".to_string()),
        country: Some("gb".to_string()),
        language: Some("en".to_string()),
        url: Some("https://www.theguardian.com".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parameter mapping
// ---------------------------------------------------------------------------

/// Canonical category to section id; unknown categories pass through.
fn map_section(category: &str) -> String {
    lookup_section(category)
        .map(str::to_string)
        .unwrap_or_else(|| category.trim().to_ascii_lowercase())
}

fn lookup_section(category: &str) -> Option<&'static str> {
    let wanted = category.trim().to_ascii_lowercase();
    SECTIONS
        .iter()
        .find(|(canonical, _)| *canonical == wanted)
        .map(|(_, section)| *section)
}

/// Section id back to a canonical category, `general` when unknown.
fn section_category(section_id: &str) -> &'static str {
    SECTIONS
        .iter()
        .find(|(_, section)| *section == section_id)
        .map(|(canonical, _)| *canonical)
        .unwrap_or("general")
}

fn lookup_edition(country: &str) -> Option<&'static str> {
    let wanted = country.trim().to_ascii_lowercase();
    EDITIONS
        .iter()
        .find(|(canonical, _)| *canonical == wanted)
        .map(|(_, edition)| *edition)
}

/// Country to edition; countries without an edition are sent lowercased.
fn map_edition(country: &str) -> String {
    lookup_edition(country)
        .map(str::to_string)
        .unwrap_or_else(|| country.trim().to_ascii_lowercase())
}

fn map_sort(sort: SortOrder) -> &'static str {
    SORT_ORDERS
        .iter()
        .find(|(canonical, _)| *canonical == sort)
        .map(|(_, native)| *native)
        .unwrap_or("newest")
}

fn base_params(query: &Query) -> ProviderParams {
    let mut params = ProviderParams::new();
    if let Some(q) = non_blank(query.keywords.as_deref()) {
        params.insert("q", q);
    }
    if let Some(category) = non_blank(query.category.as_deref()) {
        params.insert("section", map_section(&category));
    }
    if let Some(country) = non_blank(query.country.as_deref()) {
        params.insert("edition", map_edition(&country));
    }
    params.insert("page-size", query.page_size.clamp(1, MAX_PAGE_SIZE).to_string());
    params.insert("show-fields", SHOW_FIELDS.to_string());
    params
}

/// Map a query onto `/search` parameters for the newest stories.
///
/// Language has no equivalent (the archive is English-only); dates and the
/// caller's sort order do not apply to headlines.
pub fn map_headlines_params(query: &Query) -> Result<ProviderParams, NewsError> {
    let mut params = base_params(query);
    params.insert("order-by", "newest".to_string());
    Ok(params)
}

/// Map a query onto `/search` parameters for a keyword search.
pub fn map_search_params(query: &Query) -> Result<ProviderParams, NewsError> {
    let mut params = base_params(query);
    if let Some(from) = query.from_date {
        params.insert("from-date", from.format("%Y-%m-%d").to_string());
    }
    if let Some(to) = query.to_date {
        params.insert("to-date", to.format("%Y-%m-%d").to_string());
    }
    params.insert("order-by", map_sort(query.sort_by.unwrap_or(SortOrder::Newest)).to_string());
    Ok(params)
}

/// `/sections` takes no filters we use; category filtering happens on the
/// normalized list.
pub fn map_sources_params(_query: &Query) -> Result<ProviderParams, NewsError> {
    Ok(ProviderParams::new())
}

// ---------------------------------------------------------------------------
// Response normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<Body<T>>,
    /// Top-level message, sent on gateway-level errors.
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Body<T> {
    status: Option<String>,
    message: Option<String>,
    code: Option<String>,
    total: Option<u64>,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContent {
    web_title: Option<String>,
    web_url: Option<String>,
    web_publication_date: Option<String>,
    #[serde(default)]
    fields: RawFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFields {
    headline: Option<String>,
    standfirst: Option<String>,
    trail_text: Option<String>,
    byline: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    id: String,
    web_title: Option<String>,
    web_url: Option<String>,
}

fn malformed(message: String) -> NewsError {
    NewsError::Provider {
        provider: PROVIDER,
        status: None,
        message,
    }
}

enum Opened<T> {
    Ok(Body<T>),
    Error { message: String, code: Option<String> },
}

/// Unwrap the `{"response": {...}}` envelope, or report an in-band error.
fn open_envelope<T>(envelope: Envelope<T>) -> Result<Opened<T>, NewsError> {
    let Some(body) = envelope.response else {
        return match envelope.message {
            Some(message) => Ok(Opened::Error { message, code: None }),
            None => Err(malformed("response has no 'response' object".to_string())),
        };
    };
    match body.status.as_deref() {
        Some("ok") => Ok(Opened::Ok(body)),
        Some("error") => Ok(Opened::Error {
            message: body.message.unwrap_or_else(|| "Guardian API error".to_string()),
            code: body.code,
        }),
        Some(other) => Err(malformed(format!("unexpected status '{other}'"))),
        None => Err(malformed("response has no status field".to_string())),
    }
}

fn description_of(fields: &RawFields) -> Option<String> {
    if let Some(standfirst) = non_blank(fields.standfirst.as_deref()) {
        return non_blank(Some(&strip_html(&standfirst)));
    }
    if let Some(trail) = non_blank(fields.trail_text.as_deref()) {
        return non_blank(Some(&strip_html(&trail)));
    }
    let body = strip_html(fields.body.as_deref().unwrap_or_default());
    non_blank(Some(&truncate_with_ellipsis(&body, DESCRIPTION_CHARS)))
}

fn author_of(fields: &RawFields) -> Option<String> {
    let byline = fields.byline.as_deref()?.trim();
    non_blank(Some(byline.strip_prefix("By ").unwrap_or(byline)))
}

fn content_of(fields: &RawFields, description: &Option<String>) -> Option<String> {
    let body = strip_html(fields.body.as_deref().unwrap_or_default());
    if body.is_empty() {
        return description.clone();
    }
    Some(truncate_with_ellipsis(&body, CONTENT_CHARS))
}

fn normalize_article(raw: RawContent, publisher: &CanonicalSource) -> CanonicalArticle {
    let description = description_of(&raw.fields);
    let content = content_of(&raw.fields, &description);
    CanonicalArticle {
        title: non_blank(raw.web_title.as_deref())
            .or_else(|| non_blank(raw.fields.headline.as_deref()))
            .unwrap_or_default(),
        description,
        url: raw.web_url.unwrap_or_default(),
        source_name: publisher.name.clone(),
        author: author_of(&raw.fields),
        published_at: raw.web_publication_date.as_deref().and_then(parse_timestamp),
        content,
    }
}

fn normalize_content(payload: &Value) -> Result<CanonicalSearchResult, NewsError> {
    let envelope = Envelope::<RawContent>::deserialize(payload)
        .map_err(|e| malformed(format!("unexpected search payload: {e}")))?;
    match open_envelope(envelope)? {
        Opened::Error { message, code } => Ok(CanonicalSearchResult::error(message, code)),
        Opened::Ok(body) => {
            let publisher = publisher();
            let articles: Vec<CanonicalArticle> = body
                .results
                .into_iter()
                .map(|raw| normalize_article(raw, &publisher))
                .collect();
            let total = body.total.unwrap_or(articles.len() as u64);
            Ok(CanonicalSearchResult::ok(total, articles))
        }
    }
}

/// Normalize a `/search` payload fetched for headlines.
pub fn normalize_headlines(payload: &Value) -> Result<CanonicalSearchResult, NewsError> {
    normalize_content(payload)
}

/// Normalize a `/search` payload fetched for a keyword search.
pub fn normalize_search(payload: &Value) -> Result<CanonicalSearchResult, NewsError> {
    normalize_content(payload)
}

/// Normalize a `/sections` payload into one source per section.
///
/// `country` is echoed on each record when it maps to an edition; otherwise
/// sections are reported as `us`.
pub fn normalize_sources(payload: &Value, country: Option<&str>) -> Result<CanonicalSourceList, NewsError> {
    let envelope = Envelope::<RawSection>::deserialize(payload)
        .map_err(|e| malformed(format!("unexpected sections payload: {e}")))?;
    let body = match open_envelope(envelope)? {
        Opened::Error { message, code } => return Ok(CanonicalSourceList::error(message, code)),
        Opened::Ok(body) => body,
    };

    let country = country
        .filter(|c| lookup_edition(c).is_some())
        .map(|c| c.trim().to_ascii_lowercase())
        .unwrap_or_else(|| "us".to_string());

    let sources = body
        .results
        .into_iter()
        .map(|section| {
            let title = section.web_title.unwrap_or_else(|| section.id.clone());
            CanonicalSource {
                name: format!("{PUBLISHER_NAME} - {title}"),
                description: Some(format!("{PUBLISHER_NAME}'s {title} section")),
                category: Some(section_category(&section.id).to_string()),
                country: Some(country.clone()),
                language: Some("en".to_string()),
                url: section.web_url,
                id: format!("{SECTION_ID_PREFIX}{}", section.id),
            }
        })
        .collect();
    Ok(CanonicalSourceList::ok(sources))
}
