//! Canonical data model shared by every provider backend.
//!
//! This module defines the provider-agnostic shapes that the rest of the
//! crate speaks:
//! - [`Query`]: what the caller asks for
//! - [`CanonicalArticle`] / [`CanonicalSearchResult`]: headline and search results
//! - [`CanonicalSource`] / [`CanonicalSourceList`]: source listings
//! - [`ProviderId`] / [`ProviderPreference`]: which provider answers
//!
//! Serialized field names are camelCase. Optional fields serialize as `null`
//! rather than being skipped, so every provider produces the same JSON shape.

use crate::error::NewsError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical news categories understood by every backend's mapping table.
pub const NEWS_CATEGORIES: [&str; 7] = [
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// A known news provider.
///
/// Declaration order is the static auto-mode priority: the broad
/// multi-source provider first, the single-publisher archive second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    /// newsapi.org, many publishers.
    NewsApi,
    /// The Guardian Open Platform, one publisher.
    Guardian,
}

impl ProviderId {
    /// Every provider, in auto-mode priority order.
    pub const ALL: [ProviderId; 2] = [ProviderId::NewsApi, ProviderId::Guardian];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::NewsApi => "newsapi",
            ProviderId::Guardian => "guardian",
        }
    }

    /// Position in the auto-mode order; lower is tried first.
    pub fn priority(&self) -> usize {
        match self {
            ProviderId::NewsApi => 0,
            ProviderId::Guardian => 1,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newsapi" => Ok(ProviderId::NewsApi),
            "guardian" => Ok(ProviderId::Guardian),
            other => Err(NewsError::Configuration(format!(
                "unknown provider '{other}' (expected newsapi or guardian)"
            ))),
        }
    }
}

/// Which provider the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderPreference {
    /// Let the selector try every configured provider in priority order.
    #[default]
    Auto,
    /// Exactly this provider, never a substitute.
    Explicit(ProviderId),
}

impl fmt::Display for ProviderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderPreference::Auto => f.write_str("auto"),
            ProviderPreference::Explicit(id) => id.fmt(f),
        }
    }
}

impl FromStr for ProviderPreference {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(ProviderPreference::Auto);
        }
        s.parse().map(ProviderPreference::Explicit)
    }
}

/// Canonical sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Relevance,
    Newest,
    Popularity,
}

impl FromStr for SortOrder {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" | "relevancy" => Ok(SortOrder::Relevance),
            "newest" | "publishedat" => Ok(SortOrder::Newest),
            "popularity" => Ok(SortOrder::Popularity),
            other => Err(NewsError::InvalidQuery(format!(
                "unknown sort order '{other}' (expected relevance, newest or popularity)"
            ))),
        }
    }
}

/// A caller's request, immutable for the duration of one operation.
///
/// Every filter is optional; backends silently ignore the ones their
/// provider has no equivalent for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Free-text keywords.
    pub keywords: Option<String>,
    /// Canonical category, one of [`NEWS_CATEGORIES`] or free-form.
    pub category: Option<String>,
    /// Two-letter country code.
    pub country: Option<String>,
    /// Two-letter language code.
    pub language: Option<String>,
    /// Comma-separated NewsAPI source ids.
    pub sources: Option<String>,
    /// Earliest publication date, inclusive.
    pub from_date: Option<NaiveDate>,
    /// Latest publication date, inclusive.
    pub to_date: Option<NaiveDate>,
    pub sort_by: Option<SortOrder>,
    /// Requested number of articles; backends clamp it to their own ceiling.
    pub page_size: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            keywords: None,
            category: None,
            country: None,
            language: None,
            sources: None,
            from_date: None,
            to_date: None,
            sort_by: None,
            page_size: 20,
        }
    }
}

impl Query {
    /// Reject queries no provider could answer.
    pub fn validate(&self) -> Result<(), NewsError> {
        if let (Some(from), Some(to)) = (self.from_date, self.to_date) {
            if from > to {
                return Err(NewsError::InvalidQuery(format!(
                    "from date {from} is after to date {to}"
                )));
            }
        }
        Ok(())
    }

    /// Copy of this query with `page_size` clamped to `1..=max`.
    pub fn clamped(&self, max: u32) -> Query {
        Query {
            page_size: self.page_size.clamp(1, max.max(1)),
            ..self.clone()
        }
    }
}

/// Outcome flag carried by every canonical result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Error,
}

/// One article, identical in shape whichever provider produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalArticle {
    /// Headline; empty when the provider sent none.
    pub title: String,
    pub description: Option<String>,
    /// Canonical link; empty when the provider sent none.
    pub url: String,
    /// Publisher name as reported by (or synthesized for) the provider.
    pub source_name: String,
    pub author: Option<String>,
    /// Publication time normalized to UTC; `None` when absent or unparseable.
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
}

/// Headlines or search results.
///
/// `articles` keep the provider's order (relevance or recency); nothing in
/// this crate re-sorts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSearchResult {
    pub status: ResultStatus,
    pub total_results: u64,
    pub articles: Vec<CanonicalArticle>,
    /// Present iff `status` is [`ResultStatus::Error`].
    pub error_message: Option<String>,
    /// Provider error code, only alongside `error_message`.
    pub error_code: Option<String>,
}

impl CanonicalSearchResult {
    pub fn ok(total_results: u64, articles: Vec<CanonicalArticle>) -> Self {
        Self {
            status: ResultStatus::Ok,
            total_results,
            articles,
            error_message: None,
            error_code: None,
        }
    }

    /// An in-band provider error: a valid answer, not a failure.
    pub fn error(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            total_results: 0,
            articles: Vec::new(),
            error_message: Some(message.into()),
            error_code: code,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}

/// A source of articles. For The Guardian this is a content section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSource {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub url: Option<String>,
}

/// A list of sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSourceList {
    pub status: ResultStatus,
    pub sources: Vec<CanonicalSource>,
    pub error_message: Option<String>,
    pub error_code: Option<String>,
}

impl CanonicalSourceList {
    pub fn ok(sources: Vec<CanonicalSource>) -> Self {
        Self {
            status: ResultStatus::Ok,
            sources,
            error_message: None,
            error_code: None,
        }
    }

    pub fn error(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            sources: Vec::new(),
            error_message: Some(message.into()),
            error_code: code,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}
