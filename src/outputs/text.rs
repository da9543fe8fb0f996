//! Plain-text layouts for articles, sources and topics.
//!
//! Both layouts number items from 1 and separate them with a blank line.
//! Missing optional fields get a placeholder rather than an empty gap.

use crate::models::{CanonicalArticle, CanonicalSource, NEWS_CATEGORIES};
use crate::utils::upcase;

const NO_TITLE: &str = "No title";
const UNKNOWN_SOURCE: &str = "Unknown source";
const UNKNOWN_AUTHOR: &str = "Unknown author";
const NO_DESCRIPTION: &str = "No description";

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() { placeholder } else { value }
}

fn published(article: &CanonicalArticle, pattern: &str) -> String {
    article
        .published_at
        .map(|ts| ts.format(pattern).to_string())
        .unwrap_or_default()
}

/// Two lines: numbered title, then source and `YYYY-MM-DD HH:MM`.
pub fn simple_article(index: usize, article: &CanonicalArticle) -> String {
    format!(
        "{index:2}. {}\n    Source: {} | {}",
        or_placeholder(&article.title, NO_TITLE),
        or_placeholder(&article.source_name, UNKNOWN_SOURCE),
        published(article, "%Y-%m-%d %H:%M"),
    )
}

/// Every display field of an article, one per line. The URL line is
/// omitted when there is no URL.
pub fn detailed_article(index: usize, article: &CanonicalArticle) -> String {
    let mut out = format!(
        "{index:2}. {}\n    Source: {}\n    Author: {}\n    Published: {}\n    Description: {}",
        or_placeholder(&article.title, NO_TITLE),
        or_placeholder(&article.source_name, UNKNOWN_SOURCE),
        article.author.as_deref().unwrap_or(UNKNOWN_AUTHOR),
        published(article, "%Y-%m-%d %H:%M UTC"),
        article.description.as_deref().unwrap_or(NO_DESCRIPTION),
    );
    if !article.url.is_empty() {
        out.push_str(&format!("\n    URL: {}", article.url));
    }
    out
}

/// `NN. Name (Category, COUNTRY)`.
pub fn simple_source(index: usize, source: &CanonicalSource) -> String {
    format!(
        "{index:2}. {} ({}, {})",
        source.name,
        upcase(source.category.as_deref().unwrap_or("general")),
        source.country.as_deref().unwrap_or("unknown").to_uppercase(),
    )
}

pub fn detailed_source(index: usize, source: &CanonicalSource) -> String {
    let mut out = format!(
        "{index:2}. {}\n    Description: {}\n    Category: {}\n    Country: {}\n    Language: {}",
        source.name,
        source.description.as_deref().unwrap_or(NO_DESCRIPTION),
        upcase(source.category.as_deref().unwrap_or("general")),
        source.country.as_deref().unwrap_or("unknown").to_uppercase(),
        source.language.as_deref().unwrap_or("unknown").to_uppercase(),
    );
    if let Some(url) = source.url.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&format!("\n    URL: {url}"));
    }
    out
}

fn numbered<T>(items: &[T], render: impl Fn(usize, &T) -> String) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| render(i + 1, item))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a list of articles in the simple or detailed layout.
pub fn articles(items: &[CanonicalArticle], detailed: bool) -> String {
    if detailed {
        numbered(items, detailed_article)
    } else {
        numbered(items, simple_article)
    }
}

/// Render a list of sources in the simple or detailed layout.
pub fn sources(items: &[CanonicalSource], detailed: bool) -> String {
    if detailed {
        numbered(items, detailed_source)
    } else {
        numbered(items, simple_source)
    }
}

/// The canonical categories, numbered, with a usage hint.
pub fn topics() -> String {
    let mut out = String::from("Available news topics:\n");
    out.push_str(&"-".repeat(25));
    out.push('\n');
    for (i, category) in NEWS_CATEGORIES.iter().enumerate() {
        out.push_str(&format!("{:2}. {}\n", i + 1, upcase(category)));
    }
    out.push_str(&format!("\nTotal: {} categories\n", NEWS_CATEGORIES.len()));
    out.push_str("\nUse 'get-news --topic <category>' to get news for a specific topic");
    out
}
