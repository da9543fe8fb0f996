//! Text and timestamp helpers used by the response normalizers and the CLI.
//!
//! - HTML stripping for Guardian body/standfirst fields
//! - Character-safe truncation with an ellipsis
//! - Timestamp parsing into one UTC representation
//! - Small string helpers for rendering

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// Remove HTML tags and trim surrounding whitespace.
///
/// Entities are left as-is; providers send them sparingly and a literal
/// `&amp;` in a description is harmless.
pub fn strip_html(s: &str) -> String {
    HTML_TAG.replace_all(s, "").trim().to_string()
}

/// Keep the first `max` characters, appending `...` when anything was cut.
///
/// Counts `char`s, never slicing inside a UTF-8 sequence.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
/// assert_eq!(truncate_with_ellipsis("hello world", 5), "hello...");
/// ```
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.trim().to_string(),
        Some((cut, _)) => format!("{}...", s[..cut].trim()),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with a byte count indicator
/// appended, so a provider's error page never floods the log.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Parse a provider timestamp into UTC.
///
/// Accepts RFC 3339 (both providers' native format, with or without
/// fractional seconds), a space-separated naive date-time, and a bare date.
/// Naive values are taken to be UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Capitalize the first character of a string.
///
/// Used for category names in listings ("sports" -> "Sports").
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Treat empty or whitespace-only strings as absent.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
