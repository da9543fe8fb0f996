//! JSON rendering.
//!
//! Records serialize with their canonical camelCase field names, so the
//! output is identical whichever provider answered.

use serde::Serialize;
use tracing::{debug, instrument};

/// Serialize any canonical record (or slice of them) as indented JSON.
///
/// # Errors
///
/// Only if serialization itself fails, which the canonical types never do
/// in practice.
#[instrument(level = "debug", skip_all)]
pub fn to_pretty_json<T>(value: &T) -> serde_json::Result<String>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    debug!(bytes = json.len(), "rendered JSON");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalArticle, CanonicalSearchResult};
    use serde_json::Value;

    #[test]
    fn test_articles_render_with_canonical_names() {
        let articles = vec![CanonicalArticle {
            title: "Rivers rise".to_string(),
            description: None,
            url: "https://example.com/a".to_string(),
            source_name: "Example".to_string(),
            author: None,
            published_at: None,
            content: None,
        }];

        let json = to_pretty_json(&articles).unwrap();
        assert!(json.contains('\n'));

        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["sourceName"], "Example");
        assert!(parsed[0]["publishedAt"].is_null());
    }

    #[test]
    fn test_error_result_carries_status() {
        let result = CanonicalSearchResult::error("bad things", Some("parameterInvalid".to_string()));
        let parsed: Value = serde_json::from_str(&to_pretty_json(&result).unwrap()).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["errorCode"], "parameterInvalid");
    }
}
