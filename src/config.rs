//! Process-wide settings loaded from environment variables.
//!
//! [`Config`] supplies each provider's optional credential plus the global
//! defaults the CLI falls back on. A missing credential is not an error at
//! load time; it only means that provider's backend is not constructible.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NEWS_API_KEY` | unset |
//! | `GUARDIAN_API_KEY` | unset |
//! | `NEWS_DEFAULT_COUNTRY` | `us` |
//! | `NEWS_DEFAULT_LANGUAGE` | `en` |
//! | `NEWS_DEFAULT_PAGE_SIZE` | `10` |
//! | `NEWS_MAX_PAGE_SIZE` | `100` |
//! | `NEWS_DEFAULT_FORMAT` | `simple` |
//! | `NEWS_HTTP_TIMEOUT_SECS` | `30` |

use crate::error::NewsError;
use crate::models::{ProviderId, ProviderPreference};
use crate::outputs::OutputFormat;
use crate::utils::non_blank;
use itertools::Itertools;
use std::time::Duration;
use tracing::debug;

/// Every variable [`Config::from_env`] reads, with a short description.
pub const ENV_VARS: &[(&str, &str)] = &[
    ("NEWS_API_KEY", "optional"),
    ("GUARDIAN_API_KEY", "optional"),
    ("NEWS_DEFAULT_COUNTRY", "optional, default: us"),
    ("NEWS_DEFAULT_LANGUAGE", "optional, default: en"),
    ("NEWS_DEFAULT_PAGE_SIZE", "optional, default: 10"),
    ("NEWS_MAX_PAGE_SIZE", "optional, default: 100"),
    ("NEWS_DEFAULT_FORMAT", "optional, default: simple"),
    ("NEWS_HTTP_TIMEOUT_SECS", "optional, default: 30"),
];

/// Read-only settings, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub news_api_key: Option<String>,
    pub guardian_api_key: Option<String>,
    pub default_country: String,
    pub default_language: String,
    pub default_page_size: u32,
    /// Caller-side ceiling applied before a query reaches any backend.
    pub max_page_size: u32,
    /// Raw format name; checked by [`Config::validate`].
    pub default_format: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            guardian_api_key: None,
            default_country: "us".to_string(),
            default_language: "en".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            default_format: "simple".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary lookup, so tests need not touch the
    /// process environment.
    ///
    /// Blank credentials count as unset. Unparseable numbers fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| non_blank(lookup(key).as_deref()).unwrap_or(default);
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let config = Self {
            news_api_key: non_blank(lookup("NEWS_API_KEY").as_deref()),
            guardian_api_key: non_blank(lookup("GUARDIAN_API_KEY").as_deref()),
            default_country: text("NEWS_DEFAULT_COUNTRY", defaults.default_country),
            default_language: text("NEWS_DEFAULT_LANGUAGE", defaults.default_language),
            default_page_size: number("NEWS_DEFAULT_PAGE_SIZE", defaults.default_page_size.into())
                .try_into()
                .unwrap_or(defaults.default_page_size),
            max_page_size: number("NEWS_MAX_PAGE_SIZE", defaults.max_page_size.into())
                .try_into()
                .unwrap_or(defaults.max_page_size),
            default_format: text("NEWS_DEFAULT_FORMAT", defaults.default_format),
            timeout_seconds: number("NEWS_HTTP_TIMEOUT_SECS", defaults.timeout_seconds),
        };
        debug!(
            newsapi = config.news_api_key.is_some(),
            guardian = config.guardian_api_key.is_some(),
            "loaded configuration"
        );
        config
    }

    /// The credential for one provider, if configured.
    pub fn api_key(&self, provider: ProviderId) -> Option<&str> {
        match provider {
            ProviderId::NewsApi => self.news_api_key.as_deref(),
            ProviderId::Guardian => self.guardian_api_key.as_deref(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Every problem with this configuration for the given preference.
    ///
    /// Each entry is one line of user-facing text, remediation hints
    /// included.
    pub fn problems(&self, preference: ProviderPreference) -> Vec<String> {
        let mut problems = Vec::new();

        match preference {
            ProviderPreference::Explicit(ProviderId::NewsApi) if self.news_api_key.is_none() => {
                problems.push("NEWS_API_KEY environment variable not set".to_string());
                problems.push("Get your API key from https://newsapi.org/".to_string());
                problems.push("Set it with: export NEWS_API_KEY='your-api-key-here'".to_string());
            }
            ProviderPreference::Explicit(ProviderId::Guardian) if self.guardian_api_key.is_none() => {
                problems.push("GUARDIAN_API_KEY environment variable not set".to_string());
                problems.push(
                    "Get your API key from https://open-platform.theguardian.com/access/".to_string(),
                );
                problems.push("Set it with: export GUARDIAN_API_KEY='your-api-key-here'".to_string());
            }
            ProviderPreference::Auto if self.news_api_key.is_none() && self.guardian_api_key.is_none() => {
                problems.push("Neither NEWS_API_KEY nor GUARDIAN_API_KEY environment variable is set".to_string());
                problems.push("Get NewsAPI key from https://newsapi.org/".to_string());
                problems.push(
                    "Get Guardian API key from https://open-platform.theguardian.com/access/".to_string(),
                );
                problems.push(
                    "Set at least one: export NEWS_API_KEY='key' or export GUARDIAN_API_KEY='key'".to_string(),
                );
            }
            _ => {}
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            problems.push(format!(
                "NEWS_DEFAULT_PAGE_SIZE must be between 1 and {}",
                self.max_page_size
            ));
        }
        if self.default_format.parse::<OutputFormat>().is_err() {
            problems.push("NEWS_DEFAULT_FORMAT must be one of: simple, detailed, json".to_string());
        }
        if self.default_country.chars().count() != 2 {
            problems.push("NEWS_DEFAULT_COUNTRY must be a 2-letter country code".to_string());
        }
        if self.default_language.chars().count() != 2 {
            problems.push("NEWS_DEFAULT_LANGUAGE must be a 2-letter language code".to_string());
        }
        if self.timeout_seconds == 0 {
            problems.push("NEWS_HTTP_TIMEOUT_SECS must be greater than 0".to_string());
        }

        problems
    }

    /// Validate for the given preference.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Configuration`] listing every problem, one per
    /// line.
    pub fn validate(&self, preference: ProviderPreference) -> Result<(), NewsError> {
        let problems = self.problems(preference);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(NewsError::Configuration(problems.iter().join("\n")))
        }
    }
}
