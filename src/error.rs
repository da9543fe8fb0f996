//! Error types shared by every backend and by the fallback loop.
//!
//! Messages are stable strings suitable for display to users. Credentials
//! never appear in an error message.

use crate::models::ProviderId;

/// Everything that can go wrong while talking to a news provider.
///
/// In-band provider errors (a reachable provider answering `status=error`)
/// are **not** represented here: they are ordinary
/// [`CanonicalSearchResult`](crate::models::CanonicalSearchResult) values.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// A missing or invalid credential or setting, detected at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A canonical query field has no valid mapping for the target provider.
    #[error("{provider} does not support {parameter} '{value}'")]
    UnsupportedParameter {
        provider: ProviderId,
        parameter: &'static str,
        value: String,
    },

    /// The query itself is malformed; no provider could satisfy it.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The provider rejected the credential.
    #[error("{provider} rejected the API key: {message}")]
    Authentication { provider: ProviderId, message: String },

    /// The provider is throttling requests.
    #[error("{provider} rate limit exceeded: {message}")]
    RateLimited { provider: ProviderId, message: String },

    /// Network, DNS or timeout failure.
    #[error("network error talking to {provider}: {message}")]
    Transport { provider: ProviderId, message: String },

    /// Any other non-2xx answer, or a body of an unexpected shape.
    #[error("{provider} returned an unusable response{}: {message}", status_suffix(.status))]
    Provider {
        provider: ProviderId,
        status: Option<u16>,
        message: String,
    },

    /// An explicitly requested provider has no configured backend.
    #[error("{0} backend is not configured (missing API key)")]
    BackendUnavailable(ProviderId),

    /// Auto mode found no constructible backend at all.
    #[error("no news backend is configured; set NEWS_API_KEY or GUARDIAN_API_KEY")]
    NoBackendConfigured,

    /// Every backend in the resolved order failed recoverably.
    #[error("all {attempts} backend attempt(s) failed; last error: {last}")]
    AllBackendsFailed {
        attempts: usize,
        #[source]
        last: Box<NewsError>,
    },
}

impl NewsError {
    /// Whether the fallback loop may move on to the next backend.
    ///
    /// True for transport, rate-limit, credential and configuration errors.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NewsError::Transport { .. }
                | NewsError::RateLimited { .. }
                | NewsError::Authentication { .. }
                | NewsError::Configuration(_)
        )
    }

    /// The provider this error originated from, when there is one.
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            NewsError::UnsupportedParameter { provider, .. }
            | NewsError::Authentication { provider, .. }
            | NewsError::RateLimited { provider, .. }
            | NewsError::Transport { provider, .. }
            | NewsError::Provider { provider, .. } => Some(*provider),
            NewsError::BackendUnavailable(provider) => Some(*provider),
            NewsError::AllBackendsFailed { last, .. } => last.provider(),
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NewsError>;
