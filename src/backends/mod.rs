//! Provider backends behind one uniform contract.
//!
//! Each backend owns exactly three things for its provider: a parameter
//! mapper (canonical [`Query`] -> native query string), a response
//! normalizer (native JSON -> canonical records), and its error
//! classification. Nothing is shared between variants.
//!
//! # Supported Providers
//!
//! | Provider | Module | Auth | Page-size ceiling |
//! |----------|--------|------|-------------------|
//! | NewsAPI | [`newsapi`] | `X-Api-Key` header | 100 |
//! | The Guardian | [`guardian`] | `api-key` query parameter | 200 |

pub mod guardian;
pub mod newsapi;

use crate::config::Config;
use crate::error::NewsError;
use crate::models::{CanonicalSearchResult, CanonicalSourceList, ProviderId, Query};
use std::future::Future;
use tracing::{info, warn};

pub use guardian::GuardianBackend;
pub use newsapi::NewsApiBackend;

/// The capability set every provider backend implements.
///
/// Implementations are immutable after construction and hold no state
/// across calls, so a single instance may serve any number of operations.
///
/// # Errors
///
/// All three operations fail with [`NewsError::Authentication`],
/// [`NewsError::RateLimited`], [`NewsError::Transport`] or
/// [`NewsError::Provider`]; the mappers may also raise
/// [`NewsError::UnsupportedParameter`]. In-band provider errors are `Ok`
/// values with `status = "error"`.
pub trait NewsBackend: Send + Sync {
    /// Which provider this backend talks to.
    fn provider(&self) -> ProviderId;

    /// Current top stories, optionally filtered by category and country.
    fn top_headlines(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<CanonicalSearchResult, NewsError>> + Send;

    /// Full-text article search.
    fn search_articles(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<CanonicalSearchResult, NewsError>> + Send;

    /// The provider's list of sources (sections, for a single publisher).
    fn list_sources(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<CanonicalSourceList, NewsError>> + Send;
}

/// A backend for any known provider, dispatched by variant.
#[derive(Debug, Clone)]
pub enum Backend {
    NewsApi(NewsApiBackend),
    Guardian(GuardianBackend),
}

impl NewsBackend for Backend {
    fn provider(&self) -> ProviderId {
        match self {
            Backend::NewsApi(_) => ProviderId::NewsApi,
            Backend::Guardian(_) => ProviderId::Guardian,
        }
    }

    async fn top_headlines(&self, query: &Query) -> Result<CanonicalSearchResult, NewsError> {
        match self {
            Backend::NewsApi(b) => b.top_headlines(query).await,
            Backend::Guardian(b) => b.top_headlines(query).await,
        }
    }

    async fn search_articles(&self, query: &Query) -> Result<CanonicalSearchResult, NewsError> {
        match self {
            Backend::NewsApi(b) => b.search_articles(query).await,
            Backend::Guardian(b) => b.search_articles(query).await,
        }
    }

    async fn list_sources(&self, query: &Query) -> Result<CanonicalSourceList, NewsError> {
        match self {
            Backend::NewsApi(b) => b.list_sources(query).await,
            Backend::Guardian(b) => b.list_sources(query).await,
        }
    }
}

/// Construct every backend the configuration has a credential for.
///
/// Backends come back in static priority order. A provider without a
/// credential is simply absent; one whose construction fails (blank key)
/// is logged and skipped rather than aborting the others.
pub fn build_backends(config: &Config, client: &reqwest::Client) -> Vec<Backend> {
    let mut backends = Vec::new();
    for provider in ProviderId::ALL {
        let Some(key) = config.api_key(provider) else {
            info!(%provider, "no API key configured; backend unavailable");
            continue;
        };
        let built = match provider {
            ProviderId::NewsApi => NewsApiBackend::new(key, client.clone()).map(Backend::NewsApi),
            ProviderId::Guardian => GuardianBackend::new(key, client.clone()).map(Backend::Guardian),
        };
        match built {
            Ok(backend) => backends.push(backend),
            Err(e) => warn!(%provider, error = %e, "skipping backend that failed to construct"),
        }
    }
    backends
}
