//! The caller-facing entry point.
//!
//! [`NewsAggregator`] owns the constructible backends and runs every
//! operation through the same pipeline:
//!
//! 1. validate the [`Query`] (no backend is touched for an invalid one)
//! 2. clamp its page size to the configured ceiling
//! 3. [`resolve`] the preference into an ordered list of backends
//! 4. [`execute`] that list sequentially, falling back on recoverable errors

use crate::backends::{Backend, NewsBackend, build_backends};
use crate::config::Config;
use crate::error::NewsError;
use crate::http::build_client;
use crate::models::{CanonicalSearchResult, CanonicalSourceList, ProviderId, ProviderPreference, Query};
use crate::selector::{Fetched, execute, resolve};
use tracing::{info, instrument};

/// Uniform access to every configured news provider.
#[derive(Debug)]
pub struct NewsAggregator<B: NewsBackend = Backend> {
    backends: Vec<B>,
    max_page_size: u32,
}

impl NewsAggregator<Backend> {
    /// Build one shared HTTP client and every backend `config` has a
    /// credential for.
    ///
    /// An aggregator with no backends is still returned; operations on it
    /// fail with [`NewsError::NoBackendConfigured`] or
    /// [`NewsError::BackendUnavailable`].
    ///
    /// # Errors
    ///
    /// [`NewsError::Configuration`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, NewsError> {
        let client = build_client(config.timeout())?;
        let backends = build_backends(config, &client);
        info!(
            configured = backends.len(),
            timeout_secs = config.timeout_seconds,
            "news aggregator ready"
        );
        Ok(Self::new(backends, config.max_page_size))
    }
}

impl<B: NewsBackend> NewsAggregator<B> {
    pub fn new(backends: Vec<B>, max_page_size: u32) -> Self {
        Self {
            backends,
            max_page_size,
        }
    }

    /// Providers with a constructed backend, in the order given at
    /// construction.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.backends.iter().map(|b| b.provider()).collect()
    }

    fn prepare(&self, query: &Query) -> Result<Query, NewsError> {
        query.validate()?;
        Ok(query.clamped(self.max_page_size))
    }

    #[instrument(level = "info", skip_all, fields(%preference))]
    pub async fn top_headlines(
        &self,
        preference: ProviderPreference,
        query: &Query,
    ) -> Result<Fetched<CanonicalSearchResult>, NewsError> {
        let query = self.prepare(query)?;
        let order = resolve(preference, &self.backends)?;
        execute(&order, |backend| backend.top_headlines(&query)).await
    }

    #[instrument(level = "info", skip_all, fields(%preference))]
    pub async fn search_articles(
        &self,
        preference: ProviderPreference,
        query: &Query,
    ) -> Result<Fetched<CanonicalSearchResult>, NewsError> {
        let query = self.prepare(query)?;
        let order = resolve(preference, &self.backends)?;
        execute(&order, |backend| backend.search_articles(&query)).await
    }

    #[instrument(level = "info", skip_all, fields(%preference))]
    pub async fn list_sources(
        &self,
        preference: ProviderPreference,
        query: &Query,
    ) -> Result<Fetched<CanonicalSourceList>, NewsError> {
        let query = self.prepare(query)?;
        let order = resolve(preference, &self.backends)?;
        execute(&order, |backend| backend.list_sources(&query)).await
    }
}
