//! # Diego
//!
//! One query interface over several news providers.
//!
//! Callers describe what they want with a provider-agnostic [`Query`] and
//! get back canonical records ([`CanonicalSearchResult`],
//! [`CanonicalSourceList`]) whose shape does not depend on which provider
//! answered.
//!
//! ## Supported Providers
//!
//! - **NewsAPI** (newsapi.org): many publishers, headlines, search, sources
//! - **The Guardian** Open Platform: one publisher, sections as sources
//!
//! ## Architecture
//!
//! 1. **Mapping**: each backend translates the canonical query into its
//!    provider's native parameters ([`backends`])
//! 2. **Transport**: one shared `reqwest` client, errors classified by kind
//!    ([`http`])
//! 3. **Normalizing**: native JSON becomes canonical records ([`backends`])
//! 4. **Selection**: an explicit provider, or every configured provider in
//!    priority order with sequential fallback ([`selector`])
//!
//! ## Usage
//!
//! ```no_run
//! use diego::{Config, NewsAggregator, ProviderPreference, Query};
//!
//! # async fn run() -> diego::Result<()> {
//! let aggregator = NewsAggregator::from_config(&Config::from_env())?;
//! let query = Query {
//!     keywords: Some("climate".to_string()),
//!     ..Query::default()
//! };
//! let fetched = aggregator.search_articles(ProviderPreference::Auto, &query).await?;
//! println!("{} answered with {} articles", fetched.provider, fetched.data.articles.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod backends;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod outputs;
pub mod selector;
pub mod utils;

pub use aggregator::NewsAggregator;
pub use backends::{Backend, GuardianBackend, NewsApiBackend, NewsBackend};
pub use config::Config;
pub use error::{NewsError, Result};
pub use models::{
    CanonicalArticle, CanonicalSearchResult, CanonicalSource, CanonicalSourceList, ProviderId,
    ProviderPreference, Query, ResultStatus, SortOrder,
};
pub use outputs::OutputFormat;
pub use selector::{AttemptFailure, Fetched};
