//! Backend selection and sequential fallback.
//!
//! Selection is split in two so each half is testable without HTTP:
//!
//! 1. [`resolve`] turns a [`ProviderPreference`] plus the constructible
//!    backends into an ordered list to attempt.
//! 2. [`execute`] walks that list one backend at a time, classifying each
//!    outcome as success, recoverable failure or fatal failure.
//!
//! Backends are never queried in parallel and never retried: each one in
//! the order gets exactly one attempt per operation.

use crate::backends::NewsBackend;
use crate::error::NewsError;
use crate::models::{ProviderId, ProviderPreference};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A recoverable failure that preceded the successful attempt.
#[derive(Debug)]
pub struct AttemptFailure {
    pub provider: ProviderId,
    pub error: NewsError,
}

/// A successful operation and how it was reached.
#[derive(Debug)]
pub struct Fetched<T> {
    /// The provider whose answer this is.
    pub provider: ProviderId,
    pub data: T,
    /// Backends that failed recoverably before `provider` answered.
    pub failures: Vec<AttemptFailure>,
}

impl<T> Fetched<T> {
    /// Whether an earlier backend failed and a later one answered.
    pub fn fell_back(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Typed outcome of one backend attempt.
#[derive(Debug)]
enum Attempt<T> {
    Success(T),
    Recoverable(NewsError),
    Fatal(NewsError),
}

impl<T> From<Result<T, NewsError>> for Attempt<T> {
    fn from(result: Result<T, NewsError>) -> Self {
        match result {
            Ok(data) => Attempt::Success(data),
            Err(err) if err.is_recoverable() => Attempt::Recoverable(err),
            Err(err) => Attempt::Fatal(err),
        }
    }
}

/// Decide which backends to attempt, in order.
///
/// - `Explicit(id)`: exactly that backend, or
///   [`NewsError::BackendUnavailable`] when none was constructible. Another
///   provider is never substituted.
/// - `Auto`: every available backend in static priority order, or
///   [`NewsError::NoBackendConfigured`] when there are none.
pub fn resolve<B: NewsBackend>(
    preference: ProviderPreference,
    available: &[B],
) -> Result<Vec<&B>, NewsError> {
    match preference {
        ProviderPreference::Explicit(id) => available
            .iter()
            .find(|backend| backend.provider() == id)
            .map(|backend| vec![backend])
            .ok_or(NewsError::BackendUnavailable(id)),
        ProviderPreference::Auto => {
            if available.is_empty() {
                return Err(NewsError::NoBackendConfigured);
            }
            let mut order: Vec<&B> = available.iter().collect();
            order.sort_by_key(|backend| backend.provider().priority());
            Ok(order)
        }
    }
}

/// Run `call` against each backend in `order` until one answers.
///
/// - Success (including an in-band `status="error"` result) stops the walk.
/// - A recoverable error ([`NewsError::is_recoverable`]) moves on to the
///   next backend.
/// - Any other error is returned immediately.
///
/// When every backend fails recoverably the last error is returned inside
/// [`NewsError::AllBackendsFailed`] with the number of attempts made.
pub async fn execute<'a, B, T, F, Fut>(order: &[&'a B], mut call: F) -> Result<Fetched<T>, NewsError>
where
    B: NewsBackend + 'a,
    F: FnMut(&'a B) -> Fut,
    Fut: Future<Output = Result<T, NewsError>>,
{
    if order.is_empty() {
        return Err(NewsError::NoBackendConfigured);
    }

    let mut failures: Vec<AttemptFailure> = Vec::new();
    for (index, &backend) in order.iter().enumerate() {
        let provider = backend.provider();
        let t0 = Instant::now();
        debug!(%provider, attempt = index + 1, of = order.len(), "attempting backend");

        match Attempt::from(call(backend).await) {
            Attempt::Success(data) => {
                info!(
                    %provider,
                    attempts = index + 1,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "backend answered"
                );
                return Ok(Fetched {
                    provider,
                    data,
                    failures,
                });
            }
            Attempt::Recoverable(error) => {
                warn!(
                    %provider,
                    attempt = index + 1,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    error = %error,
                    "backend failed; trying next"
                );
                failures.push(AttemptFailure { provider, error });
            }
            Attempt::Fatal(error) => {
                warn!(%provider, error = %error, "backend failed; not falling back");
                return Err(error);
            }
        }
    }

    let attempts = failures.len();
    match failures.pop() {
        Some(last) => Err(NewsError::AllBackendsFailed {
            attempts,
            last: Box::new(last.error),
        }),
        None => Err(NewsError::NoBackendConfigured),
    }
}
