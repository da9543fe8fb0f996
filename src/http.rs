//! Shared HTTP transport for provider backends.
//!
//! Provides one configured [`reqwest::Client`] for the whole process and a
//! single GET helper that turns transport failures and HTTP status codes
//! into [`NewsError`] kinds. Each backend layers its own provider-specific
//! classification on top of [`classify_status`].

use crate::error::NewsError;
use crate::models::ProviderId;
use crate::utils::truncate_for_log;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Provider-native query parameters, ordered for deterministic URLs.
pub type ProviderParams = BTreeMap<&'static str, String>;

/// How a backend attaches its credential to a request.
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// Sent as a request header, e.g. `X-Api-Key`.
    Header(&'static str, &'a str),
    /// Sent as a query parameter, e.g. `api-key`.
    Query(&'static str, &'a str),
}

/// A response that made it back over the wire.
#[derive(Debug)]
pub struct RawReply {
    pub status: StatusCode,
    /// Decoded body, `None` when it was not JSON.
    pub body: Option<Value>,
    /// First few hundred characters of a non-JSON body, for diagnostics.
    pub preview: String,
}

/// Build the [`reqwest::Client`] shared by every backend.
///
/// The client has:
/// - The configured per-request timeout
/// - A `diego/<version>` User-Agent
/// - `Accept: application/json` on every request
///
/// # Errors
///
/// Returns [`NewsError::Configuration`] if the client cannot be constructed.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, NewsError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("diego/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()
        .map_err(|e| NewsError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Parse a base URL, making sure relative endpoint joins append to it.
pub fn parse_base_url(raw: &str) -> Result<Url, NewsError> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|e| NewsError::Configuration(format!("invalid base URL '{raw}': {e}")))
}

/// Join an endpoint path onto a base URL produced by [`parse_base_url`].
pub fn endpoint(base: &Url, path: &str) -> Result<Url, NewsError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| NewsError::Configuration(format!("invalid endpoint '{path}': {e}")))
}

/// Issue one GET request and read the whole body.
///
/// Only failures to get a response at all (DNS, connect, timeout, body
/// read) are errors here; every HTTP status comes back as a [`RawReply`].
#[instrument(level = "debug", skip_all, fields(%provider, endpoint = %url.path()))]
pub async fn get_json(
    client: &reqwest::Client,
    provider: ProviderId,
    url: Url,
    params: &ProviderParams,
    credential: Credential<'_>,
) -> Result<RawReply, NewsError> {
    let t0 = Instant::now();
    let mut request = client.get(url).query(params);
    request = match credential {
        Credential::Header(name, value) => request.header(name, value),
        Credential::Query(name, value) => request.query(&[(name, value)]),
    };

    let response = request.send().await.map_err(|e| transport_error(provider, e))?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| transport_error(provider, e))?;
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    let body = serde_json::from_slice::<Value>(&bytes).ok();
    let preview = if body.is_some() {
        String::new()
    } else {
        truncate_for_log(&String::from_utf8_lossy(&bytes), 200)
    };
    debug!(status = status.as_u16(), elapsed_ms, json = body.is_some(), "provider responded");

    Ok(RawReply { status, body, preview })
}

/// The request URL is dropped before formatting: a query-string credential
/// would otherwise show up in the message.
fn transport_error(provider: ProviderId, e: reqwest::Error) -> NewsError {
    let endpoint = e.url().map(|u| u.path().to_string());
    let e = e.without_url();
    let kind = if e.is_timeout() {
        "request timed out"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    let message = match endpoint {
        Some(endpoint) => format!("{kind} ({endpoint}): {e}"),
        None => format!("{kind}: {e}"),
    };
    warn!(%provider, error = %message, "transport failure");
    NewsError::Transport { provider, message }
}

/// Map an HTTP status onto the error taxonomy.
///
/// - 401/403 -> [`NewsError::Authentication`]
/// - 429 -> [`NewsError::RateLimited`]
/// - any status with a JSON body -> the body, for the normalizer to read
///   (an error envelope becomes an in-band `status=error` result)
/// - any status without a JSON body -> [`NewsError::Provider`]
pub fn classify_status(provider: ProviderId, reply: RawReply) -> Result<Value, NewsError> {
    let code = reply.status.as_u16();
    match reply.status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(NewsError::Authentication {
            provider,
            message: error_message(reply.body.as_ref()).unwrap_or_else(|| format!("HTTP {code}")),
        }),
        StatusCode::TOO_MANY_REQUESTS => Err(NewsError::RateLimited {
            provider,
            message: error_message(reply.body.as_ref())
                .unwrap_or_else(|| "too many requests, wait and try again".to_string()),
        }),
        _ => match reply.body {
            Some(body) => Ok(body),
            None => {
                warn!(%provider, status = code, preview = %reply.preview, "non-JSON response body");
                Err(NewsError::Provider {
                    provider,
                    status: Some(code),
                    message: "response body is not valid JSON".to_string(),
                })
            }
        },
    }
}

/// Pull a human-readable message out of either provider's error envelope.
pub fn error_message(body: Option<&Value>) -> Option<String> {
    let body = body?;
    body.get("message")
        .or_else(|| body.get("response").and_then(|r| r.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
