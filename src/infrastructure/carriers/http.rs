//! Shared HTTP plumbing for carrier providers.
//!
//! Classifies transport failures and HTTP statuses into [`TrackingError`]
//! kinds the same way for every carrier, so providers only deal with their
//! own response shapes.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::entities::Carrier;
use crate::domain::errors::TrackingError;

/// Upper bound for establishing a TCP/TLS connection to a carrier.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Builds the HTTP client shared by all providers.
///
/// `timeout` bounds the whole request, including reading the body.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Maps a transport-level failure from `send()` or body reads.
pub(crate) fn transport_error(carrier: Carrier, e: reqwest::Error) -> TrackingError {
    if e.is_timeout() {
        TrackingError::unavailable(carrier, "request timed out")
    } else if e.is_connect() {
        TrackingError::unavailable(carrier, format!("connection failed: {e}"))
    } else if e.is_decode() {
        TrackingError::response(carrier, format!("failed to read body: {e}"))
    } else if e.is_builder() {
        // Never sent, so retrying cannot help.
        TrackingError::response(carrier, format!("request could not be built: {e}"))
    } else {
        TrackingError::unavailable(carrier, format!("request failed: {e}"))
    }
}

/// Checks the HTTP status, turning failures into the matching error kind.
///
/// | Status | Result |
/// |---|---|
/// | 2xx | passes the response through |
/// | 404 | [`TrackingError::NotFound`] |
/// | 408, 429, 5xx | [`TrackingError::CarrierUnavailable`] |
/// | other | [`TrackingError::CarrierResponse`] (401/403 mean bad credentials) |
pub(crate) async fn check_status(
    carrier: Carrier,
    tracking_number: &str,
    response: Response,
) -> Result<Response, TrackingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    let body = truncate(&body, 256);

    Err(match status {
        StatusCode::NOT_FOUND => TrackingError::not_found(carrier, tracking_number),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            TrackingError::unavailable(carrier, format!("status {status}: {body}"))
        }
        s if s.is_server_error() => {
            TrackingError::unavailable(carrier, format!("status {status}: {body}"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TrackingError::response(
            carrier,
            format!("credentials rejected with status {status}"),
        ),
        _ => TrackingError::response(carrier, format!("status {status}: {body}")),
    })
}

/// Reads the body and decodes it as JSON.
///
/// A timeout while reading is still [`TrackingError::CarrierUnavailable`];
/// a body that is not the expected JSON is [`TrackingError::CarrierResponse`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    carrier: Carrier,
    response: Response,
) -> Result<T, TrackingError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(carrier, e))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TrackingError::response(carrier, format!("invalid JSON: {e}")))
}

/// Appends path segments to a carrier base URL.
///
/// Segments are percent-encoded, so a tracking number can be passed as-is.
pub(crate) fn endpoint(carrier: Carrier, base: &Url, segments: &[&str]) -> Result<Url, TrackingError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TrackingError::response(carrier, "base URL cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// URL-encodes a tracking number for a public tracking-page query string.
pub(crate) fn encode(tracking_number: &str) -> String {
    url::form_urlencoded::byte_serialize(tracking_number.as_bytes()).collect()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
