//! HTTP exchange with the search backend.
//!
//! One request per call, no retries. A call succeeds only when the status is
//! 2xx and the body parses as JSON; everything else is an error.

use crate::config::ClientOptions;
use crate::error::SearchError;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use std::time::Duration;

/// Content type sent with every JSON request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Build the [`reqwest::Client`] a search client uses for its lifetime.
///
/// A timeout is applied only when `options.timeout_seconds` is set.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(options: &ClientOptions) -> Result<reqwest::Client, SearchError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = options.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// POST `body` as JSON to `url` with bearer `token`, returning the parsed body.
///
/// # Errors
///
/// - [`SearchError::Http`] if the request cannot be sent or the body read
/// - [`SearchError::Status`] on a non-success status
/// - [`SearchError::Parse`] if the body is not JSON
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    token: &str,
    body: &serde_json::Value,
) -> Result<serde_json::Value, SearchError> {
    let payload = serde_json::to_vec(body)
        .map_err(|e| SearchError::Parse(format!("failed to encode request body: {e}")))?;

    let request = client
        .post(url)
        .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
        .bearer_auth(token)
        .body(payload);

    send(request, url).await
}

/// GET `url` with bearer `token`, returning the parsed JSON body.
///
/// # Errors
///
/// Same as [`post_json`].
pub async fn get_json(
    client: &reqwest::Client,
    url: &str,
    token: &str,
) -> Result<serde_json::Value, SearchError> {
    send(client.get(url).bearer_auth(token), url).await
}

async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<serde_json::Value, SearchError> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(url, error = %e, "search request failed");
        SearchError::Http(format!("request to {url} failed: {e}"))
    })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| SearchError::Http(format!("failed to read response from {url}: {e}")))?;

    if !status.is_success() {
        tracing::warn!(url, status = status.as_u16(), "search backend rejected request");
        return Err(SearchError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    tracing::trace!(bytes = text.len(), "search response received");

    serde_json::from_str(&text)
        .map_err(|e| SearchError::Parse(format!("response from {url} is not valid JSON: {e}")))
}
