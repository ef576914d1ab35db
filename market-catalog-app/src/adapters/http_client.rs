//! HTTP request helpers shared by the catalog API adapter
//!
//! Sending, status classification, logging and JSON decoding live here so the
//! adapter only builds requests and interprets bodies.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use market_catalog_core::error::{CoreError, CoreResult};

/// Longest response excerpt written to the log
const LOG_EXCERPT_CHARS: usize = 256;

/// Cut a response body down for logging, keeping char boundaries
pub fn truncate_for_log(s: &str) -> String {
    match s.char_indices().nth(LOG_EXCERPT_CHARS) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}... [truncated, total {} bytes]", &s[..cut], s.len()),
    }
}

/// Error body shapes returned by the console API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<String>,
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Send a request and return status code and body text.
    ///
    /// Transport failures map to `Timeout`/`NetworkError`, gateway errors (502-504)
    /// to `NetworkError`. Other statuses are returned as-is.
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method: &str,
        url: &str,
    ) -> CoreResult<(u16, String)> {
        log::debug!("[market-api] {method} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                CoreError::Timeout(format!("{method} {url}: {e}"))
            } else {
                CoreError::NetworkError(format!("{method} {url}: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CoreError::NetworkError(format!("Failed to read response body: {e}")))?;
        log::debug!(
            "[market-api] Response {status}: {}",
            truncate_for_log(&body)
        );

        if matches!(status, 502..=504) {
            log::warn!("[market-api] Gateway error (HTTP {status}) for {method} {url}");
            return Err(CoreError::NetworkError(format!("HTTP {status}")));
        }
        Ok((status, body))
    }

    /// Reject non-2xx statuses, carrying the server's message
    pub fn ensure_success(status: u16, body: &str) -> CoreResult<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        Err(CoreError::ApiError {
            status: Some(status),
            message: Self::error_message(status, body),
        })
    }

    /// `message` or `result` from a JSON error body, else the (truncated) raw body
    pub fn error_message(status: u16, body: &str) -> String {
        let parsed = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.result));
        match parsed {
            Some(message) if !message.is_empty() => message,
            _ if body.trim().is_empty() => format!("HTTP {status}"),
            _ => truncate_for_log(body.trim()),
        }
    }

    /// Decode a JSON body
    pub fn parse_json<T>(body: &str, context: &str) -> CoreResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(body).map_err(|e| {
            log::error!("[market-api] {context}: JSON parse failed: {e}");
            log::error!("[market-api] Raw response: {}", truncate_for_log(body));
            CoreError::SerializationError(e.to_string())
        })
    }
}
