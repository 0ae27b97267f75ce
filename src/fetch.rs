//! Page fetching with a browser-like identity and a fixed timeout.
//!
//! One [`reqwest::Client`] is built per run and shared across all URLs.
//! There is deliberately no retry or backoff here: a URL that fails to
//! fetch degrades to an error row in the report and the batch moves on.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// User-Agent presented to audited sites. Some news CMSes serve a stripped
/// page (or a 403) to clients that do not look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Typed outcome of a failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The input string could not be turned into an absolute URL.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure: DNS, connect, TLS, or timeout.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Status { status: u16 },
}

/// A successfully fetched page: raw markup plus the post-redirect URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL the body was actually served from.
    pub final_url: String,
    /// Raw HTML markup.
    pub body: String,
}

/// Build the shared HTTP client used for every audit request.
pub fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Prepend `https://` when the input has no scheme.
///
/// Users paste bare hosts like `example.com/story` into the URL field;
/// everything else is passed through untouched.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Fetch one page.
///
/// Issues a GET with the browser User-Agent and the client's timeout.
/// Non-2xx statuses are converted to [`FetchError::Status`] so the caller
/// can degrade to an error row instead of parsing an error page.
#[instrument(level = "info", skip(client), fields(%url))]
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let absolute = normalize_url(url);
    url::Url::parse(&absolute).map_err(|source| FetchError::InvalidUrl {
        url: absolute.clone(),
        source,
    })?;

    let response = client.get(&absolute).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response.text().await?;
    info!(bytes = body.len(), %final_url, "Fetched page");
    debug!(status = status.as_u16(), "Response status");

    Ok(FetchedPage { final_url, body })
}
