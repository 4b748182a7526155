//! Single GET of the QuickCheck status page

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use scraper::Html;

use crate::core::{FetchContext, QuotaError};

/// MIME types accepted as an HTML page
const HTML_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Build the HTTP client used for the fetch.
///
/// Redirects follow reqwest's default policy.
pub fn build_client(ctx: &FetchContext) -> Result<reqwest::Client, QuotaError> {
    reqwest::Client::builder()
        .timeout(ctx.timeout)
        .user_agent(concat!("gigatraffic/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(QuotaError::Transport)
}

/// GET `url` and parse the body into an HTML document.
///
/// Anything but 200 fails with [`QuotaError::HttpStatus`] without reading
/// the body. On success the response is consumed by reading its body, which
/// releases the connection.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Html, QuotaError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(QuotaError::Transport)?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!(%url, %status, "Status page returned unexpected status");
        return Err(QuotaError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body = response.text().await.map_err(QuotaError::Transport)?;
    tracing::debug!(bytes = body.len(), "Read status page body");

    parse_document(&body, content_type.as_deref())
}

/// Turn a response body into a document tree.
///
/// The HTML parser recovers from any malformed markup, so only bodies that
/// are empty or declared as something other than HTML are rejected.
pub fn parse_document(body: &str, content_type: Option<&str>) -> Result<Html, QuotaError> {
    if let Some(content_type) = content_type {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !mime.is_empty() && !HTML_TYPES.contains(&mime.as_str()) {
            return Err(QuotaError::Parse(format!("expected an HTML page, got {}", mime)));
        }
    }

    if body.trim().is_empty() {
        return Err(QuotaError::Parse("empty response body".to_string()));
    }

    let document = Html::parse_document(body);
    if !document.errors.is_empty() {
        tracing::debug!(
            errors = document.errors.len(),
            "HTML parser recovered from markup errors"
        );
    }
    Ok(document)
}
