//! Vodafone QuickCheck provider
//!
//! Scrapes the data volume status page that the carrier serves to devices
//! on its mobile network. No login is involved; the page identifies the
//! subscriber by the connection it is requested over.

mod extractor;
mod fetcher;
#[cfg(test)]
mod test_support;

use async_trait::async_trait;

use crate::core::{FetchContext, Quota, QuotaError, QuotaSource};

pub use extractor::extract;
pub use fetcher::fetch_document;

/// QuickCheck status page
pub const QUICKCHECK_URL: &str = "http://quickcheck.vodafone.de/";

/// QuickCheck quota source
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickCheckProvider;

impl QuickCheckProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuotaSource for QuickCheckProvider {
    fn name(&self) -> &'static str {
        "QuickCheck"
    }

    async fn retrieve(&self, ctx: &FetchContext) -> Result<Quota, QuotaError> {
        tracing::debug!(url = %ctx.url, timeout = ?ctx.timeout, "Fetching QuickCheck status page");

        let client = fetcher::build_client(ctx)?;
        let document = fetch_document(&client, ctx.url.as_str()).await?;
        let quota = extract(&document)?;

        tracing::info!(
            start = %quota.start,
            limit = quota.limit,
            used = quota.used,
            "Retrieved QuickCheck quota"
        );
        Ok(quota)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_support::{serve_once, QUICKCHECK_PAGE};
    use url::Url;

    fn ctx(url: &str) -> FetchContext {
        FetchContext::new(Url::parse(url).unwrap(), 5)
    }

    #[tokio::test]
    async fn test_retrieve_sample_page() {
        let url = serve_once("200 OK", Some("text/html"), QUICKCHECK_PAGE);
        let quota = QuickCheckProvider::new().retrieve(&ctx(&url)).await.unwrap();
        assert_eq!(quota.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(quota.limit, 10_000_000_000);
        assert_eq!(quota.used, 3_000_000_000);
    }

    #[tokio::test]
    async fn test_retrieve_changed_layout() {
        let url = serve_once(
            "200 OK",
            Some("text/html"),
            "<html><body><h1>Neues Design</h1></body></html>",
        );
        let err = QuickCheckProvider::new()
            .retrieve(&ctx(&url))
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::Layout { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_retrieve_server_error() {
        let url = serve_once("500 Internal Server Error", Some("text/html"), "oops");
        let err = QuickCheckProvider::new()
            .retrieve(&ctx(&url))
            .await
            .unwrap_err();
        assert!(matches!(err, QuotaError::HttpStatus(500)));
    }
}
