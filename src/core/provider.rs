//! Quota source trait and fetch settings

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::{Quota, QuotaError};

/// Settings shared by every fetch
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Status page to scrape
    pub url: Url,

    /// Upper bound for the whole HTTP request
    pub timeout: Duration,
}

impl FetchContext {
    pub fn new(url: Url, timeout_secs: u64) -> Self {
        Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Something that can produce the current billing period's quota
#[async_trait]
pub trait QuotaSource {
    /// Display name used in logs and error context
    fn name(&self) -> &'static str;

    async fn retrieve(&self, ctx: &FetchContext) -> Result<Quota, QuotaError>;
}
