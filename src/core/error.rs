//! Error taxonomy for retrieving and computing a quota

use chrono::NaiveDate;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while fetching, extracting or computing a quota
#[derive(Debug, Error)]
pub enum QuotaError {
    /// Network, DNS, timeout or body read failure
    #[error("fetching quota page failed")]
    Transport(#[source] reqwest::Error),

    /// The status page answered with something other than 200
    #[error("fetching quota page: got HTTP {0}, expected 200")]
    HttpStatus(u16),

    /// The body could not be turned into an HTML document
    #[error("parsing quota page: {0}")]
    Parse(String),

    /// The page parsed fine but the expected elements or patterns are gone
    #[error("extracting quota: unexpected page layout: {reason}")]
    Layout {
        reason: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Rate metrics are undefined until some time has passed since the period started
    #[error("computing quota: no time has elapsed since the period started on {start}")]
    NoElapsedTime { start: NaiveDate },
}

impl QuotaError {
    /// Layout mismatch without an underlying cause
    pub fn layout(reason: impl Into<String>) -> Self {
        Self::Layout {
            reason: reason.into(),
            source: None,
        }
    }

    /// Layout mismatch caused by a failed parse of the element's text
    pub fn layout_with(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Layout {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_layout_with_keeps_source() {
        let err = QuotaError::layout_with("limit cell", std::fmt::Error);
        assert!(matches!(err, QuotaError::Layout { .. }));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "extracting quota: unexpected page layout: limit cell"
        );
    }

    #[test]
    fn test_http_status_message() {
        assert_eq!(
            QuotaError::HttpStatus(503).to_string(),
            "fetching quota page: got HTTP 503, expected 200"
        );
    }
}
