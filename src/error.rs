use thiserror::Error;

/// Faults that make the rest of a crawl impossible.
///
/// Page-level failures never appear here; they are absorbed into the
/// `error` field of the affected [`crate::report::PageReport`] so one bad
/// page cannot sacrifice the crawl.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("invalid start URL {url}: {source}")]
    InvalidStartUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("failed to reach a WebDriver server at {0} (or any fallback)")]
    WebDriverUnavailable(String),

    #[error("WebDriver session lost and could not be reestablished: {0}")]
    SessionLost(String),
}
