//! Crawl a bounded subset of a website and stream a per-page quality report
//! combining SEO, accessibility, visual-stability and content signals.

// Re-export modules
pub mod analyzer;
pub mod config;
pub mod crawler;
pub mod error;
pub mod frontier;
pub mod report;
pub mod scoring;
pub mod spell;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::CrawlConfig;
pub use crawler::CrawlItem;
pub use error::AuditError;
pub use report::PageReport;

use tokio::sync::mpsc;

/// Builder for one crawl-and-audit run.
///
/// ```no_run
/// # async fn demo() -> Result<(), sitegauge::AuditError> {
/// let mut pages = sitegauge::SiteAudit::new("https://example.com")
///     .with_max_pages(10)
///     .with_max_depth(2)
///     .generate()
///     .await?;
/// while let Some(item) = pages.recv().await {
///     let report = item?;
///     println!("{}: seo issues on {} links", report.url, report.links.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct SiteAudit {
    config: CrawlConfig,
}

impl SiteAudit {
    /// Create a new audit for the given start URL with default options
    pub fn new(start_url: &str) -> Self {
        Self {
            config: CrawlConfig::new(start_url),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: CrawlConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the configuration from a JSON file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        self.config = CrawlConfig::from_file(path)?;
        Ok(self)
    }

    /// Cap the number of analyzed pages (clamped to [1, 100])
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Bound exploration depth from the start URL
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Point at a specific WebDriver server
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Enable typo detection with a one-word-per-line dictionary file
    pub fn with_dictionary(mut self, path: &str) -> Self {
        self.config.dictionary_path = Some(path.to_string());
        self
    }

    /// Start the crawl and get a receiver for per-page reports
    pub async fn generate(self) -> Result<mpsc::Receiver<CrawlItem>, AuditError> {
        let mut config = self.config;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }

        crawler::start(&config).await
    }
}
