use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of pages a single crawl may analyze, at most
pub const MAX_PAGES_CEILING: usize = 100;

/// Configuration for one crawl invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL to start crawling from (protocol-qualified)
    pub start_url: String,

    /// Page cap; clamped to [1, 100] at use
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the start URL
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Per-page navigation timeout in seconds
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,

    /// Delay after each viewport resize before measuring
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Pixel margin guarding horizontal-scroll detection against scrollbar
    /// width and sub-pixel rounding
    #[serde(default = "default_scroll_tolerance_px")]
    pub scroll_tolerance_px: u32,

    /// Larger margin applied to top-level block containers
    #[serde(default = "default_block_tolerance_px")]
    pub block_tolerance_px: u32,

    /// Directory screenshots of detected issues are written to
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: String,

    /// One-word-per-line dictionary enabling typo detection; absent means
    /// the check is skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<String>,
}

fn default_max_pages() -> usize {
    20
}

fn default_max_depth() -> usize {
    2
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_load_timeout_secs() -> u64 {
    30
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_scroll_tolerance_px() -> u32 {
    8
}

fn default_block_tolerance_px() -> u32 {
    24
}

fn default_screenshot_dir() -> String {
    "screenshots".to_string()
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            webdriver_url: default_webdriver_url(),
            load_timeout_secs: default_load_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            scroll_tolerance_px: default_scroll_tolerance_px(),
            block_tolerance_px: default_block_tolerance_px(),
            screenshot_dir: default_screenshot_dir(),
            dictionary_path: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Page cap clamped into [1, 100]
    pub fn effective_max_pages(&self) -> usize {
        self.max_pages.clamp(1, MAX_PAGES_CEILING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_pages_is_clamped_both_ways() {
        let mut config = CrawlConfig::new("https://example.com");
        config.max_pages = 0;
        assert_eq!(config.effective_max_pages(), 1);
        config.max_pages = 5000;
        assert_eq!(config.effective_max_pages(), 100);
        config.max_pages = 25;
        assert_eq!(config.effective_max_pages(), 25);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: CrawlConfig =
            serde_json::from_str(r#"{"start_url": "https://example.com"}"#).unwrap();
        assert_eq!(config.max_pages, 20);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.load_timeout_secs, 30);
        assert!(config.dictionary_path.is_none());
    }
}
