use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sitegauge")]
#[command(about = "Crawls a site and streams per-page quality reports as NDJSON")]
#[command(version)]
pub struct Args {
    /// URL to start crawling from (https:// is assumed when no scheme is given)
    pub url: String,

    /// Maximum number of pages to analyze (1-100; default 20)
    #[arg(short = 'p', long)]
    pub max_pages: Option<usize>,

    /// Maximum link depth from the start URL (default 2)
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,

    /// WebDriver server URL (also settable via WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// One-word-per-line dictionary file enabling typo detection
    #[arg(long)]
    pub dictionary: Option<String>,

    /// JSON configuration file (CLI flags take precedence)
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Prefix https:// when the caller omitted the scheme
pub fn qualify_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualifies_bare_hostnames() {
        assert_eq!(qualify_url("example.com"), "https://example.com");
        assert_eq!(qualify_url("http://example.com"), "http://example.com");
        assert_eq!(qualify_url("https://example.com"), "https://example.com");
    }

    #[test]
    fn caps_are_absent_unless_passed() {
        let args = Args::try_parse_from(["sitegauge", "example.com"]).unwrap();
        assert_eq!(args.max_pages, None);
        assert_eq!(args.max_depth, None);

        let args =
            Args::try_parse_from(["sitegauge", "example.com", "--max-pages", "5"]).unwrap();
        assert_eq!(args.max_pages, Some(5));
        assert_eq!(args.max_depth, None);
    }
}
