//! Crawl frontier controller: breadth-first traversal under the page and
//! depth caps, driving one analysis at a time over a shared rendering
//! session and streaming each report as it completes.

use crate::analyzer::PageAnalyzer;
use crate::config::CrawlConfig;
use crate::error::AuditError;
use crate::frontier::Frontier;
use crate::report::PageReport;
use crate::spell;
use fantoccini::{Client, ClientBuilder};
use tokio::sync::mpsc;
use url::Url;

/// One streamed item: a completed page report, or the terminal fault that
/// ended the crawl early.
pub type CrawlItem = Result<PageReport, AuditError>;

/// Starts a crawl and returns a receiver yielding one item per completed
/// page, in completion order.
///
/// Failure to reach a WebDriver server is the one fault that aborts before
/// anything streams; every page-level failure is absorbed into its report.
pub async fn start(config: &CrawlConfig) -> Result<mpsc::Receiver<CrawlItem>, AuditError> {
    ::log::info!("Starting crawl of {}", config.start_url);

    let start_url =
        Url::parse(&config.start_url).map_err(|source| AuditError::InvalidStartUrl {
            url: config.start_url.clone(),
            source,
        })?;

    let client = connect_to_webdriver(&config.webdriver_url)
        .await
        .ok_or_else(|| AuditError::WebDriverUnavailable(config.webdriver_url.clone()))?;

    let (result_tx, result_rx) = mpsc::channel::<CrawlItem>(100);
    let config = config.clone();

    tokio::spawn(async move {
        run_crawl(client, config, start_url, result_tx).await;
    });

    Ok(result_rx)
}

/// The single-flight traversal loop. The rendering session is shared across
/// all pages of the crawl and torn down exactly once on every exit path.
async fn run_crawl(
    mut client: Client,
    config: CrawlConfig,
    start_url: Url,
    result_tx: mpsc::Sender<CrawlItem>,
) {
    let spell = spell::load_optional(config.dictionary_path.as_deref());
    let mut frontier = Frontier::new(&start_url);
    let max_pages = config.effective_max_pages();
    let mut analyzed = 0usize;
    let crawl_start = std::time::Instant::now();

    while analyzed < max_pages {
        let Some(entry) = frontier.pop() else {
            // Frontier exhausted before the cap: a small site, not an error.
            ::log::info!("Frontier exhausted after {} pages", analyzed);
            break;
        };

        // Marking at dequeue time keeps re-discovered links from ever being
        // analyzed twice; a rejected mark is a discard, not a page.
        if !frontier.mark_visited(&entry.url) {
            ::log::debug!("Skipping already visited: {}", entry.url);
            continue;
        }

        ::log::info!(
            "Analyzing page {}/{} (depth {}): {}",
            analyzed + 1,
            max_pages,
            entry.depth,
            entry.url
        );

        let mut report = PageAnalyzer::new(&client, &config, spell.as_ref())
            .analyze(&entry.url)
            .await;

        if session_lost(&report) {
            match attempt_reconnect(&config.webdriver_url).await {
                Some(new_client) => {
                    client = new_client;
                    report = PageAnalyzer::new(&client, &config, spell.as_ref())
                        .analyze(&entry.url)
                        .await;
                }
                None => {
                    ::log::error!("WebDriver session lost; aborting crawl");
                    let fault = AuditError::SessionLost(
                        report.error.unwrap_or_else(|| "session unavailable".to_string()),
                    );
                    let _ = result_tx.send(Err(fault)).await;
                    break;
                }
            }
        }

        let links = report.links.clone();
        if result_tx.send(Ok(report)).await.is_err() {
            ::log::info!("Result consumer dropped, stopping crawl");
            break;
        }
        analyzed += 1;

        if entry.depth < config.max_depth {
            match Url::parse(&entry.url) {
                Ok(base) => {
                    for href in &links {
                        frontier.admit(&base, href, entry.depth + 1);
                    }
                }
                Err(e) => ::log::warn!("Cannot resolve links against {}: {}", entry.url, e),
            }
        }
    }

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }

    ::log::info!(
        "Crawl complete: {} pages in {:.2} seconds",
        analyzed,
        crawl_start.elapsed().as_secs_f64()
    );
}

fn session_lost(report: &PageReport) -> bool {
    report
        .error
        .as_deref()
        .is_some_and(|e| e.contains("Unable to find session"))
}

/// Connects to the WebDriver instance, trying common alternatives when the
/// configured URL is unreachable.
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // Selenium/geckodriver default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }
        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "No WebDriver server reachable; set WEBDRIVER_URL or start one at {}",
        webdriver_url
    );
    None
}

/// One reconnection attempt after a lost session
async fn attempt_reconnect(webdriver_url: &str) -> Option<Client> {
    ::log::warn!("Attempting to reconnect WebDriver session");
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::info!("Successfully reconnected to WebDriver");
            Some(client)
        }
        Err(e) => {
            ::log::error!("Failed to reconnect to WebDriver: {}", e);
            None
        }
    }
}
