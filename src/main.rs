use clap::Parser;
use sitegauge::{CrawlConfig, SiteAudit};

mod args;
use args::{Args, qualify_url};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();
    let start_url = qualify_url(&args.url);

    ::log::info!("Starting audit of {}", start_url);

    println!("Note: auditing requires a WebDriver server (e.g. ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL or --webdriver-url if not using the default http://localhost:4444"
    );

    let mut audit = match &args.config {
        Some(path) => {
            let config = match CrawlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    ::log::error!("Failed to load config {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            SiteAudit::new(&start_url).with_config(CrawlConfig {
                start_url: start_url.clone(),
                ..config
            })
        }
        None => SiteAudit::new(&start_url),
    };

    // Flags override config-file values only when actually passed
    if let Some(max_pages) = args.max_pages {
        audit = audit.with_max_pages(max_pages);
    }
    if let Some(max_depth) = args.max_depth {
        audit = audit.with_max_depth(max_depth);
    }
    if let Some(url) = &args.webdriver_url {
        audit = audit.with_webdriver_url(url);
    }
    if let Some(path) = &args.dictionary {
        audit = audit.with_dictionary(path);
    }

    // Start the crawl and get a receiver for page reports
    let mut rx = match audit.generate().await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start crawl: {}", e);
            std::process::exit(1);
        }
    };

    // Emit one JSON object per line as pages complete
    let mut pages_processed = 0;
    let start_time = std::time::Instant::now();

    while let Some(item) = rx.recv().await {
        match item {
            Ok(report) => {
                pages_processed += 1;
                ::log::info!("Completed page {}: {}", pages_processed, report.url);
                match serde_json::to_string(&report) {
                    Ok(line) => println!("{}", line),
                    Err(e) => ::log::error!("Failed to serialize report: {}", e),
                }
            }
            Err(e) => {
                ::log::error!("Crawl aborted: {}", e);
                std::process::exit(1);
            }
        }
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Audit complete - {} pages in {:.2} seconds",
        pages_processed,
        duration.as_secs_f64()
    );
}
