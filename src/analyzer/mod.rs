//! Per-page analysis: one load, one static extraction pass, a three-viewport
//! sweep, then pure content scoring over the extracted facts.

pub mod extract;
pub mod viewport;

use crate::config::CrawlConfig;
use crate::report::{
    ContentIssues, ContentMetrics, ContentQuality, EeatSignals, PageReport, UxIssues, VisualIssues,
};
use crate::scoring;
use crate::spell::{self, SpellChecker};
use fantoccini::Client;
use fantoccini::error::CmdError;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Reads the final document's HTTP status from the Navigation Timing entry;
/// browsers that do not report one fall back to 200.
const STATUS_JS: &str = r#"
const entries = performance.getEntriesByType('navigation');
if (entries.length > 0 && entries[0].responseStatus) return entries[0].responseStatus;
return 200;
"#;

/// Drives one rendering session through the full per-page protocol.
pub struct PageAnalyzer<'a> {
    client: &'a Client,
    config: &'a CrawlConfig,
    spell: Option<&'a SpellChecker>,
}

impl<'a> PageAnalyzer<'a> {
    pub fn new(
        client: &'a Client,
        config: &'a CrawlConfig,
        spell: Option<&'a SpellChecker>,
    ) -> Self {
        Self {
            client,
            config,
            spell,
        }
    }

    /// Analyze one page. Never lets a failure escape: anything the protocol
    /// cannot absorb becomes a degraded report with `error` set, so one bad
    /// page cannot abort the crawl.
    pub async fn analyze(&self, url: &str) -> PageReport {
        match self.run(url).await {
            Ok(report) => report,
            Err(e) => {
                ::log::error!("Analysis of {} failed: {}", url, e);
                PageReport::failed(url, 0, 0, e.to_string())
            }
        }
    }

    async fn run(&self, url: &str) -> Result<PageReport, CmdError> {
        let page_url = match url::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(PageReport::failed(url, 0, 0, format!("invalid URL: {}", e)));
            }
        };

        // Load at the Desktop size; the static pass reads this rendering.
        let desktop = viewport::VIEWPORTS[0];
        self.client
            .set_window_size(desktop.width, desktop.height)
            .await?;

        let started = Instant::now();
        let load_timeout = Duration::from_secs(self.config.load_timeout_secs);
        let timed_out = match timeout(load_timeout, self.client.goto(url)).await {
            Ok(Ok(())) => false,
            Ok(Err(e)) => {
                ::log::error!("Failed to load {}: {}", url, e);
                let elapsed = started.elapsed().as_millis() as u64;
                return Ok(PageReport::failed(url, 0, elapsed, e.to_string()));
            }
            Err(_) => {
                // Not fatal: analyze whatever partially rendered, with the
                // zero status sentinel marking the partial load.
                ::log::warn!("Load of {} timed out after {:?}", url, load_timeout);
                true
            }
        };
        let response_time = started.elapsed().as_millis() as u64;

        let status_code = if timed_out { 0 } else { self.fetch_status().await };
        if status_code >= 400 {
            ::log::warn!("{} returned HTTP {}", url, status_code);
            return Ok(PageReport::failed(
                url,
                status_code,
                response_time,
                format!("HTTP {}", status_code),
            ));
        }

        let html = self.client.source().await?;
        let facts = extract::extract(&html, &page_url);

        let viewports = viewport::sweep(self.client, self.config, url).await?;

        // Pure computation from here on; no further session interaction.
        let tokens = scoring::tokenize(&facts.body_text);
        let word_count = tokens.len();
        let syllables: usize = tokens.iter().map(|t| scoring::count_syllables(t)).sum();
        let sentences = scoring::sentence_count(&facts.body_text);
        let readability = scoring::flesch_reading_ease(word_count, sentences, syllables);
        let structure = scoring::structure_score(facts.structural_containers);
        let keywords = scoring::top_keywords(&tokens);

        let seo = scoring::seo_score(&scoring::SeoFacts {
            title: &facts.title,
            meta_description: &facts.meta_description,
            has_h1: facts.h1.is_some(),
            images_missing_alt: facts.missing_alt_tags,
            word_count,
            headings: &facts.headings,
            top_keywords: &keywords,
        });
        let ai = scoring::ai_score(&scoring::AiFacts {
            has_schema: facts.has_schema,
            schema_types: &facts.schema_types,
            structure_score: structure,
            readability_score: readability,
            headings: &facts.headings,
            has_author: facts.has_author,
            has_date: facts.has_date,
        });

        let metrics = ContentMetrics {
            word_count,
            readability_score: readability,
            structure_score: structure,
            seo_score: seo,
            ai_score: ai,
            has_schema: facts.has_schema,
            schema_types: facts.schema_types.clone(),
            headings: facts.headings.clone(),
            question_headings: scoring::question_heading_count(&facts.headings),
            top_keywords: keywords,
            paragraph_count: facts.paragraph_count,
            eeat_signals: EeatSignals {
                has_author: facts.has_author,
                has_date: facts.has_date,
            },
            content_quality: ContentQuality {
                long_paragraphs: facts.long_paragraphs,
                text_to_code_ratio: scoring::text_to_code_ratio(
                    facts.body_text.chars().count(),
                    facts.document_bytes,
                ),
            },
        };

        Ok(PageReport {
            url: url.to_string(),
            title: facts.title,
            meta_description: facts.meta_description,
            h1: facts.h1,
            response_time,
            status_code,
            error: None,
            links: facts.links,
            ux_issues: UxIssues {
                missing_alt_tags: facts.missing_alt_tags,
                empty_links: facts.empty_links,
                has_viewport_meta: facts.has_viewport_meta,
                h1_count: facts.h1_count,
            },
            visual_issues: VisualIssues {
                images_missing_dimensions: facts.images_missing_dimensions,
                long_words: scoring::long_word_count(&tokens),
                viewports,
            },
            content_issues: ContentIssues {
                possible_typos: spell::possible_typos(&tokens, self.spell),
            },
            content_metrics: Some(metrics),
        })
    }

    async fn fetch_status(&self) -> u16 {
        match self.client.execute(STATUS_JS, vec![]).await {
            Ok(value) => value.as_u64().map(|s| s as u16).unwrap_or(200),
            Err(e) => {
                ::log::debug!("Could not read navigation status, assuming 200: {}", e);
                200
            }
        }
    }
}
