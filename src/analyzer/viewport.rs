//! Multi-viewport layout measurement against the live rendering session.
//!
//! One already-loaded document is re-measured at three fixed window sizes,
//! in a fixed order, so results are comparable across pages and runs.

use crate::config::CrawlConfig;
use crate::report::ViewportIssue;
use crate::utils::sanitize_filename;
use fantoccini::Client;
use fantoccini::error::CmdError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// The fixed measurement sizes, swept in this order
pub const VIEWPORTS: [ViewportSize; 3] = [
    ViewportSize {
        name: "Desktop",
        width: 1920,
        height: 1080,
    },
    ViewportSize {
        name: "Tablet",
        width: 768,
        height: 1024,
    },
    ViewportSize {
        name: "Mobile",
        width: 375,
        height: 667,
    },
];

/// Viewports narrower than this get the tap-target check
const TAP_TARGET_MAX_WIDTH: u32 = 768;

#[derive(Debug, Clone, Copy)]
pub struct ViewportSize {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Horizontal-scroll and overflow measurement, evaluated in the page.
///
/// Scroll detection requires the document to exceed both the viewport width
/// and its own client width by the tolerance margin, which filters out
/// scrollbar width and sub-pixel rounding. Overflow candidates are
/// button-like controls whose content escapes their box, images crossing the
/// right viewport edge from inside it, and top-level blocks wider than the
/// viewport that start near the left edge; anything inside a clipping
/// container is skipped. Identifiers are deduplicated and capped at 5.
const OVERFLOW_JS: &str = r#"
const tol = arguments[0];
const blockTol = arguments[1];
const vw = window.innerWidth;
const doc = document.documentElement;
const horizontalScroll = doc.scrollWidth > vw + tol && doc.scrollWidth > doc.clientWidth + tol;

const offenders = [];
const seen = new Set();
function ident(el) {
    let id = el.tagName.toLowerCase();
    if (el.id) id += '#' + el.id;
    if (typeof el.className === 'string' && el.className.trim())
        id += '.' + el.className.trim().split(/\s+/).join('.');
    return id.slice(0, 80);
}
function clipped(el) {
    const parent = el.parentElement;
    if (!parent) return false;
    const overflow = getComputedStyle(parent).overflowX;
    return overflow === 'hidden' || overflow === 'clip' ||
           overflow === 'auto' || overflow === 'scroll';
}
let overflowCount = 0;
function record(el) {
    overflowCount += 1;
    const key = ident(el);
    if (!seen.has(key)) {
        seen.add(key);
        if (offenders.length < 5) offenders.push(key);
    }
}

for (const el of document.querySelectorAll('button, input[type="submit"], a.button, a.btn')) {
    if (el.scrollWidth > el.clientWidth + tol && !clipped(el)) record(el);
}
for (const img of document.images) {
    const rect = img.getBoundingClientRect();
    if (rect.left < vw && rect.right > vw + tol && !clipped(img)) record(img);
}
const topLevel = document.body ? Array.from(document.body.children) : [];
for (const el of topLevel) {
    const rect = el.getBoundingClientRect();
    if (rect.width > vw + blockTol && rect.left < 16 && !clipped(el)) record(el);
}

return { horizontalScroll: horizontalScroll, overflowCount: overflowCount, offenders: offenders };
"#;

/// Undersized tap targets on narrow viewports: visible interactive elements
/// under 44x44, skipping plain inline text links and anchors with neither a
/// background nor a border (true button-like targets only).
const TAP_TARGET_JS: &str = r#"
const MIN = 44;
let small = 0;
for (const el of document.querySelectorAll('a, button, input, select, textarea')) {
    const rect = el.getBoundingClientRect();
    if (rect.width === 0 || rect.height === 0) continue;
    const style = getComputedStyle(el);
    if (style.display === 'none' || style.visibility === 'hidden') continue;
    if (el.tagName === 'A') {
        if (style.display === 'inline') continue;
        const hasBackground = style.backgroundColor !== 'rgba(0, 0, 0, 0)' &&
                              style.backgroundColor !== 'transparent';
        const hasBorder = parseFloat(style.borderTopWidth) > 0;
        if (!hasBackground && !hasBorder) continue;
    }
    if (rect.width < MIN || rect.height < MIN) small += 1;
}
return small;
"#;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverflowMeasurement {
    horizontal_scroll: bool,
    overflow_count: usize,
    offenders: Vec<String>,
}

/// Re-measure the loaded document at every fixed viewport size.
pub async fn sweep(
    client: &Client,
    config: &CrawlConfig,
    url: &str,
) -> Result<Vec<ViewportIssue>, CmdError> {
    let mut issues = Vec::with_capacity(VIEWPORTS.len());

    for size in VIEWPORTS {
        client.set_window_size(size.width, size.height).await?;
        tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;

        let measured = measure_overflow(client, config).await?;

        let small_tap_targets = if size.width < TAP_TARGET_MAX_WIDTH {
            measure_tap_targets(client).await?
        } else {
            0
        };

        let has_issues =
            measured.horizontal_scroll || measured.overflow_count > 0 || small_tap_targets > 0;
        let screenshot = if has_issues {
            capture_screenshot(client, config, url, size.name).await
        } else {
            None
        };

        ::log::debug!(
            "Viewport {} ({}x{}): scroll={}, overflow={}, small taps={}",
            size.name,
            size.width,
            size.height,
            measured.horizontal_scroll,
            measured.overflow_count,
            small_tap_targets
        );

        issues.push(ViewportIssue {
            viewport_name: size.name.to_string(),
            horizontal_scroll_detected: measured.horizontal_scroll,
            overflowing_element_count: measured.overflow_count,
            small_tap_target_count: small_tap_targets,
            offending_element_identifiers: measured.offenders,
            screenshot,
        });
    }

    Ok(issues)
}

async fn measure_overflow(
    client: &Client,
    config: &CrawlConfig,
) -> Result<OverflowMeasurement, CmdError> {
    let value = client
        .execute(
            OVERFLOW_JS,
            vec![
                json!(config.scroll_tolerance_px),
                json!(config.block_tolerance_px),
            ],
        )
        .await?;

    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        ::log::warn!("Unexpected overflow measurement shape: {}", e);
        OverflowMeasurement::default()
    }))
}

async fn measure_tap_targets(client: &Client) -> Result<usize, CmdError> {
    let value = client.execute(TAP_TARGET_JS, vec![]).await?;
    Ok(value.as_u64().unwrap_or(0) as usize)
}

/// Capture a screenshot of the current viewport; failures degrade to `None`
/// so the detected issue is still recorded, just without an image.
async fn capture_screenshot(
    client: &Client,
    config: &CrawlConfig,
    url: &str,
    viewport_name: &str,
) -> Option<String> {
    let bytes = match client.screenshot().await {
        Ok(bytes) => bytes,
        Err(e) => {
            ::log::warn!("Screenshot capture failed for {}: {}", url, e);
            return None;
        }
    };

    let path = format!(
        "{}/{}-{}.png",
        config.screenshot_dir,
        sanitize_filename(url),
        viewport_name.to_lowercase()
    );

    if let Err(e) = tokio::fs::create_dir_all(&config.screenshot_dir).await {
        ::log::warn!("Failed to create {}: {}", config.screenshot_dir, e);
        return None;
    }
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        ::log::warn!("Failed to write screenshot {}: {}", path, e);
        return None;
    }

    ::log::debug!("Captured screenshot: {}", path);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewports_are_fixed_and_ordered() {
        let names: Vec<&str> = VIEWPORTS.iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Desktop", "Tablet", "Mobile"]);
        assert_eq!(VIEWPORTS[0].width, 1920);
        assert_eq!(VIEWPORTS[2].width, 375);
    }

    #[test]
    fn tap_targets_only_measured_on_narrow_viewports() {
        let narrow: Vec<&str> = VIEWPORTS
            .iter()
            .filter(|v| v.width < TAP_TARGET_MAX_WIDTH)
            .map(|v| v.name)
            .collect();
        assert_eq!(narrow, vec!["Mobile"]);
    }

    #[test]
    fn overflow_measurement_parses_browser_shape() {
        let value = serde_json::json!({
            "horizontalScroll": true,
            "overflowCount": 3,
            "offenders": ["button#buy.cta", "img"]
        });
        let measured: OverflowMeasurement = serde_json::from_value(value).unwrap();
        assert!(measured.horizontal_scroll);
        assert_eq!(measured.overflow_count, 3);
        assert_eq!(measured.offenders.len(), 2);
    }
}
