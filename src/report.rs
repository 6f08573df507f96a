use serde::{Deserialize, Serialize};

/// Full quality report for one analyzed page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    /// URL of the page as it was analyzed
    pub url: String,

    /// Document title (empty when the page failed to load)
    pub title: String,

    /// Meta description, falling back to the Open Graph description
    pub meta_description: String,

    /// Text of the first H1, if any
    pub h1: Option<String>,

    /// Navigation-to-ready time in milliseconds
    pub response_time: u64,

    /// HTTP status of the document; 0 signals a timeout/partial load
    pub status_code: u16,

    /// Set when the page could not be analyzed normally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Absolute outbound URLs discovered on the page, in document order
    pub links: Vec<String>,

    pub ux_issues: UxIssues,
    pub visual_issues: VisualIssues,
    pub content_issues: ContentIssues,

    /// Absent exactly when the page failed to load successfully
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_metrics: Option<ContentMetrics>,
}

impl PageReport {
    /// Report shape for a page that could not be analyzed at all.
    ///
    /// Everything except the URL, status and error is empty; `content_metrics`
    /// stays absent so consumers can tell a degraded page from a scored one.
    pub fn failed(url: &str, status_code: u16, response_time: u64, error: String) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            meta_description: String::new(),
            h1: None,
            response_time,
            status_code,
            error: Some(error),
            links: Vec::new(),
            ux_issues: UxIssues::default(),
            visual_issues: VisualIssues::default(),
            content_issues: ContentIssues::default(),
            content_metrics: None,
        }
    }
}

/// Accessibility-oriented counts from the static extraction pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UxIssues {
    pub missing_alt_tags: usize,
    pub empty_links: usize,
    pub has_viewport_meta: bool,
    pub h1_count: usize,
}

/// Layout-stability findings, including the per-viewport sweep results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualIssues {
    pub images_missing_dimensions: usize,
    pub long_words: usize,
    pub viewports: Vec<ViewportIssue>,
}

/// Findings for one fixed viewport size
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportIssue {
    pub viewport_name: String,
    pub horizontal_scroll_detected: bool,
    pub overflowing_element_count: usize,
    pub small_tap_target_count: usize,
    /// tag#id.class identifiers of offenders, deduplicated, at most 5
    pub offending_element_identifiers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIssues {
    /// Up to 5 unique tokens the spell checker flagged
    pub possible_typos: Vec<String>,
}

/// Content-quality scores and facts, computed only for pages that loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub word_count: usize,
    /// Flesch Reading Ease, clamped to [0, 100]
    pub readability_score: u32,
    pub structure_score: u32,
    pub seo_score: u32,
    pub ai_score: u32,
    pub has_schema: bool,
    pub schema_types: Vec<String>,
    pub headings: Vec<Heading>,
    pub top_keywords: Vec<KeywordCount>,
    pub paragraph_count: usize,
    pub question_headings: usize,
    pub eeat_signals: EeatSignals,
    pub content_quality: ContentQuality,
}

/// A heading tag with its text, e.g. `{ "tag": "h2", "text": "Pricing" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub tag: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Heuristic authorship/publication-date evidence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EeatSignals {
    pub has_author: bool,
    pub has_date: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuality {
    /// Paragraphs exceeding 150 words
    pub long_paragraphs: usize,
    /// Extracted-text length over serialized-document byte length
    pub text_to_code_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_report_has_no_metrics() {
        let report = PageReport::failed("https://example.com/a", 404, 12, "HTTP 404".to_string());
        assert_eq!(report.status_code, 404);
        assert_eq!(report.error.as_deref(), Some("HTTP 404"));
        assert!(report.links.is_empty());
        assert!(report.content_metrics.is_none());
    }

    #[test]
    fn report_serializes_camel_case_and_omits_absent_fields() {
        let report = PageReport {
            url: "https://example.com".to_string(),
            title: "Home".to_string(),
            meta_description: String::new(),
            h1: None,
            response_time: 250,
            status_code: 200,
            error: None,
            links: vec![],
            ux_issues: UxIssues::default(),
            visual_issues: VisualIssues::default(),
            content_issues: ContentIssues::default(),
            content_metrics: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["responseTime"], 250);
        assert!(json.get("error").is_none());
        assert!(json.get("contentMetrics").is_none());
        assert!(json["uxIssues"].get("hasViewportMeta").is_some());
    }

    #[test]
    fn viewport_issue_serializes_expected_shape() {
        let issue = ViewportIssue {
            viewport_name: "Mobile".to_string(),
            horizontal_scroll_detected: true,
            overflowing_element_count: 2,
            small_tap_target_count: 3,
            offending_element_identifiers: vec!["button#buy.cta".to_string()],
            screenshot: None,
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["viewportName"], "Mobile");
        assert_eq!(json["overflowingElementCount"], 2);
        assert!(json.get("screenshot").is_none());
    }
}
