//! Single-pass static extraction of page facts from rendered HTML.

use crate::report::Heading;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Everything the scoring heuristics and report assembly need from the DOM,
/// pulled in one pass over the Desktop-rendered document.
#[derive(Debug, Default)]
pub struct PageFacts {
    pub title: String,
    pub meta_description: String,
    pub h1: Option<String>,
    pub h1_count: usize,
    pub missing_alt_tags: usize,
    pub empty_links: usize,
    pub has_viewport_meta: bool,
    pub images_missing_dimensions: usize,
    pub body_text: String,
    pub links: Vec<String>,
    pub has_schema: bool,
    pub schema_types: Vec<String>,
    pub structural_containers: usize,
    pub paragraph_count: usize,
    pub headings: Vec<Heading>,
    pub long_paragraphs: usize,
    pub document_bytes: usize,
    pub has_author: bool,
    pub has_date: bool,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must be valid")
}

/// Extract all facts from a serialized document. Discovered hrefs are
/// resolved against the page's own URL, so `links` holds absolute URLs;
/// unparseable hrefs are skipped.
pub fn extract(html: &str, page_url: &Url) -> PageFacts {
    let doc = Html::parse_document(html);
    let mut facts = PageFacts {
        document_bytes: html.len(),
        ..Default::default()
    };

    facts.title = doc
        .select(&selector("title"))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    facts.meta_description = meta_content(&doc, "meta[name='description']")
        .or_else(|| meta_content(&doc, "meta[property='og:description']"))
        .unwrap_or_default();

    for (index, h1) in doc.select(&selector("h1")).enumerate() {
        if index == 0 {
            facts.h1 = Some(h1.text().collect::<String>().trim().to_string());
        }
        facts.h1_count += 1;
    }

    for img in doc.select(&selector("img")) {
        let alt = img.value().attr("alt");
        if alt.is_none_or(|a| a.trim().is_empty()) {
            facts.missing_alt_tags += 1;
        }
        if img.value().attr("width").is_none() || img.value().attr("height").is_none() {
            facts.images_missing_dimensions += 1;
        }
    }

    for anchor in doc.select(&selector("a")) {
        if anchor.text().collect::<String>().trim().is_empty() {
            facts.empty_links += 1;
        }
        if let Some(href) = anchor.value().attr("href") {
            if let Ok(resolved) = page_url.join(href) {
                facts.links.push(resolved.to_string());
            }
        }
    }

    facts.has_viewport_meta = doc.select(&selector("meta[name='viewport']")).next().is_some();

    facts.body_text = doc
        .select(&selector("body"))
        .flat_map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    for script in doc.select(&selector("script[type='application/ld+json']")) {
        let raw = script.text().collect::<String>();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) {
            facts.has_schema = true;
            collect_schema_types(&value, &mut facts.schema_types);
        }
    }

    facts.structural_containers = doc
        .select(&selector("ul, ol, table, dl, article, section, nav"))
        .count();

    for paragraph in doc.select(&selector("p")) {
        facts.paragraph_count += 1;
        let words = paragraph
            .text()
            .collect::<String>()
            .split_whitespace()
            .count();
        if words > 150 {
            facts.long_paragraphs += 1;
        }
    }

    for heading in doc.select(&selector("h1, h2, h3, h4, h5, h6")) {
        facts.headings.push(Heading {
            tag: heading.value().name().to_string(),
            text: heading.text().collect::<String>().trim().to_string(),
        });
    }

    facts.has_author = meta_content(&doc, "meta[name='author']").is_some()
        || byline_in_leading_text(&facts.body_text);
    facts.has_date = meta_content(&doc, "meta[property='article:published_time']").is_some()
        || meta_content(&doc, "meta[name='date']").is_some()
        || doc.select(&selector("time")).next().is_some();

    facts
}

fn meta_content(doc: &Html, css: &str) -> Option<String> {
    doc.select(&selector(css))
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// "by [Capitalized Name]" within the first 2000 characters of body text
fn byline_in_leading_text(body_text: &str) -> bool {
    static BYLINE: OnceLock<Regex> = OnceLock::new();
    let regex = BYLINE.get_or_init(|| Regex::new(r"\b[Bb]y\s+[A-Z][a-zA-Z]+").unwrap());

    let leading: String = body_text.chars().take(2000).collect();
    regex.is_match(&leading)
}

/// Walk a JSON-LD value collecting `@type` names, including array forms
/// and `@graph` containers.
fn collect_schema_types(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            match map.get("@type") {
                Some(serde_json::Value::String(t)) => push_unique(out, t),
                Some(serde_json::Value::Array(types)) => {
                    for t in types.iter().filter_map(|t| t.as_str()) {
                        push_unique(out, t);
                    }
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_schema_types(graph, out);
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                collect_schema_types(item, out);
            }
        }
        _ => {}
    }
}

fn push_unique(out: &mut Vec<String>, value: &str) {
    if !out.iter().any(|t| t == value) {
        out.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> PageFacts {
        let base = Url::parse("https://example.com/docs/intro").unwrap();
        super::extract(html, &base)
    }

    #[test]
    fn extracts_title_meta_and_first_h1() {
        let html = r#"<html><head>
            <title> Docs Home </title>
            <meta name="description" content="All the docs.">
        </head><body><h1>Welcome</h1><h1>Second</h1></body></html>"#;
        let facts = extract(html);
        assert_eq!(facts.title, "Docs Home");
        assert_eq!(facts.meta_description, "All the docs.");
        assert_eq!(facts.h1.as_deref(), Some("Welcome"));
        assert_eq!(facts.h1_count, 2);
    }

    #[test]
    fn falls_back_to_open_graph_description() {
        let html = r#"<html><head>
            <meta property="og:description" content="Social summary">
        </head><body></body></html>"#;
        let facts = extract(html);
        assert_eq!(facts.meta_description, "Social summary");
    }

    #[test]
    fn counts_image_and_link_issues() {
        let html = r#"<html><body>
            <img src="a.png" alt="ok" width="10" height="10">
            <img src="b.png">
            <img src="c.png" alt="" width="10">
            <a href="/x">text</a>
            <a href="/y"> </a>
            <a href="/z"><img src="d.png" alt="d"></a>
        </body></html>"#;
        let facts = extract(html);
        assert_eq!(facts.missing_alt_tags, 2);
        assert_eq!(facts.images_missing_dimensions, 3);
        assert_eq!(facts.empty_links, 2);
        assert_eq!(
            facts.links,
            vec![
                "https://example.com/x",
                "https://example.com/y",
                "https://example.com/z"
            ]
        );
    }

    #[test]
    fn links_are_resolved_to_absolute_urls() {
        let html = r#"<html><body>
            <a href="/pricing">Pricing</a>
            <a href="guide">Guide</a>
            <a href="https://example.com/about">About</a>
            <a href="http://[bad">Broken</a>
        </body></html>"#;
        let facts = extract(html);
        assert_eq!(
            facts.links,
            vec![
                "https://example.com/pricing",
                "https://example.com/docs/guide",
                "https://example.com/about"
            ]
        );
        for link in &facts.links {
            assert!(Url::parse(link).is_ok(), "not absolute: {}", link);
        }
    }

    #[test]
    fn detects_viewport_meta_and_structure() {
        let html = r#"<html><head>
            <meta name="viewport" content="width=device-width">
        </head><body>
            <nav></nav><section><ul><li>a</li></ul></section>
            <p>one</p><p>two</p>
        </body></html>"#;
        let facts = extract(html);
        assert!(facts.has_viewport_meta);
        assert_eq!(facts.structural_containers, 3);
        assert_eq!(facts.paragraph_count, 2);
    }

    #[test]
    fn collects_json_ld_types_including_graph_and_arrays() {
        let html = r#"<html><body>
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@type": "Article"}
            </script>
            <script type="application/ld+json">
                {"@graph": [{"@type": ["Organization", "Brand"]}, {"@type": "Article"}]}
            </script>
        </body></html>"#;
        let facts = extract(html);
        assert!(facts.has_schema);
        assert_eq!(facts.schema_types, vec!["Article", "Organization", "Brand"]);
    }

    #[test]
    fn invalid_json_ld_is_ignored() {
        let html = r#"<html><body>
            <script type="application/ld+json">not json at all</script>
        </body></html>"#;
        let facts = extract(html);
        assert!(!facts.has_schema);
        assert!(facts.schema_types.is_empty());
    }

    #[test]
    fn headings_preserve_document_order() {
        let html = "<html><body><h1>A</h1><h3>B</h3><h2>C</h2></body></html>";
        let facts = extract(html);
        let tags: Vec<&str> = facts.headings.iter().map(|h| h.tag.as_str()).collect();
        assert_eq!(tags, vec!["h1", "h3", "h2"]);
        assert_eq!(facts.headings[1].text, "B");
    }

    #[test]
    fn flags_long_paragraphs() {
        let long = "word ".repeat(151);
        let html = format!("<html><body><p>short one</p><p>{}</p></body></html>", long);
        let facts = extract(&html);
        assert_eq!(facts.long_paragraphs, 1);
    }

    #[test]
    fn author_from_byline_pattern() {
        let html = "<html><body><p>Posted by Jane Doe on Tuesday.</p></body></html>";
        let facts = extract(html);
        assert!(facts.has_author);
        assert!(!facts.has_date);
    }

    #[test]
    fn author_and_date_from_meta_and_time() {
        let html = r#"<html><head>
            <meta name="author" content="J. Doe">
            <meta property="article:published_time" content="2024-01-01">
        </head><body><time datetime="2024-01-01">Jan 1</time></body></html>"#;
        let facts = extract(html);
        assert!(facts.has_author);
        assert!(facts.has_date);
    }

    #[test]
    fn body_text_is_whitespace_normalized() {
        let html = "<html><body><p>Hello\n   world</p>  <div>again</div></body></html>";
        let facts = extract(html);
        assert_eq!(facts.body_text, "Hello world again");
    }
}
