use std::collections::{HashSet, VecDeque};
use url::Url;

/// A discovered-but-not-yet-analyzed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

/// FIFO traversal queue plus the visited set for one crawl.
///
/// Strict FIFO ordering makes the traversal breadth-first, which surfaces
/// the most-linked pages early and keeps exploration predictable under the
/// page cap. The visited set grows monotonically and is owned here for the
/// whole crawl; URLs are marked visited at dequeue time, before analysis,
/// so re-discovered links never cause duplicate work.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    host: String,
}

impl Frontier {
    /// Seed the frontier with the start URL at depth 0.
    pub fn new(start_url: &Url) -> Self {
        let host = start_url.host_str().unwrap_or_default().to_string();
        let mut queue = VecDeque::new();
        queue.push_back(FrontierEntry {
            url: normalize(start_url),
            depth: 0,
        });
        Self {
            queue,
            visited: HashSet::new(),
            host,
        }
    }

    /// Pop the earliest-inserted entry.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Mark a URL as visited; returns false when it already was. A rejected
    /// mark is a discard, not a page, and must not count toward the page cap.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Admit a link discovered on `base` at depth `depth`.
    ///
    /// Resolves relative to the page's own URL, strips fragments, and only
    /// enqueues http(s) links whose hostname exactly equals the start host
    /// and which are not already visited. Malformed links are dropped
    /// silently; a single bad href must never abort the crawl.
    pub fn admit(&mut self, base: &Url, href: &str, depth: usize) {
        let Ok(resolved) = base.join(href) else {
            ::log::debug!("Dropping malformed link on {}: {}", base, href);
            return;
        };

        if !matches!(resolved.scheme(), "http" | "https") {
            return;
        }
        if resolved.host_str() != Some(self.host.as_str()) {
            ::log::debug!("Dropping cross-domain link: {}", resolved);
            return;
        }

        let normalized = normalize(&resolved);
        if self.visited.contains(&normalized) {
            return;
        }

        ::log::debug!("Queuing link for analysis: {}", normalized);
        self.queue.push_back(FrontierEntry {
            url: normalized,
            depth,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Fragment-stripped form of a URL, used for queueing and visited checks
pub fn normalize(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(start: &str) -> (Frontier, Url) {
        let url = Url::parse(start).unwrap();
        (Frontier::new(&url), url)
    }

    #[test]
    fn seeds_with_start_url_at_depth_zero() {
        let (mut frontier, _) = frontier("https://example.com/");
        let entry = frontier.pop().unwrap();
        assert_eq!(entry.url, "https://example.com/");
        assert_eq!(entry.depth, 0);
        assert!(frontier.is_empty());
    }

    #[test]
    fn pops_in_insertion_order() {
        let (mut frontier, base) = frontier("https://example.com/");
        frontier.pop();
        frontier.admit(&base, "/a", 1);
        frontier.admit(&base, "/b", 1);
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/a");
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/b");
    }

    #[test]
    fn rejects_cross_domain_and_subdomain_links() {
        let (mut frontier, base) = frontier("https://example.com/");
        frontier.pop();
        frontier.admit(&base, "https://other.com/page", 1);
        frontier.admit(&base, "https://sub.example.com/page", 1);
        assert!(frontier.is_empty());
    }

    #[test]
    fn rejects_non_http_schemes() {
        let (mut frontier, base) = frontier("https://example.com/");
        frontier.pop();
        frontier.admit(&base, "mailto:hi@example.com", 1);
        frontier.admit(&base, "javascript:void(0)", 1);
        frontier.admit(&base, "ftp://example.com/file", 1);
        assert!(frontier.is_empty());
    }

    #[test]
    fn strips_fragments_before_queueing() {
        let (mut frontier, base) = frontier("https://example.com/");
        frontier.pop();
        frontier.admit(&base, "/docs#intro", 1);
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/docs");
    }

    #[test]
    fn resolves_relative_links_against_page_url() {
        let (mut frontier, _) = frontier("https://example.com/");
        frontier.pop();
        let page = Url::parse("https://example.com/docs/intro").unwrap();
        frontier.admit(&page, "../pricing", 1);
        assert_eq!(frontier.pop().unwrap().url, "https://example.com/pricing");
    }

    #[test]
    fn visited_urls_are_not_readmitted() {
        let (mut frontier, base) = frontier("https://example.com/");
        frontier.pop();
        assert!(frontier.mark_visited("https://example.com/a"));
        assert!(!frontier.mark_visited("https://example.com/a"));
        frontier.admit(&base, "/a", 1);
        assert!(frontier.is_empty());
    }

    #[test]
    fn malformed_links_are_dropped_silently() {
        let (mut frontier, base) = frontier("https://example.com/");
        frontier.pop();
        frontier.admit(&base, "http://[bad", 1);
        assert!(frontier.is_empty());
    }
}
