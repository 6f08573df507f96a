//! Pure scoring heuristics over already-extracted page facts.
//!
//! Everything here is deterministic: the same inputs always produce the same
//! scores, keeping per-page results reproducible across runs.

use crate::report::{Heading, KeywordCount};
use std::collections::HashMap;

/// Common words excluded from keyword extraction
const STOP_WORDS: &[&str] = &[
    "about", "after", "also", "because", "been", "being", "between", "both", "could", "does",
    "each", "from", "have", "having", "here", "into", "itself", "just", "like", "more", "most",
    "only", "other", "over", "same", "should", "some", "such", "than", "that", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "under", "very", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
];

/// Interrogative openers that mark a heading as a question
const QUESTION_WORDS: &[&str] = &[
    "how", "what", "why", "when", "where", "who", "which", "can", "does", "do", "is", "are",
    "should", "will",
];

/// Schema.org types that answer engines treat as high-value structured data
const HIGH_VALUE_SCHEMA_TYPES: &[&str] = &[
    "Article",
    "Product",
    "FAQPage",
    "Organization",
    "BreadcrumbList",
    "Recipe",
    "Review",
];

/// Splits body text on whitespace and strips per-token punctuation,
/// keeping word characters, apostrophes and hyphens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(clean_token)
        .filter(|t| !t.is_empty())
        .collect()
}

fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '-')
        .collect()
}

/// Count of cleaned tokens longer than 20 characters
pub fn long_word_count(tokens: &[String]) -> usize {
    tokens.iter().filter(|t| t.chars().count() > 20).count()
}

/// Count of `.`/`!`/`?`-delimited segments, never below 1
pub fn sentence_count(text: &str) -> usize {
    let count = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    count.max(1)
}

/// Estimates syllables by counting vowel-cluster runs after dropping a
/// trailing "e", with a floor of 1 per word.
pub fn count_syllables(word: &str) -> usize {
    let lower: String = word
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    let trimmed = lower.strip_suffix('e').unwrap_or(&lower);

    let mut syllables = 0;
    let mut in_cluster = false;
    for c in trimmed.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !in_cluster {
            syllables += 1;
        }
        in_cluster = is_vowel;
    }
    syllables.max(1)
}

/// Flesch Reading Ease, clamped to [0, 100] and rounded
pub fn flesch_reading_ease(word_count: usize, sentences: usize, syllables: usize) -> u32 {
    if word_count == 0 {
        return 0;
    }
    let words = word_count as f64;
    let score = 206.835 - 1.015 * (words / sentences.max(1) as f64)
        - 84.6 * (syllables as f64 / words);
    score.clamp(0.0, 100.0).round() as u32
}

/// `min(100, 50 + 5 * structural containers)`, where lists, tables,
/// definition lists, articles, sections and navs all count.
pub fn structure_score(structural_container_count: usize) -> u32 {
    (50 + 5 * structural_container_count as u32).min(100)
}

/// Inputs to the SEO score that come straight out of static extraction
pub struct SeoFacts<'a> {
    pub title: &'a str,
    pub meta_description: &'a str,
    pub has_h1: bool,
    pub images_missing_alt: usize,
    pub word_count: usize,
    pub headings: &'a [Heading],
    pub top_keywords: &'a [KeywordCount],
}

/// Additive SEO score, capped at 100
pub fn seo_score(facts: &SeoFacts) -> u32 {
    let mut score = 0u32;

    let title_len = facts.title.chars().count();
    if (10..=60).contains(&title_len) {
        score += 20;
    } else if title_len > 0 {
        score += 10;
    }

    let desc_len = facts.meta_description.chars().count();
    if (50..=160).contains(&desc_len) {
        score += 20;
    } else if desc_len > 0 {
        score += 10;
    }

    if facts.has_h1 {
        score += 20;
    }
    if facts.images_missing_alt == 0 {
        score += 20;
    }
    if facts.word_count > 300 {
        score += 20;
    }

    if keyword_in_headings(facts.top_keywords, facts.headings) {
        score += 10;
    }
    if !facts.headings.is_empty() && heading_hierarchy_valid(facts.headings) {
        score += 10;
    }

    score.min(100)
}

fn keyword_in_headings(keywords: &[KeywordCount], headings: &[Heading]) -> bool {
    keywords.iter().any(|kw| {
        headings
            .iter()
            .any(|h| h.text.to_lowercase().contains(&kw.word))
    })
}

/// True when the heading sequence never skips a level on the way down
/// (an H2 followed directly by an H4 fails).
pub fn heading_hierarchy_valid(headings: &[Heading]) -> bool {
    let mut previous: Option<u8> = None;
    for heading in headings {
        let Some(level) = heading_level(&heading.tag) else {
            continue;
        };
        if let Some(prev) = previous {
            if level > prev + 1 {
                return false;
            }
        }
        previous = Some(level);
    }
    true
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.to_ascii_lowercase().as_str() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Inputs to the AI/GEO score
pub struct AiFacts<'a> {
    pub has_schema: bool,
    pub schema_types: &'a [String],
    pub structure_score: u32,
    pub readability_score: u32,
    pub headings: &'a [Heading],
    pub has_author: bool,
    pub has_date: bool,
}

/// Additive generative-engine-friendliness score, capped at 100
pub fn ai_score(facts: &AiFacts) -> u32 {
    let mut score = 0u32;

    if facts.has_schema {
        score += 10;
        let high_value = facts
            .schema_types
            .iter()
            .any(|t| HIGH_VALUE_SCHEMA_TYPES.contains(&t.as_str()));
        score += if high_value { 30 } else { 10 };
    }

    if facts.structure_score > 70 {
        score += 15;
    }
    if facts.readability_score > 60 {
        score += 15;
    }
    if question_heading_count(facts.headings) > 0 {
        score += 15;
    }
    if facts.has_author {
        score += 10;
    }
    if facts.has_date {
        score += 5;
    }

    score.min(100)
}

/// Headings phrased as questions: interrogative first word or trailing "?"
pub fn question_heading_count(headings: &[Heading]) -> usize {
    headings
        .iter()
        .filter(|h| {
            let text = h.text.trim();
            if text.ends_with('?') {
                return true;
            }
            text.split_whitespace()
                .next()
                .map(|first| QUESTION_WORDS.contains(&first.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .count()
}

/// Top 5 keywords by frequency; lowercased alphabetic tokens longer than 3
/// characters, stop words removed, ties broken by first-encountered order.
pub fn top_keywords(tokens: &[String]) -> Vec<KeywordCount> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (index, token) in tokens.iter().enumerate() {
        let word: String = token
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        if word.chars().count() <= 3 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        let entry = counts.entry(word).or_insert((0, index));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(5)
        .map(|(word, count, _)| KeywordCount { word, count })
        .collect()
}

/// Extracted-text character length over serialized-document byte length
pub fn text_to_code_ratio(text_len: usize, document_len: usize) -> f64 {
    if document_len == 0 {
        return 0.0;
    }
    text_len as f64 / document_len as f64
}
