use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Dictionary-backed word validity check.
///
/// Built once at crawl start and passed by reference into every page
/// analysis. When no dictionary is configured (or loading fails) the
/// capability is simply absent and typo detection is skipped silently.
pub struct SpellChecker {
    words: HashSet<String>,
}

impl SpellChecker {
    /// Load a one-word-per-line dictionary file.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(&path)?;
        let reader = BufReader::new(file);

        let mut words = HashSet::new();
        for line in reader.lines() {
            let word = line?.trim().to_lowercase();
            if !word.is_empty() {
                words.insert(word);
            }
        }

        ::log::info!(
            "Loaded spell-check dictionary with {} words from {}",
            words.len(),
            path.as_ref().display()
        );
        Ok(Self { words })
    }

    /// Build a checker from an in-memory word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether a word is correctly spelled (case-insensitive).
    pub fn check(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

/// Load the checker if a dictionary path is configured; failures log and
/// degrade to `None` rather than erroring.
pub fn load_optional(path: Option<&str>) -> Option<SpellChecker> {
    let path = path?;
    match SpellChecker::load(path) {
        Ok(checker) => Some(checker),
        Err(e) => {
            ::log::warn!(
                "Failed to load dictionary {}; typo detection disabled: {}",
                path,
                e
            );
            None
        }
    }
}

/// Collect up to 5 unique alphabetic tokens longer than 3 characters that
/// the checker flags as misspelled. Without a checker the result is empty.
pub fn possible_typos(tokens: &[String], checker: Option<&SpellChecker>) -> Vec<String> {
    let Some(checker) = checker else {
        return Vec::new();
    };

    let mut flagged = Vec::new();
    for token in tokens {
        if flagged.len() >= 5 {
            break;
        }
        if token.chars().count() <= 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
            continue;
        }
        if !checker.check(token) && !flagged.contains(token) {
            flagged.push(token.clone());
        }
    }
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> SpellChecker {
        SpellChecker::from_words(["hello", "world", "crawler", "page"])
    }

    #[test]
    fn check_is_case_insensitive() {
        let checker = checker();
        assert!(checker.check("Hello"));
        assert!(checker.check("WORLD"));
        assert!(!checker.check("wrold"));
    }

    #[test]
    fn typos_capped_at_five_and_unique() {
        let checker = checker();
        let tokens: Vec<String> = "wrold wrold tyop anohter somthing diferent agian extra"
            .split_whitespace()
            .map(String::from)
            .collect();
        let typos = possible_typos(&tokens, Some(&checker));
        assert_eq!(typos.len(), 5);
        assert_eq!(typos.iter().filter(|t| *t == "wrold").count(), 1);
    }

    #[test]
    fn short_and_non_alphabetic_tokens_are_skipped() {
        let checker = checker();
        let tokens: Vec<String> = ["xyz", "abc123", "don't", "hello"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(possible_typos(&tokens, Some(&checker)).is_empty());
    }

    #[test]
    fn absent_capability_yields_empty_output() {
        let tokens: Vec<String> = vec!["wrold".to_string()];
        assert!(possible_typos(&tokens, None).is_empty());
    }
}
