//! Lexical overlap scoring.
//!
//! Text is reduced to a set of lowercase alphanumeric tokens; short tokens
//! and common filler words are dropped. A candidate is flagged when it
//! shares at least `min_shared_terms` tokens with the proposal. Adding shared
//! tokens can only turn a candidate from unflagged to flagged.

use std::collections::BTreeSet;
use std::path::Path;

use crate::config::{Settings, DEFAULT_MIN_SHARED_TERMS, DEFAULT_MIN_TERM_LENGTH};

/// Words long enough to pass the length filter but too common to signal overlap.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "been", "before", "being", "below", "between",
    "both", "could", "does", "doing", "down", "each", "from", "further", "have", "having", "here",
    "into", "just", "more", "most", "must", "only", "other", "over", "same", "shall", "should",
    "some", "such", "than", "that", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "under", "until", "very", "were", "what", "when", "where", "which",
    "while", "will", "with", "would", "your",
];

/// Scores candidates by shared terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapScorer {
    min_shared_terms: usize,
    min_term_length: usize,
}

impl Default for OverlapScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SHARED_TERMS, DEFAULT_MIN_TERM_LENGTH)
    }
}

impl OverlapScorer {
    /// Creates a scorer. Both parameters are raised to at least 1.
    #[must_use]
    pub fn new(min_shared_terms: usize, min_term_length: usize) -> Self {
        Self {
            min_shared_terms: min_shared_terms.max(1),
            min_term_length: min_term_length.max(1),
        }
    }

    /// Creates a scorer from resolved settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.min_shared_terms, settings.min_term_length)
    }

    /// Significant terms of `text`.
    #[must_use]
    pub fn terms(&self, text: &str) -> BTreeSet<String> {
        tokenize(text)
            .filter(|token| token.chars().count() >= self.min_term_length)
            .filter(|token| !STOP_WORDS.contains(&token.as_str()))
            .collect()
    }

    /// Significant terms taken from file names and directory names in `paths`.
    #[must_use]
    pub fn path_terms(&self, paths: &[String]) -> BTreeSet<String> {
        paths
            .iter()
            .flat_map(|path| {
                let path = Path::new(path);
                let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
                let dirs = path
                    .parent()
                    .into_iter()
                    .flat_map(Path::components)
                    .map(|c| c.as_os_str().to_string_lossy().into_owned());
                dirs.chain(stem).collect::<Vec<_>>()
            })
            .flat_map(|segment| self.terms(&segment))
            .collect()
    }

    /// Terms of `text` that also appear in `proposal`, sorted.
    #[must_use]
    pub fn shared_terms(&self, proposal: &BTreeSet<String>, text: &str) -> Vec<String> {
        self.terms(text).intersection(proposal).cloned().collect()
    }

    /// Whether `shared` overlapping terms are enough to flag a candidate.
    #[must_use]
    pub fn is_flagged(&self, shared: usize) -> bool {
        shared >= self.min_shared_terms
    }
}

/// Splits text into lowercase alphanumeric runs.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
