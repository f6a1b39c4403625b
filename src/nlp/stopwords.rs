//! Stopword filtering
//!
//! The collocation window ignores a small fixed list of function words by
//! default. Full language lists from the `stop-words` crate are available
//! for callers that want a stricter window.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::types::{MiningConfig, DEFAULT_STOPWORDS};

/// A filter for removing stopwords from a collocation window
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase)
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::from_list(DEFAULT_STOPWORDS)
    }
}

impl StopwordFilter {
    /// Create a stopword filter from a custom list
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Filter for one mining run: the configured list, plus the full list
    /// for `stopword_language` when one is set
    pub fn from_config(cfg: &MiningConfig) -> Self {
        let mut filter = match &cfg.stopword_language {
            Some(language) => Self::for_language(language),
            None => Self::empty(),
        };
        filter.add_stopwords(&cfg.stopwords);
        filter
    }

    /// Create a filter from the full list for a language
    ///
    /// Unknown languages fall back to English.
    pub fn for_language(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            _ => LANGUAGE::English,
        };

        Self {
            stopwords: get(lang).iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    /// Case-insensitive membership test
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
