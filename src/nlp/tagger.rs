//! Part-of-speech tagging boundary
//!
//! The engines never tag text themselves: they call a [`PosTagger`] once per
//! sentence. [`LexiconTagger`] is a small Penn-Treebank lexicon with suffix
//! heuristics, good enough for fixtures and as a baseline.

use rustc_hash::FxHashMap;

use crate::errors::{NuanceError, Result};
use crate::types::TaggedToken;

/// Assigns a tag to every token of one sentence
///
/// Implementations must return exactly one [`TaggedToken`] per input token,
/// in order. A failure only affects the sentence being tagged.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>>;
}

impl<F> PosTagger for F
where
    F: Fn(&[String]) -> Result<Vec<TaggedToken>> + Send + Sync,
{
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>> {
        self(tokens)
    }
}

const CLOSED_CLASS: &[(&str, &str)] = &[
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("these", "DT"),
    ("those", "DT"), ("every", "DT"), ("some", "DT"), ("no", "DT"),
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"),
    ("them", "PRP"), ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"),
    ("her", "PRP$"), ("its", "PRP$"), ("our", "PRP$"), ("their", "PRP$"),
    ("to", "TO"),
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("for", "IN"),
    ("with", "IN"), ("by", "IN"), ("about", "IN"), ("from", "IN"), ("into", "IN"),
    ("over", "IN"), ("under", "IN"), ("through", "IN"), ("after", "IN"),
    ("before", "IN"), ("between", "IN"), ("against", "IN"), ("during", "IN"),
    ("without", "IN"), ("upon", "IN"), ("than", "IN"), ("because", "IN"),
    ("if", "IN"), ("whether", "IN"), ("while", "IN"), ("although", "IN"),
    ("that", "IN"),
    ("and", "CC"), ("or", "CC"), ("but", "CC"),
    ("is", "VBZ"), ("am", "VBP"), ("are", "VBP"), ("was", "VBD"), ("were", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"), ("has", "VBZ"), ("have", "VBP"),
    ("had", "VBD"), ("do", "VBP"), ("does", "VBZ"), ("did", "VBD"),
    ("will", "MD"), ("would", "MD"), ("can", "MD"), ("could", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("not", "RB"), ("very", "RB"), ("also", "RB"), ("never", "RB"), ("always", "RB"),
    ("often", "RB"), ("just", "RB"), ("so", "RB"), ("too", "RB"),
    ("who", "WP"), ("what", "WP"), ("which", "WDT"), ("when", "WRB"), ("where", "WRB"),
];

const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ly", "RB"),
    ("ing", "VBG"),
    ("ed", "VBD"),
    ("ous", "JJ"),
    ("ful", "JJ"),
    ("able", "JJ"),
    ("ible", "JJ"),
    ("ive", "JJ"),
    ("less", "JJ"),
    ("tion", "NN"),
    ("ment", "NN"),
    ("ness", "NN"),
    ("ity", "NN"),
    ("s", "NNS"),
];

/// Dictionary tagger with suffix fallbacks
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: FxHashMap<String, String>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconTagger {
    /// Create a tagger preloaded with English closed-class words
    pub fn new() -> Self {
        let lexicon = CLOSED_CLASS
            .iter()
            .map(|(w, t)| (w.to_string(), t.to_string()))
            .collect();
        Self { lexicon }
    }

    /// Add or override a lexicon entry
    pub fn with_entry(mut self, word: &str, tag: &str) -> Self {
        self.lexicon.insert(word.to_lowercase(), tag.to_string());
        self
    }

    pub fn with_entries(mut self, entries: &[(&str, &str)]) -> Self {
        for (word, tag) in entries {
            self.lexicon.insert(word.to_lowercase(), tag.to_string());
        }
        self
    }

    fn tag_word(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        if !lower.chars().any(char::is_alphanumeric) {
            // Penn tags punctuation with the punctuation itself
            return word.to_string();
        }
        if lower.chars().all(|c| c.is_ascii_digit()) {
            return "CD".to_string();
        }
        SUFFIX_RULES
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() + 1 && lower.ends_with(suffix))
            .map(|(_, tag)| tag.to_string())
            .unwrap_or_else(|| "NN".to_string())
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                if token.is_empty() {
                    return Err(NuanceError::TaggingFailure {
                        reason: format!("empty token at index {i}"),
                    });
                }
                Ok(TaggedToken::new(token.clone(), self.tag_word(token)))
            })
            .collect()
    }
}
