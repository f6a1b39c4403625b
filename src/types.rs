//! Core data types for usage mining
//!
//! Sentence records flow in from a corpus collaborator, tagged tokens are
//! produced on demand by a [`PosTagger`](crate::nlp::tagger::PosTagger), and
//! the engines emit [`PatternEntry`] / [`CollocationEntry`] values that are
//! folded into a persisted [`WordProfile`].

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{NuanceError, Result};

/// Genres rejected before counting.
pub const DEFAULT_GENRE_BLACKLIST: &[&str] = &["spam", "jokes", "twitter", "Unclassified"];

/// Function words ignored inside the collocation window.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "be", "been", "this",
    "that", "it", "he", "she", "they", "we", "i", "you", "my", "your", "in", "on", "at", "to",
    "for", "of", "with", "by",
];

/// Subject pronouns that never count as a verb's direct object.
pub const DEFAULT_SUBJECT_PRONOUNS: &[&str] = &["i", "he", "she", "we", "they"];

pub const MIN_TOKEN_COUNT: usize = 4;
pub const TOP_GENRE_COUNT: usize = 5;
pub const MIN_SENTENCE_THRESHOLD: usize = 5;
pub const PATTERN_TOP_K: usize = 5;
pub const PATTERN_MIN_COUNT: u32 = 2;
pub const PATTERN_EXAMPLE_CAP: usize = 3;
pub const COLLOCATION_WINDOW: usize = 3;
/// Widest collocation window a config may ask for, in tokens per side.
pub const MAX_COLLOCATION_WINDOW: usize = 50;
pub const COLLOCATION_TOP_K: usize = 6;
pub const COLLOCATION_MIN_COUNT: u32 = 2;
pub const DUEL_TOP_GENRES: usize = 4;
pub const DUEL_UNIQUE_ITEMS: usize = 5;
/// Percentage-point gap a genre share must exceed before one word "wins" it.
pub const DUEL_WINNER_THRESHOLD: f64 = 5.0;
pub const PARALLEL_TAGGING_THRESHOLD: usize = 256;

// ============================================================================
// Corpus input
// ============================================================================

/// Which reference corpus a sentence was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CorpusSource {
    /// Balanced general corpus
    CorpusA,
    /// Contemporary / web corpus
    CorpusB,
    Other,
}

impl CorpusSource {
    /// The two corpora tracked explicitly, in reporting order.
    pub const TRACKED: [CorpusSource; 2] = [CorpusSource::CorpusA, CorpusSource::CorpusB];

    /// Normalize a free-form source label.
    ///
    /// Unrecognized labels collapse into [`CorpusSource::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "corpusa" | "corpus_a" | "a" | "bnc" => CorpusSource::CorpusA,
            "corpusb" | "corpus_b" | "b" | "masc" => CorpusSource::CorpusB,
            _ => CorpusSource::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusSource::CorpusA => "CorpusA",
            CorpusSource::CorpusB => "CorpusB",
            CorpusSource::Other => "Other",
        }
    }
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pre-tokenized sentence with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub text: String,
    pub tokens: Vec<String>,
    pub source: CorpusSource,
    pub genre: String,
}

impl SentenceRecord {
    pub fn new(
        text: impl Into<String>,
        tokens: Vec<String>,
        source: CorpusSource,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            tokens,
            source,
            genre: genre.into(),
        }
    }

    /// Build a record from raw labels, splitting `text` on whitespace.
    pub fn from_text(text: &str, source_label: &str, genre: &str) -> Self {
        let tokens = text.split_whitespace().map(str::to_string).collect();
        Self::new(text, tokens, CorpusSource::from_label(source_label), genre)
    }
}

// ============================================================================
// Tagging
// ============================================================================

/// A token paired with its Penn-Treebank style tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub surface: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }

    pub fn class(&self) -> PosClass {
        PosClass::from_tag(&self.tag)
    }

    /// Case-insensitive surface comparison.
    pub fn is(&self, word: &str) -> bool {
        self.surface.eq_ignore_ascii_case(word)
    }
}

/// Coarse word class derived from the first letter of a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosClass {
    Verb,
    Noun,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    /// The `TO` tag
    InfinitiveMarker,
    Other,
}

impl PosClass {
    pub fn from_tag(tag: &str) -> Self {
        match tag.as_bytes().first() {
            Some(b'V') => PosClass::Verb,
            Some(b'N') => PosClass::Noun,
            Some(b'J') => PosClass::Adjective,
            Some(b'R') => PosClass::Adverb,
            Some(b'P') => PosClass::Pronoun,
            Some(b'I') => PosClass::Preposition,
            Some(b'T') if tag == "TO" => PosClass::InfinitiveMarker,
            _ => PosClass::Other,
        }
    }

    /// Nouns and pronoun-like tags (`PRP`, `PRP$`, `PDT`, `POS`)
    pub fn is_nominal(&self) -> bool {
        matches!(self, PosClass::Noun | PosClass::Pronoun)
    }

    /// Classes that may modify a following target word
    pub fn is_modifier(&self) -> bool {
        matches!(self, PosClass::Adjective | PosClass::Adverb | PosClass::Verb)
    }

    /// Classes that may complete a preceding target word
    pub fn is_complement(&self) -> bool {
        matches!(self, PosClass::Noun | PosClass::Preposition)
    }
}

// ============================================================================
// Strategy
// ============================================================================

/// Which extraction engine a word is analyzed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
    /// Construction frames for grammatically light words
    Pattern,
    /// Windowed collocations for content words
    Linear,
}

impl Strategy {
    /// Words ranked in the top 2000 of either frequency list are analyzed
    /// for constructions; everything else for collocations. A rank of 0
    /// means the word is unranked.
    pub fn from_frequency_ranks(corpus_rank: u32, frequency_rank: u32) -> Self {
        let in_core = |rank: u32| (1..=2000).contains(&rank);
        if in_core(corpus_rank) || in_core(frequency_rank) {
            Strategy::Pattern
        } else {
            Strategy::Linear
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Pattern => "PATTERN",
            Strategy::Linear => "LINEAR",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = NuanceError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "PATTERN" => Ok(Strategy::Pattern),
            "LINEAR" => Ok(Strategy::Linear),
            other => Err(NuanceError::UnknownStrategy(other.to_string())),
        }
    }
}

// ============================================================================
// Register statistics
// ============================================================================

/// Per-source genre counts
///
/// `CorpusA` and `CorpusB` are always present; `Other` appears only once a
/// record from an unrecognized source has been counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegisterStats {
    sources: IndexMap<CorpusSource, IndexMap<String, u32>>,
}

impl Default for RegisterStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterStats {
    pub fn new() -> Self {
        let mut sources = IndexMap::new();
        for source in CorpusSource::TRACKED {
            sources.insert(source, IndexMap::new());
        }
        Self { sources }
    }

    pub fn increment(&mut self, source: CorpusSource, genre: &str) {
        let genres = self.sources.entry(source).or_default();
        *genres.entry(genre.to_string()).or_insert(0) += 1;
    }

    /// Genre counts for one source, in first-seen order
    pub fn genres(&self, source: CorpusSource) -> Option<&IndexMap<String, u32>> {
        self.sources.get(&source)
    }

    pub fn count(&self, source: CorpusSource, genre: &str) -> u32 {
        self.genres(source)
            .and_then(|g| g.get(genre))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self, source: CorpusSource) -> u32 {
        self.genres(source).map(|g| g.values().sum()).unwrap_or(0)
    }

    /// Genre counts summed over the tracked corpora.
    ///
    /// Keys keep the order in which they are first met: every `CorpusA`
    /// genre, then `CorpusB` genres not already present.
    pub fn combined(&self) -> IndexMap<String, u32> {
        let mut combined: IndexMap<String, u32> = IndexMap::new();
        for source in CorpusSource::TRACKED {
            if let Some(genres) = self.genres(source) {
                for (genre, count) in genres {
                    *combined.entry(genre.clone()).or_insert(0) += count;
                }
            }
        }
        combined
    }

    pub fn sources(&self) -> impl Iterator<Item = (CorpusSource, &IndexMap<String, u32>)> {
        self.sources.iter().map(|(s, g)| (*s, g))
    }
}

// ============================================================================
// Extraction output
// ============================================================================

/// A construction frame with its tally and example sentences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub template: String,
    pub count: u32,
    pub examples: Vec<String>,
}

/// A collocation phrase with its tally and first example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollocationEntry {
    #[serde(rename = "p")]
    pub phrase: String,
    #[serde(rename = "c")]
    pub count: u32,
    #[serde(rename = "ex")]
    pub example: String,
}

/// Modifier and object collocates for one genre
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollocationProfile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<CollocationEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<CollocationEntry>,
}

impl CollocationProfile {
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.objects.is_empty()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.modifiers
            .iter()
            .chain(self.objects.iter())
            .map(|e| e.phrase.as_str())
    }
}

/// Analysis payload for a single genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenreAnalysis {
    Patterns(Vec<PatternEntry>),
    Collocations(CollocationProfile),
}

/// Everything persisted about one analyzed word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordProfile {
    pub register: RegisterStats,
    pub strategy: Strategy,
    pub analysis: IndexMap<String, GenreAnalysis>,
}

impl WordProfile {
    pub fn from_patterns(
        register: RegisterStats,
        patterns: IndexMap<String, Vec<PatternEntry>>,
    ) -> Self {
        Self {
            register,
            strategy: Strategy::Pattern,
            analysis: patterns
                .into_iter()
                .map(|(genre, entries)| (genre, GenreAnalysis::Patterns(entries)))
                .collect(),
        }
    }

    pub fn from_collocations(
        register: RegisterStats,
        collocations: IndexMap<String, CollocationProfile>,
    ) -> Self {
        Self {
            register,
            strategy: Strategy::Linear,
            analysis: collocations
                .into_iter()
                .map(|(genre, profile)| (genre, GenreAnalysis::Collocations(profile)))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Thresholds and word lists shared by every engine
///
/// Passed explicitly into each call; nothing here is global.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub genre_blacklist: Vec<String>,
    pub min_tokens: usize,
    pub top_genres: usize,
    pub min_sentences: usize,
    pub pattern_top_k: usize,
    pub pattern_min_count: u32,
    pub pattern_example_cap: usize,
    pub window: usize,
    pub collocation_top_k: usize,
    pub collocation_min_count: u32,
    pub stopwords: Vec<String>,
    /// Also ignore the full stopword list of this language (`"en"`, `"de"`, ...)
    pub stopword_language: Option<String>,
    pub subject_pronouns: Vec<String>,
    pub duel_top_genres: usize,
    pub duel_unique_items: usize,
    pub winner_threshold: f64,
    /// Genres with at least this many sentences are tagged in parallel
    pub parallel_threshold: usize,
    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    pub strict: bool,
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            genre_blacklist: owned(DEFAULT_GENRE_BLACKLIST),
            min_tokens: MIN_TOKEN_COUNT,
            top_genres: TOP_GENRE_COUNT,
            min_sentences: MIN_SENTENCE_THRESHOLD,
            pattern_top_k: PATTERN_TOP_K,
            pattern_min_count: PATTERN_MIN_COUNT,
            pattern_example_cap: PATTERN_EXAMPLE_CAP,
            window: COLLOCATION_WINDOW,
            collocation_top_k: COLLOCATION_TOP_K,
            collocation_min_count: COLLOCATION_MIN_COUNT,
            stopwords: owned(DEFAULT_STOPWORDS),
            stopword_language: None,
            subject_pronouns: owned(DEFAULT_SUBJECT_PRONOUNS),
            duel_top_genres: DUEL_TOP_GENRES,
            duel_unique_items: DUEL_UNIQUE_ITEMS,
            winner_threshold: DUEL_WINNER_THRESHOLD,
            parallel_threshold: PARALLEL_TAGGING_THRESHOLD,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl MiningConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_min_sentences(mut self, min_sentences: usize) -> Self {
        self.min_sentences = min_sentences;
        self
    }

    pub fn with_min_tokens(mut self, min_tokens: usize) -> Self {
        self.min_tokens = min_tokens;
        self
    }

    pub fn with_top_genres(mut self, top_genres: usize) -> Self {
        self.top_genres = top_genres;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_pattern_min_count(mut self, min_count: u32) -> Self {
        self.pattern_min_count = min_count;
        self
    }

    pub fn with_collocation_min_count(mut self, min_count: u32) -> Self {
        self.collocation_min_count = min_count;
        self
    }

    pub fn with_winner_threshold(mut self, threshold: f64) -> Self {
        self.winner_threshold = threshold;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn with_genre_blacklist(mut self, genres: &[&str]) -> Self {
        self.genre_blacklist = owned(genres);
        self
    }

    pub fn with_stopwords(mut self, words: &[&str]) -> Self {
        self.stopwords = owned(words);
        self
    }

    pub fn with_stopword_language(mut self, language: &str) -> Self {
        self.stopword_language = Some(language.to_string());
        self
    }

    pub fn is_blacklisted(&self, genre: &str) -> bool {
        self.genre_blacklist.iter().any(|g| g == genre)
    }

    pub fn is_subject_pronoun(&self, word: &str) -> bool {
        self.subject_pronouns
            .iter()
            .any(|p| p.eq_ignore_ascii_case(word))
    }
}
