//! Usage extraction engines
//!
//! Both engines share the same skeleton: gate each top genre on its sentence
//! count, tag every sentence (skipping the ones the tagger rejects), find the
//! target lemma, then tally what surrounds it.
//!
//! - [`construction`]: syntactic frames dispatched on the target's word class
//! - [`collocation`]: modifier/object collocates inside a fixed window

pub mod collocation;
pub mod construction;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::corpus::GenreExamples;
use crate::nlp::lemma::LemmaTable;
use crate::nlp::tagger::PosTagger;
use crate::types::{MiningConfig, SentenceRecord, TaggedToken};

/// Collaborators and settings shared by one extraction call
#[derive(Clone, Copy)]
pub struct MiningContext<'a> {
    pub tagger: &'a dyn PosTagger,
    pub lemmas: &'a LemmaTable,
    pub config: &'a MiningConfig,
}

impl<'a> MiningContext<'a> {
    pub fn new(tagger: &'a dyn PosTagger, lemmas: &'a LemmaTable, config: &'a MiningConfig) -> Self {
        Self {
            tagger,
            lemmas,
            config,
        }
    }
}

// ============================================================================
// Per-sentence outcomes
// ============================================================================

/// A sentence together with its tags
#[derive(Debug, Clone)]
pub struct TaggedSentence<'a> {
    pub record: &'a SentenceRecord,
    pub tokens: Vec<TaggedToken>,
}

impl TaggedSentence<'_> {
    /// Indices of every token whose lemma equals `target_lemma`
    pub fn occurrences(&self, target_lemma: &str, lemmas: &LemmaTable) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| lemmas.normalize(&t.surface) == target_lemma)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Why a sentence was left out of a tally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TaggingFailed(String),
    /// The tagger returned a different number of tokens than it was given
    LengthMismatch { expected: usize, got: usize },
}

pub type SentenceOutcome<'a> = Result<TaggedSentence<'a>, SkipReason>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSentence {
    pub genre: String,
    /// Position of the sentence within its genre
    pub index: usize,
    pub reason: SkipReason,
}

/// Tagging successes and skips for one extraction call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub tagged: usize,
    pub skipped: Vec<SkippedSentence>,
}

impl BatchSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn total(&self) -> usize {
        self.tagged + self.skipped.len()
    }
}

/// Why a top genre produced no output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreSkip {
    /// Fewer example sentences than the configured minimum
    InsufficientData { genre: String, sentences: usize },
    /// Enough sentences, but nothing reached the minimum count
    NoQualifyingItems { genre: String },
}

/// Per-genre results plus what was skipped along the way
#[derive(Debug, Clone)]
pub struct MiningOutput<T> {
    pub by_genre: IndexMap<String, T>,
    pub summary: BatchSummary,
    pub skipped_genres: Vec<GenreSkip>,
}

impl<T> Default for MiningOutput<T> {
    fn default() -> Self {
        Self {
            by_genre: IndexMap::new(),
            summary: BatchSummary::default(),
            skipped_genres: Vec::new(),
        }
    }
}

fn tag_one<'a>(record: &'a SentenceRecord, tagger: &dyn PosTagger) -> SentenceOutcome<'a> {
    let tokens = tagger
        .tag(&record.tokens)
        .map_err(|e| SkipReason::TaggingFailed(e.to_string()))?;
    if tokens.len() != record.tokens.len() {
        return Err(SkipReason::LengthMismatch {
            expected: record.tokens.len(),
            got: tokens.len(),
        });
    }
    Ok(TaggedSentence { record, tokens })
}

/// Tag every sentence, in parallel for large genres.
///
/// Outcomes come back in input order either way.
pub fn tag_sentences<'a>(
    sentences: &[&'a SentenceRecord],
    ctx: &MiningContext<'_>,
) -> Vec<SentenceOutcome<'a>> {
    let tagger = ctx.tagger;
    if sentences.len() < ctx.config.parallel_threshold {
        sentences.iter().map(|r| tag_one(r, tagger)).collect()
    } else {
        sentences.par_iter().map(|r| tag_one(r, tagger)).collect()
    }
}

/// Tag one genre's sentences, recording skips in `summary`
fn tag_genre<'a>(
    genre: &str,
    sentences: &[&'a SentenceRecord],
    ctx: &MiningContext<'_>,
    summary: &mut BatchSummary,
) -> Vec<TaggedSentence<'a>> {
    let mut tagged = Vec::with_capacity(sentences.len());
    for (index, outcome) in tag_sentences(sentences, ctx).into_iter().enumerate() {
        match outcome {
            Ok(sentence) => {
                summary.tagged += 1;
                tagged.push(sentence);
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(genre, index, ?reason, "skipping sentence");
                summary.skipped.push(SkippedSentence {
                    genre: genre.to_string(),
                    index,
                    reason,
                });
            }
        }
    }
    tagged
}

/// Top genres that have enough example sentences, in ranking order
fn eligible_genres<'e, 'a>(
    top_genres: &[String],
    examples: &'e GenreExamples<'a>,
    cfg: &MiningConfig,
    skipped: &mut Vec<GenreSkip>,
) -> Vec<(&'e str, &'e [&'a SentenceRecord])> {
    let mut eligible = Vec::new();
    for genre in top_genres {
        let sentences = examples.get(genre).map(Vec::as_slice).unwrap_or(&[]);
        if sentences.len() < cfg.min_sentences {
            #[cfg(feature = "tracing")]
            tracing::debug!(genre = %genre, sentences = sentences.len(), "not enough sentences");
            skipped.push(GenreSkip::InsufficientData {
                genre: genre.clone(),
                sentences: sentences.len(),
            });
            continue;
        }
        if let Some((key, _)) = examples.get_key_value(genre) {
            eligible.push((key.as_str(), sentences));
        }
    }
    eligible
}

// ============================================================================
// Tally
// ============================================================================

/// Insertion-ordered counter that keeps the first few example sentences
#[derive(Debug, Clone)]
pub struct Tally {
    counts: IndexMap<String, u32>,
    examples: IndexMap<String, Vec<String>>,
    example_cap: usize,
}

impl Tally {
    pub fn new(example_cap: usize) -> Self {
        Self {
            counts: IndexMap::new(),
            examples: IndexMap::new(),
            example_cap,
        }
    }

    /// Count `key` once; keep `example` if it is new and there is room.
    pub fn record(&mut self, key: &str, example: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        let kept = self.examples.entry(key.to_string()).or_default();
        if kept.len() < self.example_cap && !kept.iter().any(|e| e == example) {
            kept.push(example.to_string());
        }
    }

    pub fn count(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `top_k` most frequent keys with at least `min_count` hits.
    ///
    /// Ties keep first-seen order.
    pub fn ranked(&self, top_k: usize, min_count: u32) -> Vec<(&str, u32, &[String])> {
        let mut ranked: Vec<(&str, u32)> = self
            .counts
            .iter()
            .map(|(k, &c)| (k.as_str(), c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(top_k)
            .filter(|&(_, c)| c >= min_count)
            .map(|(k, c)| {
                let examples = self.examples.get(k).map(Vec::as_slice).unwrap_or(&[]);
                (k, c, examples)
            })
            .collect()
    }
}
