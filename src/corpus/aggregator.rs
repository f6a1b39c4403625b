//! Record filtering and genre bucketing
//!
//! Records are rejected, in order, when their genre is blacklisted, when the
//! whole text is upper case (headings and titles), or when they carry fewer
//! than `min_tokens` tokens. Survivors are counted per source and genre and
//! grouped for extraction.

use indexmap::IndexMap;

use crate::types::{CorpusSource, MiningConfig, RegisterStats, SentenceRecord};

/// Example sentences grouped by genre, in corpus scan order
pub type GenreExamples<'a> = IndexMap<String, Vec<&'a SentenceRecord>>;

/// How many records each filter rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub accepted: usize,
    pub blacklisted: usize,
    pub uppercase: usize,
    pub too_short: usize,
}

impl FilterStats {
    pub fn rejected(&self) -> usize {
        self.blacklisted + self.uppercase + self.too_short
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone)]
pub struct Aggregation<'a> {
    pub register: RegisterStats,
    pub examples: GenreExamples<'a>,
    /// The most active genres across both corpora, most active first
    pub top_genres: Vec<String>,
    pub filter: FilterStats,
}

enum Verdict {
    Accept,
    Blacklisted,
    Uppercase,
    TooShort,
}

fn judge(record: &SentenceRecord, cfg: &MiningConfig) -> Verdict {
    if cfg.is_blacklisted(&record.genre) {
        Verdict::Blacklisted
    } else if is_all_uppercase(&record.text) {
        Verdict::Uppercase
    } else if record.tokens.len() < cfg.min_tokens {
        Verdict::TooShort
    } else {
        Verdict::Accept
    }
}

/// True when the text has at least one cased character and none in lower case
fn is_all_uppercase(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Filter `records`, count them per source/genre and group them by genre.
///
/// Never fails: records that do not pass the filters are dropped and
/// counted in [`FilterStats`].
pub fn aggregate<'a>(records: &'a [SentenceRecord], cfg: &MiningConfig) -> Aggregation<'a> {
    let mut register = RegisterStats::new();
    let mut examples: GenreExamples<'a> = IndexMap::new();
    let mut filter = FilterStats::default();

    for record in records {
        match judge(record, cfg) {
            Verdict::Blacklisted => filter.blacklisted += 1,
            Verdict::Uppercase => filter.uppercase += 1,
            Verdict::TooShort => filter.too_short += 1,
            Verdict::Accept => {
                filter.accepted += 1;
                register.increment(record.source, &record.genre);
                examples
                    .entry(record.genre.clone())
                    .or_default()
                    .push(record);
            }
        }
    }

    let top_genres = top_genres(&register, cfg.top_genres);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        accepted = filter.accepted,
        rejected = filter.rejected(),
        genres = examples.len(),
        "aggregated sentence records"
    );

    Aggregation {
        register,
        examples,
        top_genres,
        filter,
    }
}

/// The `n` genres with the highest combined count over the tracked corpora.
///
/// The sort is stable, so equal counts keep first-seen order.
pub fn top_genres(register: &RegisterStats, n: usize) -> Vec<String> {
    let mut ranked: Vec<(String, u32)> = register.combined().into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(genre, _)| genre).collect()
}
