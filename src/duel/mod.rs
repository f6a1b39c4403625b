//! Pairwise contrast between two analyzed words
//!
//! Register contrast compares each word's genre share per corpus.
//! Collocation contrast is a set difference over the "core items" of each
//! profile: collocation phrases for LINEAR words, templates for PATTERN words.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::errors::{NuanceError, Result};
use crate::store::ProfileStore;
use crate::types::{CorpusSource, GenreAnalysis, MiningConfig, RegisterStats, Strategy, WordProfile};

/// Which word a genre leans towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    A,
    B,
    Tie,
}

/// Share of one genre in each word's register, in percentage points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDelta {
    pub genre: String,
    pub a_pct: f64,
    pub b_pct: f64,
    /// `a_pct - b_pct`
    pub delta: f64,
}

impl RegisterDelta {
    /// A wins above `threshold`, B below `-threshold`; anything between is a tie.
    pub fn preference(&self, threshold: f64) -> Preference {
        if self.delta > threshold {
            Preference::A
        } else if self.delta < -threshold {
            Preference::B
        } else {
            Preference::Tie
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollocationContrast {
    pub unique_a: Vec<String>,
    pub unique_b: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelReport {
    pub register_contrast: IndexMap<CorpusSource, Vec<RegisterDelta>>,
    pub collocation_contrast: CollocationContrast,
}

fn share(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(total) * 100.0
    }
}

/// Largest genre-share gaps for one corpus, biggest first
pub fn register_deltas(
    a: &RegisterStats,
    b: &RegisterStats,
    source: CorpusSource,
    keep: usize,
) -> Vec<RegisterDelta> {
    let total_a = a.total(source);
    let total_b = b.total(source);

    let mut genres: IndexSet<&str> = IndexSet::new();
    for stats in [a, b] {
        if let Some(counts) = stats.genres(source) {
            genres.extend(counts.keys().map(String::as_str));
        }
    }

    let mut deltas: Vec<RegisterDelta> = genres
        .into_iter()
        .map(|genre| {
            let a_pct = share(a.count(source, genre), total_a);
            let b_pct = share(b.count(source, genre), total_b);
            RegisterDelta {
                genre: genre.to_string(),
                a_pct,
                b_pct,
                delta: a_pct - b_pct,
            }
        })
        .collect();

    deltas.sort_by(|x, y| y.delta.abs().total_cmp(&x.delta.abs()));
    deltas.truncate(keep);
    deltas
}

/// Flat set of phrases (LINEAR) or templates (PATTERN) across every genre
///
/// Genre payloads that do not match the profile's strategy contribute nothing.
pub fn core_items(profile: &WordProfile) -> IndexSet<String> {
    let mut items = IndexSet::new();
    for analysis in profile.analysis.values() {
        match (profile.strategy, analysis) {
            (Strategy::Linear, GenreAnalysis::Collocations(colls)) => {
                items.extend(colls.phrases().map(str::to_string));
            }
            (Strategy::Pattern, GenreAnalysis::Patterns(patterns)) => {
                items.extend(patterns.iter().map(|p| p.template.clone()));
            }
            _ => {}
        }
    }
    items
}

/// Contrast two profiles
pub fn duel(a: &WordProfile, b: &WordProfile, config: &MiningConfig) -> DuelReport {
    let register_contrast = CorpusSource::TRACKED
        .into_iter()
        .map(|source| {
            let deltas = register_deltas(&a.register, &b.register, source, config.duel_top_genres);
            (source, deltas)
        })
        .collect();

    let items_a = core_items(a);
    let items_b = core_items(b);
    let keep = config.duel_unique_items;

    DuelReport {
        register_contrast,
        collocation_contrast: CollocationContrast {
            unique_a: items_a.difference(&items_b).take(keep).cloned().collect(),
            unique_b: items_b.difference(&items_a).take(keep).cloned().collect(),
        },
    }
}

/// Look both words up in `store` and contrast them
pub fn duel_words(
    store: &dyn ProfileStore,
    word_a: &str,
    word_b: &str,
    config: &MiningConfig,
) -> Result<DuelReport> {
    let fetch = |word: &str| {
        store.get(word).ok_or_else(|| NuanceError::NotComparable {
            word: word.to_string(),
            reason: "no analyzed profile".to_string(),
        })
    };
    let a = fetch(word_a)?;
    let b = fetch(word_b)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(word_a, word_b, "duel");

    Ok(duel(&a, &b, config))
}
