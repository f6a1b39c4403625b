//! Synonym candidate scoring
//!
//! Every lemma of every sense of the target word is a candidate. A candidate
//! scores the path similarity between the target's first sense and its own
//! first sense (0 when it has none). Only candidates with a completed
//! profile in the store survive, ordered by score, then by frequency rank.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{LexicalResource, Sense};
use crate::nlp::lemma::LemmaTable;
use crate::store::ProfileStore;

/// A ranked synonym suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymCandidate {
    pub spelling: String,
    pub definition: String,
    pub rank: u32,
    /// Path similarity to the target's first sense, in `[0, 1]`
    pub score: f64,
}

/// Scores synonym candidates against a lexical resource and a profile store
pub struct SynonymScorer<'a> {
    resource: &'a dyn LexicalResource,
    store: &'a dyn ProfileStore,
    lemmas: &'a LemmaTable,
}

impl<'a> SynonymScorer<'a> {
    pub fn new(
        resource: &'a dyn LexicalResource,
        store: &'a dyn ProfileStore,
        lemmas: &'a LemmaTable,
    ) -> Self {
        Self {
            resource,
            store,
            lemmas,
        }
    }

    /// Senses of `word`, retrying with its lemma when the surface form is unknown
    fn reference_senses(&self, word: &str, lemma: &str) -> Vec<Sense> {
        let senses = self.resource.senses(word);
        if senses.is_empty() && lemma != word {
            return self.resource.senses(lemma);
        }
        senses
    }

    /// Best similarity per candidate surface form, in discovery order
    pub fn raw_scores(&self, word: &str) -> IndexMap<String, f64> {
        let word = word.trim().to_lowercase();
        let lemma = self.lemmas.normalize(&word);
        let senses = self.reference_senses(&word, &lemma);
        let mut scores: IndexMap<String, f64> = IndexMap::new();

        let Some(reference) = senses.first() else {
            return scores;
        };

        for sense in &senses {
            for name in &sense.lemmas {
                let candidate = name.replace('_', " ").to_lowercase();
                if candidate == word || candidate == lemma {
                    continue;
                }

                let score = match self.resource.senses(&candidate).first() {
                    Some(first) => self
                        .resource
                        .path_similarity(reference, first)
                        .unwrap_or(0.0),
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(candidate = %candidate, "no lexical sense, scoring 0");
                        0.0
                    }
                };

                let best = scores.entry(candidate).or_insert(score);
                if score > *best {
                    *best = score;
                }
            }
        }

        scores
    }

    /// Ranked candidates for `word` that already have an analyzed profile
    pub fn score(&self, word: &str) -> Vec<SynonymCandidate> {
        let scores = self.raw_scores(word);
        if scores.is_empty() {
            return Vec::new();
        }

        let names: Vec<String> = scores.keys().cloned().collect();
        let mut candidates: Vec<SynonymCandidate> = self
            .store
            .list_analyzed(&names)
            .into_iter()
            .map(|w| SynonymCandidate {
                score: scores.get(&w.word).copied().unwrap_or(0.0),
                spelling: w.word,
                definition: w.definition,
                rank: w.rank,
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.rank.cmp(&b.rank))
        });
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::sense_graph::SenseGraph;
    use crate::store::MemoryProfileStore;
    use crate::types::{RegisterStats, Strategy, WordProfile};

    fn graph() -> SenseGraph {
        let mut g = SenseGraph::new();
        g.add_sense("emotion.n.01", &["emotion"]);
        g.add_sense("happy.a.01", &["happy", "glad"]);
        g.add_sense("felicitous.a.02", &["felicitous", "happy"]);
        g.add_sense("cheerful.a.01", &["cheerful", "cheery"]);
        g.add_sense("content.a.01", &["content", "contented"]);
        g.add_sense("glad.a.02", &["glad"]);
        g.add_hypernym("happy.a.01", "emotion.n.01").unwrap();
        g.add_hypernym("cheerful.a.01", "emotion.n.01").unwrap();
        g.add_hypernym("felicitous.a.02", "emotion.n.01").unwrap();
        g
    }

    fn analyzed_store(words: &[(&str, u32)]) -> MemoryProfileStore {
        let store = MemoryProfileStore::new();
        for (word, rank) in words {
            store.register_word(word, &format!("def of {word}"), *rank, Strategy::Linear);
            store.put(
                word,
                WordProfile {
                    register: RegisterStats::new(),
                    strategy: Strategy::Linear,
                    analysis: IndexMap::new(),
                },
            );
        }
        store
    }

    #[test]
    fn test_raw_scores_keep_best_per_candidate() {
        let g = graph();
        let store = MemoryProfileStore::new();
        let lemmas = LemmaTable::new();
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        let scores = scorer.raw_scores("happy");

        // glad's first sense is happy.a.01 itself
        assert_eq!(scores["glad"], 1.0);
        // felicitous.a.02 and happy.a.01 meet at emotion.n.01
        assert_eq!(scores["felicitous"], 1.0 / 3.0);
        assert!(!scores.contains_key("happy"));
    }

    #[test]
    fn test_candidate_in_two_senses_listed_once() {
        let mut g = SenseGraph::new();
        g.add_sense("emotion.n.01", &["emotion"]);
        g.add_sense("happy.a.01", &["happy", "glad"]);
        g.add_sense("felicitous.a.02", &["felicitous", "happy", "Glad"]);
        g.add_hypernym("happy.a.01", "emotion.n.01").unwrap();
        g.add_hypernym("felicitous.a.02", "emotion.n.01").unwrap();
        let store = analyzed_store(&[("glad", 900), ("felicitous", 25000)]);
        let lemmas = LemmaTable::new();
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        let scores = scorer.raw_scores("happy");
        let keys: Vec<_> = scores.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["glad", "felicitous"]);
        assert_eq!(scores["glad"], 1.0);

        let ranked = scorer.score("happy");
        let names: Vec<_> = ranked.iter().map(|c| c.spelling.as_str()).collect();
        assert_eq!(names, vec!["glad", "felicitous"]);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn test_score_filters_and_orders() {
        let g = graph();
        let store = analyzed_store(&[("glad", 900), ("felicitous", 25000)]);
        let lemmas = LemmaTable::new();
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        let ranked = scorer.score("happy");
        let names: Vec<_> = ranked.iter().map(|c| c.spelling.as_str()).collect();

        assert_eq!(names, vec!["glad", "felicitous"]);
        assert_eq!(ranked[0].definition, "def of glad");
        assert_eq!(ranked[0].rank, 900);
    }

    #[test]
    fn test_ties_broken_by_frequency_rank() {
        let mut g = SenseGraph::new();
        g.add_sense("big.a.01", &["big", "large", "great"]);
        let store = analyzed_store(&[("great", 300), ("large", 120)]);
        let lemmas = LemmaTable::new();
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        let ranked = scorer.score("big");
        let names: Vec<_> = ranked.iter().map(|c| c.spelling.as_str()).collect();

        assert_eq!(names, vec!["large", "great"]);
        assert!(ranked.iter().all(|c| c.score == 1.0));
    }

    #[test]
    fn test_lemma_retry_for_inflected_word() {
        let g = graph();
        let store = analyzed_store(&[("glad", 900)]);
        let mut lemmas = LemmaTable::new();
        lemmas.insert("happiest", "happy");
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        let ranked = scorer.score("happiest");

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].spelling, "glad");
    }

    #[test]
    fn test_unknown_word_yields_nothing() {
        let g = graph();
        let store = analyzed_store(&[("glad", 900)]);
        let lemmas = LemmaTable::new();
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        assert!(scorer.score("zzyzx").is_empty());
    }

    #[test]
    fn test_incomparable_candidate_scores_zero() {
        let mut g = SenseGraph::new();
        g.add_sense("quick.a.01", &["quick", "speedy"]);
        g.add_sense("fast.a.01", &["fast", "quick"]);
        let store = analyzed_store(&[("speedy", 8000), ("fast", 700)]);
        let lemmas = LemmaTable::new();
        let scorer = SynonymScorer::new(&g, &store, &lemmas);

        let ranked = scorer.score("quick");

        // fast.a.01 shares no ancestor with quick.a.01
        assert_eq!(ranked[0].spelling, "speedy");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].spelling, "fast");
        assert_eq!(ranked[1].score, 0.0);
    }
}
