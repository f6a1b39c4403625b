//! Lexical relatedness
//!
//! A [`LexicalResource`] exposes word senses and a path similarity between
//! them. [`sense_graph::SenseGraph`] is an in-memory hypernym graph that
//! implements it; [`synonyms::SynonymScorer`] ranks candidate synonyms on
//! top of any resource.

pub mod sense_graph;
pub mod synonyms;

use serde::{Deserialize, Serialize};

/// One meaning of a word, with every lemma that expresses it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Stable identifier, e.g. `happy.a.01`
    pub id: String,
    /// Lemma names; multi-word lemmas use `_` between words
    pub lemmas: Vec<String>,
}

impl Sense {
    pub fn new(id: impl Into<String>, lemmas: &[&str]) -> Self {
        Self {
            id: id.into(),
            lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Source of senses and sense-to-sense similarity
pub trait LexicalResource: Send + Sync {
    /// Senses of `word`, most common first. Empty when the word is unknown.
    fn senses(&self, word: &str) -> Vec<Sense>;

    /// Similarity in `[0, 1]`, or `None` when the senses are not comparable
    fn path_similarity(&self, a: &Sense, b: &Sense) -> Option<f64>;
}
