//! Natural Language Processing components
//!
//! This module provides lemma normalization, stopword filtering, and the
//! part-of-speech tagger boundary.

pub mod lemma;
pub mod stopwords;
pub mod tagger;
