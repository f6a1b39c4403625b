//! # lexical-nuance
//!
//! Corpus-driven usage profiles for English words.
//!
//! For a target word the engine filters pre-tokenized sentences from two
//! reference corpora, counts the word's register (genre distribution) per
//! corpus, and mines one of two usage profiles from the busiest genres:
//!
//! - **PATTERN** words (frequent, grammatically light) get syntactic
//!   construction frames such as `"V + that-clause"` or `"Adj + to do"`.
//! - **LINEAR** words (content words) get modifier and object collocations
//!   from a small window around each occurrence.
//!
//! Stored profiles can then be compared pairwise ([`duel_words`]) and synonym
//! candidates ranked by sense similarity ([`lexical::synonyms`]).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use lexical_nuance::{Analyzer, LemmaTable, LexiconTagger, MiningConfig, NoopObserver, Strategy};
//!
//! let analyzer = Analyzer::new(MiningConfig::default(), LemmaTable::new(), LexiconTagger::new())?;
//! let outcome = analyzer.analyze("happy", Strategy::Pattern, &records, &mut NoopObserver);
//! println!("{}", outcome.profile.to_json()?);
//! ```

pub mod corpus;
pub mod duel;
pub mod errors;
pub mod lexical;
pub mod mining;
pub mod nlp;
pub mod pipeline;
pub mod store;
pub mod types;

pub use duel::{duel, duel_words, DuelReport, Preference, RegisterDelta};
pub use errors::{NuanceError, Result};
pub use lexical::sense_graph::SenseGraph;
pub use lexical::synonyms::{SynonymCandidate, SynonymScorer};
pub use lexical::LexicalResource;
pub use nlp::lemma::LemmaTable;
pub use nlp::tagger::{LexiconTagger, PosTagger};
pub use pipeline::{AnalysisObserver, AnalysisOutcome, Analyzer, NoopObserver, StageTimingObserver};
pub use store::{MemoryProfileStore, ProfileStore};
pub use types::{
    CorpusSource, MiningConfig, SentenceRecord, Strategy, TaggedToken, WordProfile,
};
