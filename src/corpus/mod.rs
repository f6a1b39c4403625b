//! Corpus filtering and register aggregation
//!
//! Turns raw sentence records into genre counts per corpus and the grouped
//! example sentences the extraction engines work from.

pub mod aggregator;

pub use aggregator::{aggregate, Aggregation, FilterStats, GenreExamples};
