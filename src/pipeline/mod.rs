//! Analysis pipeline
//!
//! This module wires the engines together: configuration validation, stage
//! observers, and the [`runner::Analyzer`] that takes a target word from raw
//! sentence records to a stored profile.

pub mod observer;
pub mod runner;
pub mod validation;

pub use observer::{AnalysisObserver, NoopObserver, StageReport, StageTimingObserver};
pub use runner::{AnalysisOutcome, Analyzer};
pub use validation::{ValidationEngine, ValidationReport, ValidationRule};
