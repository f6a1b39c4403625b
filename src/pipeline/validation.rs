//! Checks a [`MiningConfig`] before any corpus is read.
//!
//! Every registered [`ValidationRule`] runs, and all of their diagnostics end
//! up in one [`ValidationReport`]: a zero sentence gate, an oversized
//! collocation window and a misspelled field are reported together.
//! `Analyzer::new` refuses configs whose report has errors.
//!
//! ```rust,ignore
//! use lexical_nuance::pipeline::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&config);
//! if report.has_errors() {
//!     eprintln!("config rejected: {}", report.error_summary());
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::{ConfigIssue, IssueCode};
use crate::types::{MiningConfig, MAX_COLLOCATION_WINDOW};

/// Errors block analysis; warnings (unknown fields outside strict mode) do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One config problem. Serializes flat: `severity`, `code`, `path`, `message`, `hint`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub issue: ConfigIssue,
}

impl ValidationDiagnostic {
    pub fn error(issue: ConfigIssue) -> Self {
        Self {
            severity: Severity::Error,
            issue,
        }
    }

    pub fn warning(issue: ConfigIssue) -> Self {
        Self {
            severity: Severity::Warning,
            issue,
        }
    }
}

/// Everything the rules found in one config, in rule order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Problems that stop `Analyzer::new`
    pub fn errors(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.issue)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.issue)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// A config with only warnings can still be mined.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Errors joined with `"; "`, as carried by [`crate::NuanceError::InvalidConfig`]
    pub fn error_summary(&self) -> String {
        self.errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// One check over a [`MiningConfig`]. Rules hold no state and may report
/// several fields at once.
pub trait ValidationRule: Send + Sync {
    /// Stable snake_case name, e.g. `"collocation_window"`
    fn name(&self) -> &str;

    fn validate(&self, config: &MiningConfig) -> Vec<ValidationDiagnostic>;
}

/// Ordered rule set for mining configs
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Positive limits, window cap, winner threshold range, unknown fields
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(PositiveLimitsRule));
        engine.add_rule(Box::new(WindowCapRule));
        engine.add_rule(Box::new(WinnerThresholdRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(&self, config: &MiningConfig) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(config));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Sentence gates, top-k caps, minimum counts and the window are all
/// rejected at zero.
struct PositiveLimitsRule;

impl ValidationRule for PositiveLimitsRule {
    fn name(&self) -> &str {
        "positive_limits"
    }

    fn validate(&self, config: &MiningConfig) -> Vec<ValidationDiagnostic> {
        let checks: &[(&str, usize)] = &[
            ("min_tokens", config.min_tokens),
            ("top_genres", config.top_genres),
            ("min_sentences", config.min_sentences),
            ("pattern_top_k", config.pattern_top_k),
            ("pattern_min_count", config.pattern_min_count as usize),
            ("pattern_example_cap", config.pattern_example_cap),
            ("window", config.window),
            ("collocation_top_k", config.collocation_top_k),
            ("collocation_min_count", config.collocation_min_count as usize),
            ("duel_top_genres", config.duel_top_genres),
            ("duel_unique_items", config.duel_unique_items),
        ];

        checks
            .iter()
            .filter(|(_, value)| *value == 0)
            .map(|(field, _)| {
                ValidationDiagnostic::error(
                    ConfigIssue::new(
                        IssueCode::NonPositive,
                        format!("/{field}"),
                        format!("{field} must be greater than 0"),
                    )
                    .with_hint("Remove the field to use the default"),
                )
            })
            .collect()
    }
}

/// The window is a radius in tokens; sentences never come close to
/// [`MAX_COLLOCATION_WINDOW`] on either side.
struct WindowCapRule;

impl ValidationRule for WindowCapRule {
    fn name(&self) -> &str {
        "collocation_window"
    }

    fn validate(&self, config: &MiningConfig) -> Vec<ValidationDiagnostic> {
        if config.window <= MAX_COLLOCATION_WINDOW {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ConfigIssue::new(
                IssueCode::OutOfRange,
                "/window",
                format!(
                    "window must be at most {MAX_COLLOCATION_WINDOW}, got {}",
                    config.window
                ),
            )
            .with_hint("Use 3 for the standard window"),
        )]
    }
}

/// Winner threshold is a percentage-point gap
struct WinnerThresholdRule;

impl ValidationRule for WinnerThresholdRule {
    fn name(&self) -> &str {
        "winner_threshold"
    }

    fn validate(&self, config: &MiningConfig) -> Vec<ValidationDiagnostic> {
        let t = config.winner_threshold;
        if t.is_finite() && (0.0..=100.0).contains(&t) {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ConfigIssue::new(
                IssueCode::OutOfRange,
                "/winner_threshold",
                format!("winner_threshold must be within [0, 100], got {t}"),
            )
            .with_hint("Use 5.0 for the standard threshold"),
        )]
    }
}

/// Fields serde did not recognise: errors in strict mode, warnings otherwise
struct UnknownFieldsRule;

impl UnknownFieldsRule {
    fn check_unknowns(
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    ConfigIssue::new(
                        IssueCode::UnknownField,
                        format!("/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, config: &MiningConfig) -> Vec<ValidationDiagnostic> {
        Self::check_unknowns(&config.unknown_fields, config.strict)
    }
}
