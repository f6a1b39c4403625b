//! Analysis runner: orchestrates aggregation, extraction and storage.
//!
//! An [`Analyzer`] owns the validated configuration, the lemma table and the
//! tagger. [`Analyzer::analyze`] runs one target word through the stages in
//! order, notifying an [`AnalysisObserver`] at each boundary:
//!
//! 1. Aggregate: filter records, count registers, group examples
//! 2. Extract: construction frames (PATTERN) or collocations (LINEAR)
//!
//! [`Analyzer::analyze_into`] adds a third stage that upserts the profile.

use crate::corpus::{aggregate, FilterStats};
use crate::errors::{NuanceError, Result};
use crate::mining::collocation::extract_collocations;
use crate::mining::construction::ConstructionMiner;
use crate::mining::{BatchSummary, GenreSkip, MiningContext};
use crate::nlp::lemma::LemmaTable;
use crate::nlp::tagger::PosTagger;
use crate::pipeline::observer::{
    AnalysisObserver, StageClock, StageReportBuilder, STAGE_AGGREGATE, STAGE_EXTRACT, STAGE_STORE,
};
use crate::pipeline::validation::ValidationEngine;
use crate::store::ProfileStore;
use crate::types::{MiningConfig, SentenceRecord, Strategy, WordProfile};

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for an analysis stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("analysis_stage", stage = $name).entered();
    };
}

/// Everything one analysis run produced
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub profile: WordProfile,
    /// Tagging successes and per-sentence skips
    pub summary: BatchSummary,
    /// Top genres that produced no entries, with the reason
    pub skipped_genres: Vec<GenreSkip>,
    pub filter: FilterStats,
}

/// Runs target words through aggregation and extraction
pub struct Analyzer {
    config: MiningConfig,
    lemmas: LemmaTable,
    tagger: Box<dyn PosTagger>,
    miner: ConstructionMiner,
}

impl Analyzer {
    /// Build an analyzer, validating `config` with the default rules.
    ///
    /// Returns [`NuanceError::InvalidConfig`] when any rule reports an
    /// error. Warnings are logged and otherwise ignored.
    pub fn new(
        config: MiningConfig,
        lemmas: LemmaTable,
        tagger: impl PosTagger + 'static,
    ) -> Result<Self> {
        Self::with_validation(config, lemmas, tagger, &ValidationEngine::with_defaults())
    }

    /// Like [`Analyzer::new`], validating with a caller-supplied engine
    pub fn with_validation(
        config: MiningConfig,
        lemmas: LemmaTable,
        tagger: impl PosTagger + 'static,
        engine: &ValidationEngine,
    ) -> Result<Self> {
        let report = engine.validate(&config);
        if report.has_errors() {
            return Err(NuanceError::InvalidConfig(report.error_summary()));
        }

        #[cfg(feature = "tracing")]
        for warning in report.warnings() {
            tracing::warn!(%warning, "configuration warning");
        }

        Ok(Self {
            config,
            lemmas,
            tagger: Box::new(tagger),
            miner: ConstructionMiner::with_defaults(),
        })
    }

    /// Replace the construction rules used for PATTERN words
    pub fn with_construction_miner(mut self, miner: ConstructionMiner) -> Self {
        self.miner = miner;
        self
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    pub fn lemmas(&self) -> &LemmaTable {
        &self.lemmas
    }

    /// Analyze `target` over `records` with the given strategy.
    ///
    /// Never fails: sentences the tagger rejects and genres without enough
    /// data are reported in the outcome instead.
    pub fn analyze(
        &self,
        target: &str,
        strategy: Strategy,
        records: &[SentenceRecord],
        observer: &mut impl AnalysisObserver,
    ) -> AnalysisOutcome {
        let target_lemma = self.lemmas.normalize(target.trim());
        let ctx = MiningContext::new(self.tagger.as_ref(), &self.lemmas, &self.config);

        #[cfg(feature = "tracing")]
        tracing::debug!(word = %target_lemma, %strategy, records = records.len(), "analyzing");

        // Stage 1: Aggregate
        trace_stage!(STAGE_AGGREGATE);
        observer.on_stage_start(STAGE_AGGREGATE);
        let clock = StageClock::start();
        let agg = aggregate(records, &self.config);
        let report = StageReportBuilder::new(clock.elapsed())
            .items_in(records.len())
            .items_out(agg.filter.accepted)
            .skipped(agg.filter.rejected())
            .build();
        observer.on_stage_end(STAGE_AGGREGATE, &report);

        // Stage 2: Extract
        trace_stage!(STAGE_EXTRACT);
        observer.on_stage_start(STAGE_EXTRACT);
        let clock = StageClock::start();
        let (profile, summary, skipped_genres) = match strategy {
            Strategy::Pattern => {
                let out = self
                    .miner
                    .extract(&target_lemma, &agg.top_genres, &agg.examples, &ctx);
                let profile = WordProfile::from_patterns(agg.register, out.by_genre);
                (profile, out.summary, out.skipped_genres)
            }
            Strategy::Linear => {
                let out =
                    extract_collocations(&target_lemma, &agg.top_genres, &agg.examples, &ctx);
                let profile = WordProfile::from_collocations(agg.register, out.by_genre);
                (profile, out.summary, out.skipped_genres)
            }
        };
        let report = StageReportBuilder::new(clock.elapsed())
            .items_in(summary.total())
            .items_out(profile.analysis.len())
            .skipped(summary.skipped_count())
            .build();
        observer.on_stage_end(STAGE_EXTRACT, &report);

        AnalysisOutcome {
            profile,
            summary,
            skipped_genres,
            filter: agg.filter,
        }
    }

    /// Analyze `target` and upsert the resulting profile into `store`
    pub fn analyze_into(
        &self,
        store: &dyn ProfileStore,
        target: &str,
        strategy: Strategy,
        records: &[SentenceRecord],
        observer: &mut impl AnalysisObserver,
    ) -> AnalysisOutcome {
        let outcome = self.analyze(target, strategy, records, observer);

        // Stage 3: Store
        trace_stage!(STAGE_STORE);
        observer.on_stage_start(STAGE_STORE);
        let clock = StageClock::start();
        store.put(target.trim(), outcome.profile.clone());
        let report = StageReportBuilder::new(clock.elapsed()).items_out(1).build();
        observer.on_stage_end(STAGE_STORE, &report);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::duel_words;
    use crate::nlp::tagger::LexiconTagger;
    use crate::pipeline::observer::{NoopObserver, StageTimingObserver};
    use crate::store::MemoryProfileStore;
    use crate::types::{CorpusSource, GenreAnalysis, TaggedToken};

    fn records(source: &str, genre: &str, texts: &[&str]) -> Vec<SentenceRecord> {
        texts
            .iter()
            .map(|t| SentenceRecord::from_text(t, source, genre))
            .collect()
    }

    fn happy_records() -> Vec<SentenceRecord> {
        records(
            "bnc",
            "fiction",
            &[
                "I am happy to see you .",
                "She is happy to help .",
                "They were happy about it .",
                "The day was long and quiet .",
                "We walked home after dinner .",
            ],
        )
    }

    fn growth_records() -> Vec<SentenceRecord> {
        records(
            "masc",
            "blog",
            &[
                "strong growth in exports continued",
                "we saw strong growth in services",
                "slow growth worried investors greatly",
                "markets rallied on the news today",
                "nothing else happened this week",
            ],
        )
    }

    fn tagger() -> LexiconTagger {
        LexiconTagger::new().with_entries(&[
            ("happy", "JJ"),
            ("strong", "JJ"),
            ("slow", "JJ"),
            ("steep", "JJ"),
        ])
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(MiningConfig::default(), LemmaTable::new(), tagger()).unwrap()
    }

    #[test]
    fn test_pattern_word_end_to_end() {
        let recs = happy_records();
        let outcome = analyzer().analyze("happy", Strategy::Pattern, &recs, &mut NoopObserver);

        assert_eq!(outcome.profile.strategy, Strategy::Pattern);
        assert_eq!(outcome.profile.register.count(CorpusSource::CorpusA, "fiction"), 5);
        let GenreAnalysis::Patterns(patterns) = &outcome.profile.analysis["fiction"] else {
            panic!("expected patterns");
        };
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].template, "Adj + to do");
        assert_eq!(patterns[0].count, 2);
        assert_eq!(
            patterns[0].examples,
            vec!["I am happy to see you .", "She is happy to help ."]
        );
        assert_eq!(outcome.summary.tagged, 5);
    }

    #[test]
    fn test_profile_json_shape() {
        let recs = happy_records();
        let outcome = analyzer().analyze("happy", Strategy::Pattern, &recs, &mut NoopObserver);
        let json: serde_json::Value =
            serde_json::from_str(&outcome.profile.to_json().unwrap()).unwrap();

        assert_eq!(json["strategy"], "PATTERN");
        assert_eq!(json["register"]["CorpusA"]["fiction"], 5);
        assert_eq!(json["analysis"]["fiction"][0]["template"], "Adj + to do");
        assert_eq!(json["analysis"]["fiction"][0]["count"], 2);
    }

    #[test]
    fn test_linear_word_end_to_end() {
        let recs = growth_records();
        let outcome = analyzer().analyze("growth", Strategy::Linear, &recs, &mut NoopObserver);

        let GenreAnalysis::Collocations(colls) = &outcome.profile.analysis["blog"] else {
            panic!("expected collocations");
        };
        assert_eq!(colls.modifiers[0].phrase, "strong growth");
        assert_eq!(colls.modifiers[0].count, 2);

        let json = serde_json::to_value(&outcome.profile).unwrap();
        assert_eq!(json["analysis"]["blog"]["modifiers"][0]["p"], "strong growth");
        assert!(json["analysis"]["blog"].get("objects").is_none());
    }

    #[test]
    fn test_small_corpus_yields_register_only() {
        let recs = &happy_records()[..4];
        let outcome = analyzer().analyze("happy", Strategy::Pattern, recs, &mut NoopObserver);

        assert!(outcome.profile.analysis.is_empty());
        assert_eq!(outcome.profile.register.total(CorpusSource::CorpusA), 4);
        assert_eq!(
            outcome.skipped_genres,
            vec![GenreSkip::InsufficientData {
                genre: "fiction".into(),
                sentences: 4
            }]
        );
    }

    #[test]
    fn test_tagging_failure_skips_sentence_only() {
        let base = tagger();
        let flaky = move |tokens: &[String]| -> Result<Vec<TaggedToken>> {
            if tokens.iter().any(|t| t == "dinner") {
                return Err(NuanceError::TaggingFailure {
                    reason: "model crashed".into(),
                });
            }
            base.tag(tokens)
        };
        let analyzer = Analyzer::new(MiningConfig::default(), LemmaTable::new(), flaky).unwrap();
        let recs = happy_records();

        let outcome = analyzer.analyze("happy", Strategy::Pattern, &recs, &mut NoopObserver);

        assert_eq!(outcome.summary.tagged, 4);
        assert_eq!(outcome.summary.skipped_count(), 1);
        assert!(outcome.profile.analysis.contains_key("fiction"));
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let store = MemoryProfileStore::new();
        let recs = happy_records();
        let mut obs = StageTimingObserver::new();

        analyzer().analyze_into(&store, "happy", Strategy::Pattern, &recs, &mut obs);

        assert_eq!(obs.stage_names(), vec![STAGE_AGGREGATE, STAGE_EXTRACT, STAGE_STORE]);
        let agg = obs.report(STAGE_AGGREGATE).unwrap();
        assert_eq!(agg.items_in, Some(5));
        assert_eq!(agg.items_out, Some(5));
        assert_eq!(obs.report(STAGE_EXTRACT).unwrap().items_out, Some(1));
        assert!(store.is_analyzed("happy"));
    }

    #[test]
    fn test_analyze_into_then_duel() {
        let store = MemoryProfileStore::new();
        let analyzer = analyzer();
        let growth = growth_records();
        let decline = records(
            "masc",
            "blog",
            &[
                "steep decline in sales followed",
                "we saw steep decline in output",
                "the decline worried investors greatly",
                "markets rallied on the news today",
                "nothing else happened this week",
            ],
        );

        analyzer.analyze_into(&store, "growth", Strategy::Linear, &growth, &mut NoopObserver);
        analyzer.analyze_into(&store, "decline", Strategy::Linear, &decline, &mut NoopObserver);
        let report = duel_words(&store, "growth", "decline", analyzer.config()).unwrap();

        assert_eq!(report.collocation_contrast.unique_a, vec!["strong growth"]);
        assert_eq!(report.collocation_contrast.unique_b, vec!["steep decline"]);
        let blog = &report.register_contrast[&CorpusSource::CorpusB][0];
        assert_eq!(blog.genre, "blog");
        assert_eq!(blog.delta, 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = MiningConfig::default().with_window(0);
        let err = Analyzer::new(cfg, LemmaTable::new(), tagger()).err().unwrap();
        assert!(matches!(err, NuanceError::InvalidConfig(ref msg) if msg.contains("/window")));
    }

    #[test]
    fn test_target_is_lemmatized() {
        let mut lemmas = LemmaTable::new();
        lemmas.add_exchange("happy", "r:happier/t:happiest");
        let analyzer = Analyzer::new(MiningConfig::default(), lemmas, tagger()).unwrap();
        let recs = happy_records();

        let outcome = analyzer.analyze("Happier", Strategy::Pattern, &recs, &mut NoopObserver);

        assert!(outcome.profile.analysis.contains_key("fiction"));
    }
}
