//! Construction pattern engine
//!
//! For every occurrence of the target lemma, the target's own tag picks a
//! [`ConstructionRule`] (verb, noun or adjective by default) and the rule
//! reads the neighbouring tokens to name a frame such as `"V + to do"` or
//! `"N + of + n."`. Frames are tallied per genre.
//!
//! Rules are registered per [`PosClass`], so new word classes plug in
//! without touching the existing rule bodies.

use indexmap::IndexMap;

use super::{eligible_genres, tag_genre, GenreSkip, MiningContext, MiningOutput, Tally};
use crate::corpus::GenreExamples;
use crate::types::{MiningConfig, PatternEntry, PosClass, TaggedToken};

/// The target occurrence a rule looks at
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'s> {
    pub tokens: &'s [TaggedToken],
    pub index: usize,
}

impl<'s> Occurrence<'s> {
    pub fn new(tokens: &'s [TaggedToken], index: usize) -> Self {
        Self { tokens, index }
    }

    pub fn target(&self) -> &'s TaggedToken {
        &self.tokens[self.index]
    }

    pub fn next(&self) -> Option<&'s TaggedToken> {
        self.tokens.get(self.index + 1)
    }

    pub fn previous(&self) -> Option<&'s TaggedToken> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn is_sentence_initial(&self) -> bool {
        self.index == 0
    }
}

/// Names the construction a target of one word class appears in
pub trait ConstructionRule: Send + Sync {
    /// The word class this rule handles
    fn word_class(&self) -> PosClass;

    /// The frame template for this occurrence, if any
    fn frame(&self, occ: &Occurrence<'_>, cfg: &MiningConfig) -> Option<String>;
}

/// Shared tail of every rule: infinitive and prepositional complements.
/// The preposition keeps its surface case.
fn complement_frame(prefix: &str, next: &TaggedToken) -> Option<String> {
    match next.class() {
        PosClass::InfinitiveMarker => Some(format!("{prefix} + to do")),
        PosClass::Preposition => Some(format!("{prefix} + {} + n.", next.surface)),
        _ => None,
    }
}

/// `think that ...`, `want to ...`, `look at ...`, `take time`
#[derive(Debug, Clone, Copy, Default)]
pub struct VerbRule;

impl ConstructionRule for VerbRule {
    fn word_class(&self) -> PosClass {
        PosClass::Verb
    }

    fn frame(&self, occ: &Occurrence<'_>, cfg: &MiningConfig) -> Option<String> {
        let next = occ.next()?;
        if next.is("that") {
            return Some("V + that-clause".to_string());
        }
        if let Some(frame) = complement_frame("V", next) {
            return Some(frame);
        }
        // A following subject pronoun starts a new clause, it is not an object
        if next.class().is_nominal() && !cfg.is_subject_pronoun(&next.surface) {
            return Some("V + object (n.)".to_string());
        }
        if occ.is_sentence_initial() || occ.previous().is_some_and(|p| p.surface == ",") {
            return Some("Discourse Marker".to_string());
        }
        None
    }
}

/// `way of life`, `idea that ...`, `way to go`, `search for ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct NounRule;

impl ConstructionRule for NounRule {
    fn word_class(&self) -> PosClass {
        PosClass::Noun
    }

    fn frame(&self, occ: &Occurrence<'_>, _cfg: &MiningConfig) -> Option<String> {
        let next = occ.next()?;
        if next.is("of") {
            return Some("N + of + n.".to_string());
        }
        if next.is("that") {
            return Some("N + that-clause".to_string());
        }
        complement_frame("N", next)
    }
}

/// `happy to see`, `good at ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjectiveRule;

impl ConstructionRule for AdjectiveRule {
    fn word_class(&self) -> PosClass {
        PosClass::Adjective
    }

    fn frame(&self, occ: &Occurrence<'_>, _cfg: &MiningConfig) -> Option<String> {
        complement_frame("Adj", occ.next()?)
    }
}

/// Extracts construction frames around a target lemma
pub struct ConstructionMiner {
    rules: IndexMap<PosClass, Box<dyn ConstructionRule>>,
}

impl Default for ConstructionMiner {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConstructionMiner {
    /// Create a miner with no rules (every occurrence yields nothing)
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Verb, noun and adjective rules
    pub fn with_defaults() -> Self {
        let mut miner = Self::new();
        miner.add_rule(Box::new(VerbRule));
        miner.add_rule(Box::new(NounRule));
        miner.add_rule(Box::new(AdjectiveRule));
        miner
    }

    /// Register a rule, replacing any rule for the same word class
    pub fn add_rule(&mut self, rule: Box<dyn ConstructionRule>) {
        self.rules.insert(rule.word_class(), rule);
    }

    /// Frame for a single occurrence, dispatched on the target's own tag
    pub fn frame(&self, occ: &Occurrence<'_>, cfg: &MiningConfig) -> Option<String> {
        self.rules
            .get(&occ.target().class())
            .and_then(|rule| rule.frame(occ, cfg))
    }

    /// Tally frames per genre and keep the most frequent ones.
    ///
    /// Genres below the sentence minimum, and genres where no frame reaches
    /// the minimum count, are left out of the result.
    pub fn extract<'a>(
        &self,
        target_lemma: &str,
        top_genres: &[String],
        examples: &GenreExamples<'a>,
        ctx: &MiningContext<'_>,
    ) -> MiningOutput<Vec<PatternEntry>> {
        let cfg = ctx.config;
        let mut out = MiningOutput::default();

        for (genre, sentences) in eligible_genres(top_genres, examples, cfg, &mut out.skipped_genres)
        {
            let mut tally = Tally::new(cfg.pattern_example_cap);

            for sentence in tag_genre(genre, sentences, ctx, &mut out.summary) {
                for index in sentence.occurrences(target_lemma, ctx.lemmas) {
                    let occ = Occurrence::new(&sentence.tokens, index);
                    if let Some(template) = self.frame(&occ, cfg) {
                        tally.record(&template, &sentence.record.text);
                    }
                }
            }

            let entries: Vec<PatternEntry> = tally
                .ranked(cfg.pattern_top_k, cfg.pattern_min_count)
                .into_iter()
                .map(|(template, count, kept)| PatternEntry {
                    template: template.to_string(),
                    count,
                    examples: kept.to_vec(),
                })
                .collect();

            if entries.is_empty() {
                out.skipped_genres.push(GenreSkip::NoQualifyingItems {
                    genre: genre.to_string(),
                });
            } else {
                out.by_genre.insert(genre.to_string(), entries);
            }
        }

        out
    }
}

/// Run the default construction rules over `examples`
pub fn extract_patterns<'a>(
    target_lemma: &str,
    top_genres: &[String],
    examples: &GenreExamples<'a>,
    ctx: &MiningContext<'_>,
) -> MiningOutput<Vec<PatternEntry>> {
    ConstructionMiner::with_defaults().extract(target_lemma, top_genres, examples, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::aggregate;
    use crate::nlp::lemma::LemmaTable;
    use crate::nlp::tagger::LexiconTagger;
    use crate::types::{CorpusSource, SentenceRecord};

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs.iter().map(|(w, t)| TaggedToken::new(*w, *t)).collect()
    }

    fn frame_at(tokens: &[TaggedToken], index: usize) -> Option<String> {
        ConstructionMiner::with_defaults()
            .frame(&Occurrence::new(tokens, index), &MiningConfig::default())
    }

    fn record(text: &str, genre: &str) -> SentenceRecord {
        SentenceRecord::new(
            text,
            text.split_whitespace().map(str::to_string).collect(),
            CorpusSource::CorpusA,
            genre,
        )
    }

    #[test]
    fn test_verb_that_clause() {
        let tokens = tagged(&[
            ("I", "PRP"),
            ("think", "VBP"),
            ("that", "IN"),
            ("he", "PRP"),
            ("left", "VBD"),
            (".", "."),
        ]);
        assert_eq!(frame_at(&tokens, 1).as_deref(), Some("V + that-clause"));
    }

    #[test]
    fn test_verb_complements() {
        let to_do = tagged(&[("want", "VBP"), ("to", "TO"), ("go", "VB")]);
        assert_eq!(frame_at(&to_do, 0).as_deref(), Some("V + to do"));

        let prep = tagged(&[("we", "PRP"), ("look", "VBP"), ("at", "IN"), ("it", "PRP")]);
        assert_eq!(frame_at(&prep, 1).as_deref(), Some("V + at + n."));

        let upper = tagged(&[("we", "PRP"), ("look", "VBP"), ("At", "IN"), ("it", "PRP")]);
        assert_eq!(frame_at(&upper, 1).as_deref(), Some("V + At + n."));

        let object = tagged(&[("we", "PRP"), ("take", "VBP"), ("time", "NN")]);
        assert_eq!(frame_at(&object, 1).as_deref(), Some("V + object (n.)"));
    }

    #[test]
    fn test_verb_subject_pronoun_is_not_object() {
        // "... I know he is right": "he" opens a clause
        let tokens = tagged(&[("so", "RB"), ("know", "VBP"), ("he", "PRP"), ("is", "VBZ")]);
        assert_eq!(frame_at(&tokens, 1), None);

        // Object pronouns still count
        let tokens = tagged(&[("so", "RB"), ("know", "VBP"), ("him", "PRP"), ("well", "RB")]);
        assert_eq!(frame_at(&tokens, 1).as_deref(), Some("V + object (n.)"));
    }

    #[test]
    fn test_verb_discourse_marker() {
        let initial = tagged(&[("Look", "VB"), ("here", "RB")]);
        assert_eq!(frame_at(&initial, 0).as_deref(), Some("Discourse Marker"));

        let after_comma = tagged(&[("and", "CC"), (",", ","), ("say", "VB"), ("again", "RB")]);
        assert_eq!(frame_at(&after_comma, 2).as_deref(), Some("Discourse Marker"));

        // Sentence-final verbs have no following token to inspect
        let last = tagged(&[("Look", "VB")]);
        assert_eq!(frame_at(&last, 0), None);
    }

    #[test]
    fn test_noun_rules() {
        let of = tagged(&[("the", "DT"), ("way", "NN"), ("of", "IN"), ("life", "NN")]);
        assert_eq!(frame_at(&of, 1).as_deref(), Some("N + of + n."));

        let that = tagged(&[("the", "DT"), ("idea", "NN"), ("that", "IN")]);
        assert_eq!(frame_at(&that, 1).as_deref(), Some("N + that-clause"));

        let to = tagged(&[("a", "DT"), ("way", "NN"), ("to", "TO"), ("go", "VB")]);
        assert_eq!(frame_at(&to, 1).as_deref(), Some("N + to do"));

        let prep = tagged(&[("the", "DT"), ("search", "NN"), ("for", "IN"), ("gold", "NN")]);
        assert_eq!(frame_at(&prep, 1).as_deref(), Some("N + for + n."));

        let none = tagged(&[("the", "DT"), ("way", "NN"), ("home", "NN")]);
        assert_eq!(frame_at(&none, 1), None);
    }

    #[test]
    fn test_adjective_rules() {
        let to = tagged(&[("am", "VBP"), ("happy", "JJ"), ("to", "TO"), ("help", "VB")]);
        assert_eq!(frame_at(&to, 1).as_deref(), Some("Adj + to do"));

        let prep = tagged(&[("is", "VBZ"), ("good", "JJ"), ("at", "IN"), ("chess", "NN")]);
        assert_eq!(frame_at(&prep, 1).as_deref(), Some("Adj + at + n."));
    }

    #[test]
    fn test_other_classes_produce_nothing() {
        let tokens = tagged(&[("very", "RB"), ("to", "TO"), ("go", "VB")]);
        assert_eq!(frame_at(&tokens, 0), None);
    }

    #[test]
    fn test_custom_rule_for_new_class() {
        struct AdverbRule;
        impl ConstructionRule for AdverbRule {
            fn word_class(&self) -> PosClass {
                PosClass::Adverb
            }
            fn frame(&self, occ: &Occurrence<'_>, _cfg: &MiningConfig) -> Option<String> {
                occ.next().map(|_| "Adv + x".to_string())
            }
        }

        let mut miner = ConstructionMiner::with_defaults();
        miner.add_rule(Box::new(AdverbRule));
        let tokens = tagged(&[("very", "RB"), ("good", "JJ")]);
        let occ = Occurrence::new(&tokens, 0);

        assert_eq!(miner.frame(&occ, &MiningConfig::default()).as_deref(), Some("Adv + x"));
    }

    fn happy_records(genre: &str) -> Vec<SentenceRecord> {
        vec![
            record("I am happy to see you .", genre),
            record("She is happy to help .", genre),
            record("They were happy with the result .", genre),
            record("We walked home in the rain .", genre),
            record("The weather was cold and grey .", genre),
        ]
    }

    #[test]
    fn test_happy_scenario_extracts_adj_to_do() {
        let records = happy_records("fiction");
        let cfg = MiningConfig::default();
        let agg = aggregate(&records, &cfg);
        let tagger = LexiconTagger::new().with_entry("happy", "JJ");
        let lemmas = LemmaTable::new();
        let ctx = MiningContext::new(&tagger, &lemmas, &cfg);

        let out = extract_patterns("happy", &agg.top_genres, &agg.examples, &ctx);
        let patterns = &out.by_genre["fiction"];

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].template, "Adj + to do");
        assert_eq!(patterns[0].count, 2);
        assert_eq!(
            patterns[0].examples,
            vec!["I am happy to see you .", "She is happy to help ."]
        );
        // "happy with" only occurred once
        assert_eq!(out.summary.tagged, 5);
    }

    #[test]
    fn test_four_sentences_never_qualify() {
        let mut records = happy_records("fiction");
        records.pop();
        let cfg = MiningConfig::default();
        let agg = aggregate(&records, &cfg);
        let tagger = LexiconTagger::new().with_entry("happy", "JJ");
        let lemmas = LemmaTable::new();
        let ctx = MiningContext::new(&tagger, &lemmas, &cfg);

        let out = extract_patterns("happy", &agg.top_genres, &agg.examples, &ctx);

        assert!(out.by_genre.is_empty());
        assert_eq!(
            out.skipped_genres,
            vec![GenreSkip::InsufficientData {
                genre: "fiction".into(),
                sentences: 4
            }]
        );
        assert_eq!(out.summary.total(), 0);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let mut records = happy_records("fiction");
        records.extend(happy_records("news"));
        let cfg = MiningConfig::default();
        let agg = aggregate(&records, &cfg);
        let tagger = LexiconTagger::new().with_entry("happy", "JJ");
        let lemmas = LemmaTable::new();
        let ctx = MiningContext::new(&tagger, &lemmas, &cfg);

        let first = extract_patterns("happy", &agg.top_genres, &agg.examples, &ctx);
        let second = extract_patterns("happy", &agg.top_genres, &agg.examples, &ctx);

        assert_eq!(first.by_genre, second.by_genre);
        assert_eq!(first.by_genre.len(), 2);
    }

    #[test]
    fn test_lemmatized_occurrences_share_a_tally() {
        let records = vec![
            record("He thought that it was over .", "news"),
            record("She thinks that we should stay .", "news"),
            record("Nobody knows what will happen next .", "news"),
            record("The market closed lower on Friday .", "news"),
            record("Prices rose sharply last month .", "news"),
        ];
        let cfg = MiningConfig::default();
        let agg = aggregate(&records, &cfg);
        let tagger = LexiconTagger::new()
            .with_entry("thought", "VBD")
            .with_entry("thinks", "VBZ");
        let lemmas = LemmaTable::from_exchange_entries([("think", "p:thought/d:thought/3:thinks")]);
        let ctx = MiningContext::new(&tagger, &lemmas, &cfg);

        let out = extract_patterns("think", &agg.top_genres, &agg.examples, &ctx);

        assert_eq!(out.by_genre["news"][0].template, "V + that-clause");
        assert_eq!(out.by_genre["news"][0].count, 2);
    }
}
