//! Linear collocation engine
//!
//! Looks at up to `window` tokens either side of each target occurrence,
//! clipped at the sentence edges. A preceding adjective, adverb or verb
//! becomes a modifier (`"<word> <lemma>"`); a following noun or preposition
//! becomes an object (`"<lemma> <word>"`). Position and tag decide the role;
//! there is no dependency parse. Collocate words keep their surface case,
//! so "Strong growth" and "strong growth" are tallied apart.

use super::{eligible_genres, tag_genre, GenreSkip, MiningContext, MiningOutput, Tally};
use crate::corpus::GenreExamples;
use crate::nlp::stopwords::StopwordFilter;
use crate::types::{CollocationEntry, CollocationProfile, TaggedToken};

/// Role a window token plays relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Modifier,
    Object,
}

/// One collocate found in a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collocate {
    pub role: Role,
    pub phrase: String,
}

/// Token index range `[start, end)` covered by the window around `index`
pub fn window_bounds(len: usize, index: usize, radius: usize) -> (usize, usize) {
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).saturating_add(1).min(len);
    (start, end)
}

fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

/// Collocates around the occurrence at `index`, in window order
pub fn collocates_at(
    tokens: &[TaggedToken],
    index: usize,
    target_lemma: &str,
    radius: usize,
    stopwords: &StopwordFilter,
) -> Vec<Collocate> {
    let (start, end) = window_bounds(tokens.len(), index, radius);
    let mut found = Vec::new();

    for (i, token) in tokens.iter().enumerate().take(end).skip(start) {
        if i == index || !is_alphabetic(&token.surface) || stopwords.is_stopword(&token.surface) {
            continue;
        }
        let word = token.surface.as_str();
        let class = token.class();
        if i < index && class.is_modifier() {
            found.push(Collocate {
                role: Role::Modifier,
                phrase: format!("{word} {target_lemma}"),
            });
        } else if i > index && class.is_complement() {
            found.push(Collocate {
                role: Role::Object,
                phrase: format!("{target_lemma} {word}"),
            });
        }
    }

    found
}

fn top_entries(tally: &Tally, top_k: usize, min_count: u32) -> Vec<CollocationEntry> {
    tally
        .ranked(top_k, min_count)
        .into_iter()
        .map(|(phrase, count, kept)| CollocationEntry {
            phrase: phrase.to_string(),
            count,
            example: kept.first().cloned().unwrap_or_default(),
        })
        .collect()
}

/// Tally modifier and object collocates per genre.
///
/// A genre keeps whichever of the two lists is non-empty and is left out
/// when both are empty.
pub fn extract_collocations<'a>(
    target_lemma: &str,
    top_genres: &[String],
    examples: &GenreExamples<'a>,
    ctx: &MiningContext<'_>,
) -> MiningOutput<CollocationProfile> {
    let cfg = ctx.config;
    let stopwords = StopwordFilter::from_config(cfg);
    let mut out = MiningOutput::default();

    for (genre, sentences) in eligible_genres(top_genres, examples, cfg, &mut out.skipped_genres) {
        let mut modifiers = Tally::new(1);
        let mut objects = Tally::new(1);

        for sentence in tag_genre(genre, sentences, ctx, &mut out.summary) {
            for index in sentence.occurrences(target_lemma, ctx.lemmas) {
                for collocate in
                    collocates_at(&sentence.tokens, index, target_lemma, cfg.window, &stopwords)
                {
                    let tally = match collocate.role {
                        Role::Modifier => &mut modifiers,
                        Role::Object => &mut objects,
                    };
                    tally.record(&collocate.phrase, &sentence.record.text);
                }
            }
        }

        let profile = CollocationProfile {
            modifiers: top_entries(&modifiers, cfg.collocation_top_k, cfg.collocation_min_count),
            objects: top_entries(&objects, cfg.collocation_top_k, cfg.collocation_min_count),
        };

        if profile.is_empty() {
            out.skipped_genres.push(GenreSkip::NoQualifyingItems {
                genre: genre.to_string(),
            });
        } else {
            out.by_genre.insert(genre.to_string(), profile);
        }
    }

    out
}
