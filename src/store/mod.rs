//! Profile storage boundary
//!
//! The engines never own persistence. They read and write through a
//! [`ProfileStore`]: one upserted [`WordProfile`] per word, plus the
//! dictionary metadata (definition, frequency rank) the synonym scorer
//! reports alongside each candidate.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::{Strategy, WordProfile};

/// Dictionary metadata for a word that has a completed analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedWord {
    pub word: String,
    pub definition: String,
    /// Corpus frequency rank (lower is more frequent)
    pub rank: u32,
}

/// Read-then-write-once storage of word profiles
pub trait ProfileStore: Send + Sync {
    /// The stored profile for `word`, if it has been analyzed
    fn get(&self, word: &str) -> Option<WordProfile>;

    /// Insert or replace the profile for `word`
    fn put(&self, word: &str, profile: WordProfile);

    /// Metadata for every candidate that has a completed profile, in
    /// candidate order, at most one row per candidate
    fn list_analyzed(&self, candidates: &[String]) -> Vec<AnalyzedWord>;
}

/// One dictionary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWord {
    pub definition: String,
    pub rank: u32,
    pub strategy: Strategy,
    #[serde(default)]
    pub profile: Option<WordProfile>,
}

/// Thread-safe in-memory store with JSON snapshots
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    entries: RwLock<IndexMap<String, StoredWord>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Rows are replaced whole, so a poisoned lock still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, StoredWord>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, StoredWord>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a dictionary word without an analysis
    ///
    /// An existing profile for the word is kept.
    pub fn register_word(&self, word: &str, definition: &str, rank: u32, strategy: Strategy) {
        let mut entries = self.write();
        let entry = entries.entry(word.to_lowercase()).or_insert_with(|| StoredWord {
            definition: String::new(),
            rank,
            strategy,
            profile: None,
        });
        entry.definition = definition.to_string();
        entry.rank = rank;
        entry.strategy = strategy;
    }

    /// Strategy recorded for `word` at registration
    pub fn strategy(&self, word: &str) -> Option<Strategy> {
        self.read().get(&word.to_lowercase()).map(|e| e.strategy)
    }

    pub fn is_analyzed(&self, word: &str) -> bool {
        self.read()
            .get(&word.to_lowercase())
            .is_some_and(|e| e.profile.is_some())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.read())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: IndexMap<String, StoredWord> = serde_json::from_str(json)?;
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, word: &str) -> Option<WordProfile> {
        self.read()
            .get(&word.to_lowercase())
            .and_then(|e| e.profile.clone())
    }

    fn put(&self, word: &str, profile: WordProfile) {
        let mut entries = self.write();
        match entries.get_mut(&word.to_lowercase()) {
            Some(entry) => {
                entry.strategy = profile.strategy;
                entry.profile = Some(profile);
            }
            None => {
                entries.insert(
                    word.to_lowercase(),
                    StoredWord {
                        definition: String::new(),
                        rank: 0,
                        strategy: profile.strategy,
                        profile: Some(profile),
                    },
                );
            }
        }
    }

    fn list_analyzed(&self, candidates: &[String]) -> Vec<AnalyzedWord> {
        let entries = self.read();
        candidates
            .iter()
            .filter_map(|word| {
                let key = word.to_lowercase();
                let entry = entries.get(&key).filter(|e| e.profile.is_some())?;
                Some(AnalyzedWord {
                    word: key,
                    definition: entry.definition.clone(),
                    rank: entry.rank,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CorpusSource, RegisterStats};

    fn profile(strategy: Strategy) -> WordProfile {
        let mut register = RegisterStats::new();
        register.increment(CorpusSource::CorpusA, "news");
        WordProfile {
            register,
            strategy,
            analysis: IndexMap::new(),
        }
    }

    #[test]
    fn test_put_is_upsert() {
        let store = MemoryProfileStore::new();
        store.register_word("glad", "pleased", 1500, Strategy::Pattern);
        assert!(store.get("glad").is_none());

        store.put("glad", profile(Strategy::Pattern));
        store.put("Glad", profile(Strategy::Linear));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("glad").unwrap().strategy, Strategy::Linear);
        assert_eq!(store.strategy("glad"), Some(Strategy::Linear));
    }

    #[test]
    fn test_list_analyzed_filters_unanalyzed() {
        let store = MemoryProfileStore::new();
        store.register_word("glad", "pleased", 1500, Strategy::Pattern);
        store.register_word("felicitous", "apt", 30000, Strategy::Linear);
        store.put("glad", profile(Strategy::Pattern));

        let listed = store.list_analyzed(&[
            "felicitous".to_string(),
            "glad".to_string(),
            "absent".to_string(),
        ]);

        assert_eq!(
            listed,
            vec![AnalyzedWord {
                word: "glad".into(),
                definition: "pleased".into(),
                rank: 1500
            }]
        );
    }

    #[test]
    fn test_json_snapshot() {
        let store = MemoryProfileStore::new();
        store.register_word("glad", "pleased", 1500, Strategy::Pattern);
        store.put("glad", profile(Strategy::Pattern));

        let restored = MemoryProfileStore::from_json(&store.to_json().unwrap()).unwrap();

        assert!(restored.is_analyzed("glad"));
        assert_eq!(restored.get("glad"), store.get("glad"));
    }

    #[test]
    fn test_register_keeps_existing_profile() {
        let store = MemoryProfileStore::new();
        store.put("glad", profile(Strategy::Pattern));
        store.register_word("glad", "pleased", 1500, Strategy::Pattern);

        assert!(store.is_analyzed("glad"));
        assert_eq!(store.list_analyzed(&["glad".to_string()])[0].rank, 1500);
    }
}
