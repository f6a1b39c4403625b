//! In-memory sense inventory with hypernym links
//!
//! Path similarity follows the usual definition: `1 / (1 + d)` where `d` is
//! the length of the shortest path between two senses that passes through a
//! shared hypernym. Senses without a shared ancestor are not comparable.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::{LexicalResource, Sense};
use crate::errors::{NuanceError, Result};

#[derive(Debug, Clone)]
struct SenseNode {
    sense: Sense,
    hypernyms: Vec<usize>,
}

/// Sense inventory backed by adjacency lists
#[derive(Debug, Clone, Default)]
pub struct SenseGraph {
    nodes: Vec<SenseNode>,
    by_id: FxHashMap<String, usize>,
    /// Lemma key -> sense indices, in insertion order
    by_lemma: FxHashMap<String, Vec<usize>>,
}

/// Lookup key for a lemma or word: lower case, `_` between words
fn lemma_key(word: &str) -> String {
    word.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

impl SenseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sense. Re-adding an existing id replaces its lemma list.
    pub fn add_sense(&mut self, id: &str, lemmas: &[&str]) {
        let sense = Sense::new(id, lemmas);
        let idx = match self.by_id.get(id) {
            Some(&idx) => {
                for list in self.by_lemma.values_mut() {
                    list.retain(|&i| i != idx);
                }
                self.nodes[idx].sense = sense;
                idx
            }
            None => {
                let idx = self.nodes.len();
                self.by_id.insert(id.to_string(), idx);
                self.nodes.push(SenseNode {
                    sense,
                    hypernyms: Vec::new(),
                });
                idx
            }
        };
        for lemma in lemmas {
            self.by_lemma.entry(lemma_key(lemma)).or_default().push(idx);
        }
    }

    /// Link `child` under `parent`
    pub fn add_hypernym(&mut self, child: &str, parent: &str) -> Result<()> {
        let child_idx = self.index_of(child)?;
        let parent_idx = self.index_of(parent)?;
        let hypernyms = &mut self.nodes[child_idx].hypernyms;
        if !hypernyms.contains(&parent_idx) {
            hypernyms.push(parent_idx);
        }
        Ok(())
    }

    pub fn sense(&self, id: &str) -> Option<&Sense> {
        self.by_id.get(id).map(|&i| &self.nodes[i].sense)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| NuanceError::UnknownSense(id.to_string()))
    }

    /// Distance from `start` to each of its ancestors (itself at 0)
    fn ancestor_distances(&self, start: usize) -> FxHashMap<usize, usize> {
        let mut dist = FxHashMap::default();
        let mut queue = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            let d = dist[&node];
            for &parent in &self.nodes[node].hypernyms {
                if !dist.contains_key(&parent) {
                    dist.insert(parent, d + 1);
                    queue.push_back(parent);
                }
            }
        }

        dist
    }

    /// Shortest hypernym path between two senses, if they share an ancestor
    pub fn shortest_path(&self, a: &str, b: &str) -> Option<usize> {
        let a = *self.by_id.get(a)?;
        let b = *self.by_id.get(b)?;
        let from_a = self.ancestor_distances(a);
        let from_b = self.ancestor_distances(b);

        from_a
            .iter()
            .filter_map(|(node, da)| from_b.get(node).map(|db| da + db))
            .min()
    }
}

impl LexicalResource for SenseGraph {
    fn senses(&self, word: &str) -> Vec<Sense> {
        self.by_lemma
            .get(&lemma_key(word))
            .map(|idxs| idxs.iter().map(|&i| self.nodes[i].sense.clone()).collect())
            .unwrap_or_default()
    }

    fn path_similarity(&self, a: &Sense, b: &Sense) -> Option<f64> {
        self.shortest_path(&a.id, &b.id)
            .map(|d| 1.0 / (1.0 + d as f64))
    }
}
