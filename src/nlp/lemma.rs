//! Lemma normalization
//!
//! Maps inflected surface forms to their base form using a precomputed
//! base ↔ inflection table, typically built from dictionary "exchange"
//! strings such as `p:went/d:gone/i:going/3:goes`.

use rustc_hash::FxHashMap;

/// Inflection → base form lookup table
#[derive(Debug, Clone, Default)]
pub struct LemmaTable {
    /// Lower-cased inflection -> lower-cased base
    forms: FxHashMap<String, String>,
}

impl LemmaTable {
    /// Create an empty table (every word normalizes to its lower-case form)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(base, exchange)` dictionary rows
    pub fn from_exchange_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self::new();
        for (base, exchange) in entries {
            table.add_exchange(base, exchange);
        }
        table
    }

    /// Register every inflection named in an exchange string.
    ///
    /// Segments are `/`-separated `kind:form` pairs; forms must consist of
    /// ASCII letters or hyphens, anything else is skipped.
    pub fn add_exchange(&mut self, base: &str, exchange: &str) {
        for segment in exchange.split('/') {
            let Some((_, form)) = segment.split_once(':') else {
                continue;
            };
            if is_inflection(form) {
                self.insert(form, base);
            }
        }
    }

    /// Map a single inflection to its base
    pub fn insert(&mut self, inflection: &str, base: &str) {
        self.forms
            .insert(inflection.to_lowercase(), base.to_lowercase());
    }

    /// Reduce `word` to its base form.
    ///
    /// Total: unknown words come back lower-cased.
    pub fn normalize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        match self.forms.get(&lower) {
            Some(base) => base.clone(),
            None => lower,
        }
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

fn is_inflection(form: &str) -> bool {
    !form.is_empty() && form.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}
