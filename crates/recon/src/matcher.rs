use std::collections::{BTreeSet, HashMap};

use crate::model::{CanonicalKey, KeyedEntry, Partition, RawIdentifier};

/// Partition two key sets by exact key equality.
///
/// `matched = R ∩ P`, `unmatched_reference = R − P`, `unmatched_pdf = P − R`.
pub fn reconcile(pdf_keys: &BTreeSet<CanonicalKey>, reference_keys: &BTreeSet<CanonicalKey>) -> Partition {
    Partition {
        matched: reference_keys.intersection(pdf_keys).cloned().collect(),
        unmatched_reference: reference_keys.difference(pdf_keys).cloned().collect(),
        unmatched_pdf: pdf_keys.difference(reference_keys).cloned().collect(),
    }
}

/// Distinct keys in first-seen order, each with all raw strings that produced it.
#[derive(Debug, Default)]
pub struct KeyIndex {
    entries: Vec<KeyedEntry>,
    positions: HashMap<CanonicalKey, usize>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `raw` under `key`. Empty keys are ignored.
    pub fn insert(&mut self, key: CanonicalKey, display: String, raw: RawIdentifier) {
        if key.is_empty() {
            return;
        }
        if let Some(&idx) = self.positions.get(&key) {
            self.entries[idx].sources.push(raw);
            return;
        }
        let position = self.entries.len();
        self.positions.insert(key.clone(), position);
        self.entries.push(KeyedEntry { key, display, position, sources: vec![raw] });
    }

    pub fn keys(&self) -> BTreeSet<CanonicalKey> {
        self.positions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose key is in `keys`, in first-seen order.
    pub fn select(&self, keys: &BTreeSet<CanonicalKey>) -> Vec<KeyedEntry> {
        self.entries.iter().filter(|e| keys.contains(&e.key)).cloned().collect()
    }

    /// Entries produced by more than one raw string.
    pub fn duplicates(&self) -> Vec<KeyedEntry> {
        self.entries.iter().filter(|e| e.sources.len() > 1).cloned().collect()
    }
}
