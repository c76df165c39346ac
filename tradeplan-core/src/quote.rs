//! Quote domain types — per-symbol records and the ordered quote set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A provider-reported quote for one symbol at request time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub symbol: String,
    pub price: f64,
    pub market_cap: f64,
}

/// Insertion-ordered mapping from symbol to [`QuoteRecord`].
///
/// Each symbol appears at most once. Insertion order matches the order
/// records were first seen (universe order on a fetch, row order on a cache
/// load), which keeps downstream output deterministic. Inserting a symbol
/// that is already present replaces the record in place; the original slot
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSet {
    records: Vec<QuoteRecord>,
    index: HashMap<String, usize>,
}

impl QuoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a collected record list in one pass.
    pub fn from_records(records: impl IntoIterator<Item = QuoteRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Insert a record, replacing any existing record for the same symbol
    /// (last write wins, position retained).
    pub fn insert(&mut self, record: QuoteRecord) {
        match self.index.get(&record.symbol) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.index.insert(record.symbol.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&QuoteRecord> {
        self.index.get(symbol).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QuoteRecord> {
        self.records.iter()
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.symbol.as_str())
    }
}

impl<'a> IntoIterator for &'a QuoteSet {
    type Item = &'a QuoteRecord;
    type IntoIter = std::slice::Iter<'a, QuoteRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
