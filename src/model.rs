//! Keyed records and the findings produced by comparing them.

use std::collections::HashMap;

use serde::Serialize;

/// Extracted values for one source row, keyed by the declared column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: HashMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

/// All records from one source keyed by identifier, in first-seen order.
///
/// Re-inserting a key replaces its record but keeps its first-seen position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<(String, Record)>,
    positions: HashMap<String, usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the replaced record when `key` was already present.
    pub fn insert(&mut self, key: impl Into<String>, record: Record) -> Option<Record> {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&idx) => Some(std::mem::replace(&mut self.entries[idx].1, record)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, record));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.positions.get(key).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Record)> for Dataset {
    fn from_iter<I: IntoIterator<Item = (K, Record)>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for (key, record) in iter {
            dataset.insert(key, record);
        }
        dataset
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDifference {
    pub column_a: String,
    pub column_b: String,
    pub value_a: String,
    pub value_b: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    pub key: String,
    pub differences: Vec<FieldDifference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub missing_in_b: Vec<String>,
    pub missing_in_a: Vec<String>,
    pub mismatches: Vec<FieldMismatch>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub compared: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub missing_in_b: usize,
    pub missing_in_a: usize,
}

impl ComparisonResult {
    pub fn all_match(&self) -> bool {
        self.missing_in_b.is_empty() && self.missing_in_a.is_empty() && self.mismatches.is_empty()
    }

    /// `compared` counts keys present in both datasets.
    pub fn summary(&self, compared: usize) -> ComparisonSummary {
        ComparisonSummary {
            compared,
            matched: compared.saturating_sub(self.mismatches.len()),
            mismatched: self.mismatches.len(),
            missing_in_b: self.missing_in_b.len(),
            missing_in_a: self.missing_in_a.len(),
        }
    }
}
