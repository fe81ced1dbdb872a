//! Column correspondence between the two sources.
//!
//! Positions are preserved: the n-th name declared for the first source is
//! compared against the n-th name declared for the second. No fuzzy matching
//! or reordering happens here; header lookup is the loader's job.

use std::fmt;

use crate::error::CorrespondenceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPair {
    pub column_a: String,
    pub column_b: String,
}

impl ColumnPair {
    pub fn new(column_a: impl Into<String>, column_b: impl Into<String>) -> Self {
        Self {
            column_a: column_a.into(),
            column_b: column_b.into(),
        }
    }

    /// Parses `first=second`, or a single name shared by both sources.
    pub fn parse(value: &str) -> Result<Self, String> {
        let (first, second) = match value.split_once('=') {
            Some((first, second)) => (first.trim(), second.trim()),
            None => (value.trim(), value.trim()),
        };
        if first.is_empty() || second.is_empty() {
            return Err(format!("Column pair '{value}' must name a column on both sides"));
        }
        Ok(Self::new(first, second))
    }
}

impl fmt::Display for ColumnPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.column_a, self.column_b)
    }
}

/// Non-empty ordered list of column pairs applied to every key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correspondence {
    pairs: Vec<ColumnPair>,
}

impl Correspondence {
    pub fn new(pairs: Vec<ColumnPair>) -> Result<Self, CorrespondenceError> {
        if pairs.is_empty() {
            return Err(CorrespondenceError::Empty);
        }
        for (idx, pair) in pairs.iter().enumerate() {
            if pair.column_a.trim().is_empty() || pair.column_b.trim().is_empty() {
                return Err(CorrespondenceError::BlankColumn { position: idx + 1 });
            }
        }
        Ok(Self { pairs })
    }

    /// Builds the correspondence from the names a user declared.
    ///
    /// With `same_names` set, `names_a` supplies both sides and `names_b` is
    /// ignored. Names are trimmed.
    pub fn resolve<S: AsRef<str>>(
        same_names: bool,
        names_a: &[S],
        names_b: &[S],
    ) -> Result<Self, CorrespondenceError> {
        let first: Vec<&str> = names_a.iter().map(|name| name.as_ref().trim()).collect();
        let second: Vec<&str> = if same_names {
            first.clone()
        } else {
            names_b.iter().map(|name| name.as_ref().trim()).collect()
        };
        if first.len() != second.len() {
            return Err(CorrespondenceError::LengthMismatch {
                first: first.len(),
                second: second.len(),
            });
        }
        let pairs = first
            .into_iter()
            .zip(second)
            .map(|(a, b)| ColumnPair::new(a, b))
            .collect();
        Self::new(pairs)
    }

    pub fn pairs(&self) -> &[ColumnPair] {
        &self.pairs
    }

    pub fn columns_a(&self) -> Vec<String> {
        self.pairs.iter().map(|pair| pair.column_a.clone()).collect()
    }

    pub fn columns_b(&self) -> Vec<String> {
        self.pairs.iter().map(|pair| pair.column_b.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
