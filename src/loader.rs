//! Row loader: turns a [`TabularSource`] into a keyed [`Dataset`].
//!
//! Requested columns are located in the header row by case-insensitive match,
//! and the resulting records are keyed by the names as they were declared.
//! Every declared column is present in every record the loader produces,
//! which is what lets the engine look values up without a fallback.

use log::{debug, info, warn};

use crate::{
    error::LoadError,
    model::{Dataset, Record},
    source::TabularSource,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    /// Row numbers dropped because their key cell was blank.
    pub skipped_rows: Vec<usize>,
    /// Keys seen more than once; the last row for each key was kept.
    pub duplicate_keys: Vec<String>,
}

pub fn load_dataset<S: AsRef<str>>(
    source: &mut dyn TabularSource,
    key_column: &str,
    value_columns: &[S],
) -> Result<LoadedDataset, LoadError> {
    let key_index = resolve_column(source, key_column)?;
    let value_indices = value_columns
        .iter()
        .map(|name| {
            let name = name.as_ref();
            resolve_column(source, name).map(|idx| (name.to_string(), idx))
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "{}: key column '{}' at position {}, value columns {:?}",
        source.label(),
        key_column,
        key_index,
        value_indices
    );

    let mut loaded = LoadedDataset::default();
    while let Some(row) = source.next_row()? {
        let key = row.cell(key_index).to_field_string().trim().to_string();
        if key.is_empty() {
            warn!(
                "Empty key in {} at row {}, skipping row",
                source.label(),
                row.line
            );
            loaded.skipped_rows.push(row.line);
            continue;
        }

        let record: Record = value_indices
            .iter()
            .map(|(name, idx)| {
                (
                    name.as_str(),
                    row.cell(*idx).to_field_string().trim().to_string(),
                )
            })
            .collect();

        if loaded.dataset.insert(key.as_str(), record).is_some() {
            debug!(
                "Duplicate key '{key}' in {} at row {}; keeping the later row",
                source.label(),
                row.line
            );
            loaded.duplicate_keys.push(key);
        }
    }

    info!(
        "Loaded {} key(s) from {} ({} row(s) skipped)",
        loaded.dataset.len(),
        source.label(),
        loaded.skipped_rows.len()
    );
    Ok(loaded)
}

/// Position of `column` in the header; the last matching header wins.
fn resolve_column(source: &dyn TabularSource, column: &str) -> Result<usize, LoadError> {
    let wanted = column.trim();
    if wanted.is_empty() {
        return Err(LoadError::ColumnNotFound {
            source_label: source.label().to_string(),
            column: wanted.to_string(),
        });
    }
    let folded = wanted.to_lowercase();
    source
        .headers()
        .iter()
        .rposition(|header| header.to_lowercase() == folded)
        .ok_or_else(|| LoadError::ColumnNotFound {
            source_label: source.label().to_string(),
            column: wanted.to_string(),
        })
}
