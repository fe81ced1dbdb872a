//! Reconciliation of two keyed datasets.
//!
//! [`reconcile`] walks the first dataset in order, reporting keys the second
//! dataset lacks and every differing column pair for keys both share, then
//! walks the second dataset for keys the first lacks. Values compare as exact,
//! case-sensitive strings.

use log::debug;

use crate::{
    correspondence::Correspondence,
    model::{ComparisonResult, Dataset, FieldDifference, FieldMismatch, Record},
};

pub fn reconcile(
    dataset_a: &Dataset,
    dataset_b: &Dataset,
    correspondence: &Correspondence,
) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    for (key, record_a) in dataset_a.iter() {
        let Some(record_b) = dataset_b.get(key) else {
            result.missing_in_b.push(key.to_string());
            continue;
        };
        let differences = compare_records(key, record_a, record_b, correspondence);
        if !differences.is_empty() {
            debug!("Key '{key}' differs in {} column pair(s)", differences.len());
            result.mismatches.push(FieldMismatch {
                key: key.to_string(),
                differences,
            });
        }
    }

    result.missing_in_a = dataset_b
        .keys()
        .filter(|key| !dataset_a.contains_key(key))
        .map(str::to_string)
        .collect();

    result
}

/// Number of keys present in both datasets.
pub fn shared_key_count(dataset_a: &Dataset, dataset_b: &Dataset) -> usize {
    dataset_a
        .keys()
        .filter(|key| dataset_b.contains_key(key))
        .count()
}

fn compare_records(
    key: &str,
    record_a: &Record,
    record_b: &Record,
    correspondence: &Correspondence,
) -> Vec<FieldDifference> {
    correspondence
        .pairs()
        .iter()
        .filter_map(|pair| {
            let value_a = field(record_a, key, &pair.column_a).trim();
            let value_b = field(record_b, key, &pair.column_b).trim();
            if value_a == value_b {
                return None;
            }
            debug!("Key '{key}': {pair} differ ({value_a:?} vs {value_b:?})");
            Some(FieldDifference {
                column_a: pair.column_a.clone(),
                column_b: pair.column_b.clone(),
                value_a: value_a.to_string(),
                value_b: value_b.to_string(),
            })
        })
        .collect()
}

// The loader guarantees every declared column is present in every record.
fn field<'a>(record: &'a Record, key: &str, column: &str) -> &'a str {
    record.get(column).unwrap_or_else(|| {
        panic!("record for key '{key}' has no value for column '{column}'; loader contract violated")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correspondence::ColumnPair;

    fn rec(values: &[(&str, &str)]) -> Record {
        values.iter().copied().collect()
    }

    fn dataset<const N: usize>(rows: [(&str, Record); N]) -> Dataset {
        rows.into_iter().collect()
    }

    fn names() -> Correspondence {
        Correspondence::resolve(true, &["Name"], &[]).unwrap()
    }

    #[test]
    fn reports_single_field_mismatch() {
        let a = dataset([("1", rec(&[("Name", "Alice")])), ("2", rec(&[("Name", "Bob")]))]);
        let b = dataset([("1", rec(&[("Name", "Alice")])), ("2", rec(&[("Name", "Robert")]))]);
        let result = reconcile(&a, &b, &names());
        assert_eq!(
            result.mismatches,
            vec![FieldMismatch {
                key: "2".to_string(),
                differences: vec![FieldDifference {
                    column_a: "Name".to_string(),
                    column_b: "Name".to_string(),
                    value_a: "Bob".to_string(),
                    value_b: "Robert".to_string(),
                }],
            }]
        );
        assert!(result.missing_in_a.is_empty());
        assert!(result.missing_in_b.is_empty());
    }

    #[test]
    fn key_missing_from_second_dataset() {
        let a = dataset([("1", rec(&[("Name", "Alice")]))]);
        let b = Dataset::new();
        let result = reconcile(&a, &b, &names());
        assert_eq!(result.missing_in_b, vec!["1"]);
        assert!(result.mismatches.is_empty());
        assert!(result.missing_in_a.is_empty());
        assert!(!result.all_match());
    }

    #[test]
    fn identical_datasets_match() {
        let a = dataset([("1", rec(&[("Name", "Alice")])), ("2", rec(&[("Name", "Bob")]))]);
        let result = reconcile(&a, &a.clone(), &names());
        assert!(result.all_match());
    }

    #[test]
    fn collects_every_differing_pair_in_order() {
        let correspondence = Correspondence::new(vec![
            ColumnPair::new("Name", "Full Name"),
            ColumnPair::new("Dept", "Department"),
            ColumnPair::new("Salary", "Pay"),
        ])
        .unwrap();
        let a = dataset([("7", rec(&[("Name", "Ann"), ("Dept", "Ops"), ("Salary", "10")]))]);
        let b = dataset([(
            "7",
            rec(&[("Full Name", "Anne"), ("Department", "Ops"), ("Pay", "10.0")]),
        )]);
        let result = reconcile(&a, &b, &correspondence);
        assert_eq!(result.mismatches.len(), 1);
        let columns: Vec<_> = result.mismatches[0]
            .differences
            .iter()
            .map(|d| (d.column_a.as_str(), d.column_b.as_str()))
            .collect();
        assert_eq!(columns, vec![("Name", "Full Name"), ("Salary", "Pay")]);
    }

    #[test]
    fn comparison_is_case_sensitive_and_trims() {
        let a = dataset([("1", rec(&[("Name", "alice ")])), ("2", rec(&[("Name", " Bob")]))]);
        let b = dataset([("1", rec(&[("Name", "Alice")])), ("2", rec(&[("Name", "Bob")]))]);
        let result = reconcile(&a, &b, &names());
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].key, "1");
        assert_eq!(result.mismatches[0].differences[0].value_a, "alice");
    }

    #[test]
    fn missing_keys_follow_insertion_order() {
        let a = dataset([("3", rec(&[("Name", "x")])), ("1", rec(&[("Name", "x")]))]);
        let b = dataset([("9", rec(&[("Name", "x")])), ("1", rec(&[("Name", "x")])), ("4", rec(&[("Name", "x")]))]);
        let result = reconcile(&a, &b, &names());
        assert_eq!(result.missing_in_b, vec!["3"]);
        assert_eq!(result.missing_in_a, vec!["9", "4"]);
        assert_eq!(shared_key_count(&a, &b), 1);
    }

    #[test]
    #[should_panic(expected = "loader contract violated")]
    fn absent_column_is_a_contract_violation() {
        let a = dataset([("1", rec(&[("Other", "x")]))]);
        let b = dataset([("1", rec(&[("Name", "x")]))]);
        reconcile(&a, &b, &names());
    }
}
