//! End-to-end reconciliation runs: size checks, loading, comparison, report.

use std::io::{self, Write};

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::{CompareArgs, InteractiveArgs, ReportFormat, ReportOptions},
    correspondence::Correspondence,
    engine,
    loader::{self, LoadedDataset},
    model::{ComparisonResult, ComparisonSummary},
    prompt::Prompter,
    report,
    source::{self, SourceLocation},
};

/// Everything needed to reconcile two sources.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub first: SourceLocation,
    pub second: SourceLocation,
    pub first_key: String,
    pub second_key: String,
    pub correspondence: Correspondence,
    pub max_source_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub first: LoadedDataset,
    pub second: LoadedDataset,
    pub result: ComparisonResult,
    pub summary: ComparisonSummary,
}

pub fn execute(args: &CompareArgs) -> Result<()> {
    let correspondence = Correspondence::new(args.columns.clone())
        .context("Building the column correspondence")?;
    let request = ReconcileRequest {
        first: SourceLocation {
            path: args.first.clone(),
            sheet: args.first_sheet.clone(),
            delimiter: args.delimiter,
            encoding: args.first_encoding.clone(),
        },
        second: SourceLocation {
            path: args.second.clone(),
            sheet: args.second_sheet.clone(),
            delimiter: args.delimiter,
            encoding: args.second_encoding.clone(),
        },
        first_key: args.first_key.trim().to_string(),
        second_key: args
            .second_key
            .as_deref()
            .unwrap_or(&args.first_key)
            .trim()
            .to_string(),
        correspondence,
        max_source_bytes: args.report.max_source_bytes(),
    };
    let outcome = run_request(&request)?;
    write_report(&outcome, &args.report, &mut io::stdout().lock())
}

pub fn execute_interactive(args: &InteractiveArgs) -> Result<()> {
    let answers = Prompter::new(io::stdin().lock(), io::stdout().lock()).collect()?;
    let request = ReconcileRequest {
        first: SourceLocation::new(answers.first_path),
        second: SourceLocation::new(answers.second_path),
        first_key: answers.first_key,
        second_key: answers.second_key,
        correspondence: answers.correspondence,
        max_source_bytes: args.report.max_source_bytes(),
    };
    let outcome = run_request(&request)?;
    write_report(&outcome, &args.report, &mut io::stdout().lock())
}

/// Loads both sources and reconciles them.
///
/// Both files are size-checked before either is parsed, and both must load
/// before any comparison happens.
pub fn run_request(request: &ReconcileRequest) -> Result<ReconcileOutcome> {
    for location in [&request.first, &request.second] {
        source::check_source_size(&location.path, request.max_source_bytes)
            .with_context(|| format!("Checking size of {:?}", location.path))?;
    }

    let first = load(
        &request.first,
        &request.first_key,
        &request.correspondence.columns_a(),
        request.max_source_bytes,
    )
    .with_context(|| format!("Loading first spreadsheet {:?}", request.first.path))?;
    let second = load(
        &request.second,
        &request.second_key,
        &request.correspondence.columns_b(),
        request.max_source_bytes,
    )
    .with_context(|| format!("Loading second spreadsheet {:?}", request.second.path))?;

    let result = engine::reconcile(&first.dataset, &second.dataset, &request.correspondence);
    let summary = result.summary(engine::shared_key_count(&first.dataset, &second.dataset));
    info!(
        "Compared {} shared key(s): {} matched, {} mismatched, {} missing in second, {} missing in first",
        summary.compared,
        summary.matched,
        summary.mismatched,
        summary.missing_in_b,
        summary.missing_in_a
    );
    Ok(ReconcileOutcome {
        first,
        second,
        result,
        summary,
    })
}

fn load(
    location: &SourceLocation,
    key_column: &str,
    value_columns: &[String],
    max_source_bytes: u64,
) -> Result<LoadedDataset> {
    let mut source = source::open_source(location, max_source_bytes)?;
    let loaded = loader::load_dataset(source.as_mut(), key_column, value_columns)?;
    Ok(loaded)
}

pub fn write_report<W: Write>(
    outcome: &ReconcileOutcome,
    options: &ReportOptions,
    out: &mut W,
) -> Result<()> {
    match options.format {
        ReportFormat::Text => report::render_text(&outcome.result, out),
        ReportFormat::Json => report::render_json(&outcome.result, outcome.summary, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::fs;
    use tempfile::tempdir;

    fn request(first: &std::path::Path, second: &std::path::Path) -> ReconcileRequest {
        ReconcileRequest {
            first: SourceLocation::new(first),
            second: SourceLocation::new(second),
            first_key: "ID".to_string(),
            second_key: "id".to_string(),
            correspondence: Correspondence::resolve(false, &["Name"], &["Full Name"]).unwrap(),
            max_source_bytes: 1024,
        }
    }

    #[test]
    fn reconciles_two_delimited_files() {
        let dir = tempdir().expect("temp dir");
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.tsv");
        fs::write(&first, "ID,Name\n1,Alice\n2,Bob\n3,Cara\n").expect("write first");
        fs::write(&second, "id\tfull name\n1\tAlice\n2\tRobert\n4\tDan\n").expect("write second");

        let outcome = run_request(&request(&first, &second)).expect("run");
        assert_eq!(outcome.result.missing_in_b, vec!["3"]);
        assert_eq!(outcome.result.missing_in_a, vec!["4"]);
        assert_eq!(outcome.result.mismatches.len(), 1);
        assert_eq!(outcome.summary.matched, 1);
        assert_eq!(outcome.first.dataset.len(), 3);
    }

    #[test]
    fn oversized_second_file_aborts_before_loading() {
        let dir = tempdir().expect("temp dir");
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "ID,Name\n1,Alice\n").expect("write first");
        fs::write(&second, "id,Full Name\n".repeat(200)).expect("write second");

        let err = run_request(&request(&first, &second)).expect_err("too large");
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::SourceTooLarge { .. })
        ));
    }

    #[test]
    fn missing_column_aborts_the_run() {
        let dir = tempdir().expect("temp dir");
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "ID,Name\n1,Alice\n").expect("write first");
        fs::write(&second, "id,Name\n1,Alice\n").expect("write second");

        let err = run_request(&request(&first, &second)).expect_err("missing column");
        let message = format!("{err:#}");
        assert!(message.contains("Loading second spreadsheet"));
        assert!(message.contains("column 'Full Name' not found"));
    }

    #[test]
    fn json_report_uses_selected_format() {
        let dir = tempdir().expect("temp dir");
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        fs::write(&first, "ID,Name\n1,Alice\n").expect("write first");
        fs::write(&second, "id,Full Name\n1,Alice\n").expect("write second");

        let outcome = run_request(&request(&first, &second)).expect("run");
        let options = ReportOptions {
            max_size_mib: 10,
            format: ReportFormat::Json,
        };
        let mut out = Vec::new();
        write_report(&outcome, &options, &mut out).expect("report");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["all_match"], true);
        assert_eq!(value["summary"]["compared"], 1);
    }
}
