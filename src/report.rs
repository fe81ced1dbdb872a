//! Rendering of a [`ComparisonResult`].
//!
//! The text report lists keys missing from the second source, then field
//! mismatches, then keys missing from the first source, matching the order in
//! which the engine discovers them.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{ComparisonResult, ComparisonSummary, FieldMismatch};

pub const ALL_MATCH_MESSAGE: &str = "All information matches.";

pub fn render_text<W: Write>(result: &ComparisonResult, out: &mut W) -> Result<()> {
    for key in &result.missing_in_b {
        writeln!(out, "ID {key} is missing in the second spreadsheet.")?;
    }
    for mismatch in &result.mismatches {
        write_mismatch(mismatch, out)?;
    }
    for key in &result.missing_in_a {
        writeln!(out, "ID {key} is missing in the first spreadsheet.")?;
    }
    if result.all_match() {
        writeln!(out, "{ALL_MATCH_MESSAGE}")?;
    }
    out.flush().context("Flushing report output")
}

fn write_mismatch<W: Write>(mismatch: &FieldMismatch, out: &mut W) -> Result<()> {
    writeln!(out, "Mismatch found for ID {}:", mismatch.key)?;
    for difference in &mismatch.differences {
        writeln!(
            out,
            "  {} vs {}: {} vs {}",
            difference.column_a, difference.column_b, difference.value_a, difference.value_b
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    all_match: bool,
    summary: ComparisonSummary,
    #[serde(flatten)]
    result: &'a ComparisonResult,
}

pub fn render_json<W: Write>(
    result: &ComparisonResult,
    summary: ComparisonSummary,
    out: &mut W,
) -> Result<()> {
    let report = JsonReport {
        all_match: result.all_match(),
        summary,
        result,
    };
    serde_json::to_writer_pretty(&mut *out, &report).context("Serializing JSON report")?;
    writeln!(out)?;
    out.flush().context("Flushing report output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDifference;

    fn sample() -> ComparisonResult {
        ComparisonResult {
            missing_in_b: vec!["4".to_string()],
            missing_in_a: vec!["9".to_string()],
            mismatches: vec![FieldMismatch {
                key: "2".to_string(),
                differences: vec![
                    FieldDifference {
                        column_a: "Name".to_string(),
                        column_b: "Full Name".to_string(),
                        value_a: "Bob".to_string(),
                        value_b: "Robert".to_string(),
                    },
                    FieldDifference {
                        column_a: "Dept".to_string(),
                        column_b: "Department".to_string(),
                        value_a: "".to_string(),
                        value_b: "Ops".to_string(),
                    },
                ],
            }],
        }
    }

    #[test]
    fn text_report_orders_sections() {
        let mut out = Vec::new();
        render_text(&sample(), &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "ID 4 is missing in the second spreadsheet.\n\
             Mismatch found for ID 2:\n\
             \x20 Name vs Full Name: Bob vs Robert\n\
             \x20 Dept vs Department:  vs Ops\n\
             ID 9 is missing in the first spreadsheet.\n"
        );
    }

    #[test]
    fn empty_result_reports_full_match() {
        let mut out = Vec::new();
        render_text(&ComparisonResult::default(), &mut out).expect("render");
        assert_eq!(String::from_utf8(out).unwrap(), "All information matches.\n");
    }

    #[test]
    fn json_report_flattens_findings() {
        let result = sample();
        let mut out = Vec::new();
        render_json(&result, result.summary(3), &mut out).expect("render");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["all_match"], false);
        assert_eq!(value["missing_in_b"][0], "4");
        assert_eq!(value["mismatches"][0]["differences"][1]["value_b"], "Ops");
        assert_eq!(value["summary"]["matched"], 2);
    }
}
