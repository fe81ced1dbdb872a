//! Plain-text table layout for the preview command.

use std::borrow::Cow;
use std::fmt::Write as _;

/// Cells wider than this are cut and end with `…`.
pub const MAX_CELL_WIDTH: usize = 40;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers
        .iter()
        .map(|h| display_width(&fit_cell(h)))
        .collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(&fit_cell(cell)));
        }
    }
    for width in &mut widths {
        *width = (*width).max(3);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let cells = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let value = values.get(idx).map(String::as_str).unwrap_or("");
            let fitted = fit_cell(value);
            let padding = width.saturating_sub(display_width(&fitted));
            format!("{fitted}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn fit_cell(value: &str) -> Cow<'_, str> {
    let needs_sanitizing = value.contains(['\n', '\r', '\t']);
    let too_wide = display_width(value) > MAX_CELL_WIDTH;
    if !needs_sanitizing && !too_wide {
        return Cow::Borrowed(value);
    }
    let mut fitted: String = value
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect();
    if too_wide {
        fitted = fitted.chars().take(MAX_CELL_WIDTH - 1).collect();
        fitted.push('…');
    }
    Cow::Owned(fitted)
}
