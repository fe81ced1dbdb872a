use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::PreviewArgs,
    source::{self, SourceLocation},
    table,
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let location = SourceLocation {
        path: args.input.clone(),
        sheet: args.sheet.clone(),
        delimiter: args.delimiter,
        encoding: args.input_encoding.clone(),
    };
    let mut source = source::open_source(&location, args.max_size_mib.saturating_mul(1024 * 1024))
        .with_context(|| format!("Opening {:?}", args.input))?;
    let headers = source.headers().to_vec();
    let mut rows = Vec::new();

    while rows.len() < args.rows {
        let Some(row) = source.next_row()? else {
            break;
        };
        rows.push(
            row.cells
                .iter()
                .map(|cell| cell.to_field_string())
                .collect::<Vec<_>>(),
        );
    }

    table::print_table(&headers, &rows);
    info!("Displayed {} row(s) from {}", rows.len(), source.label());
    Ok(())
}
