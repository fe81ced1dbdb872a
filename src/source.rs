//! Tabular sources feeding the row loader.
//!
//! A source exposes its header row once and then yields data rows as typed
//! [`CellValue`]s. Delimited text goes through the `csv` reader with
//! `encoding_rs` decoding; workbook containers (xlsx, xlsm, xlsb, xls, ods)
//! go through `calamine`. Both are size-checked before anything is parsed.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use encoding_rs::Encoding;
use log::{debug, warn};

use crate::{cell::CellValue, error::LoadError, io_utils};

pub const DEFAULT_MAX_SIZE_MIB: u64 = 10;
pub const DEFAULT_MAX_SOURCE_BYTES: u64 = DEFAULT_MAX_SIZE_MIB * 1024 * 1024;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Where a source lives and how to read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// Worksheet to read from a workbook; the first sheet when unset.
    pub sheet: Option<String>,
    pub delimiter: Option<u8>,
    pub encoding: Option<String>,
}

impl SourceLocation {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_workbook(&self) -> bool {
        is_workbook_path(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based physical row number, header included.
    pub line: usize,
    pub cells: Vec<CellValue>,
}

impl SourceRow {
    pub fn cell(&self, idx: usize) -> &CellValue {
        self.cells.get(idx).unwrap_or(&CellValue::Empty)
    }
}

pub trait TabularSource {
    /// Human-readable name used in diagnostics.
    fn label(&self) -> &str;

    /// Trimmed header text in column order.
    fn headers(&self) -> &[String];

    fn next_row(&mut self) -> Result<Option<SourceRow>, LoadError>;
}

pub fn is_workbook_path(path: &Path) -> bool {
    io_utils::extension(path).is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}

/// Fails when `path` is missing or larger than `max_bytes`; returns the size otherwise.
pub fn check_source_size(path: &Path, max_bytes: u64) -> Result<u64, LoadError> {
    let metadata = fs::metadata(path).map_err(|err| LoadError::unreadable(path, err))?;
    if !metadata.is_file() {
        return Err(LoadError::unreadable(path, "not a regular file"));
    }
    let size = metadata.len();
    if size > max_bytes {
        return Err(LoadError::SourceTooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }
    Ok(size)
}

pub fn open_source(
    location: &SourceLocation,
    max_bytes: u64,
) -> Result<Box<dyn TabularSource>, LoadError> {
    let size = check_source_size(&location.path, max_bytes)?;
    debug!("Opening {:?} ({size} bytes)", location.path);
    if location.is_workbook() {
        let source = WorkbookSource::open(&location.path, location.sheet.as_deref())?;
        Ok(Box::new(source))
    } else {
        if let Some(sheet) = &location.sheet {
            warn!(
                "Ignoring sheet '{sheet}' for delimited file {:?}",
                location.path
            );
        }
        let source = DelimitedSource::open(
            &location.path,
            location.delimiter,
            location.encoding.as_deref(),
        )?;
        Ok(Box::new(source))
    }
}

pub struct DelimitedSource {
    label: String,
    path: PathBuf,
    reader: csv::Reader<BufReader<File>>,
    encoding: &'static Encoding,
    headers: Vec<String>,
    record: csv::ByteRecord,
    rows_read: usize,
}

impl DelimitedSource {
    pub fn open(
        path: &Path,
        delimiter: Option<u8>,
        encoding: Option<&str>,
    ) -> Result<Self, LoadError> {
        let encoding = io_utils::resolve_encoding(encoding)
            .map_err(|err| LoadError::unreadable(path, err))?;
        let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)
            .map_err(|err| LoadError::unreadable(path, format!("{err:#}")))?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .map_err(|err| LoadError::unreadable(path, format!("{err:#}")))?
            .into_iter()
            .map(|header| header.trim().to_string())
            .collect();
        Ok(Self {
            label: path.display().to_string(),
            path: path.to_path_buf(),
            reader,
            encoding,
            headers,
            record: csv::ByteRecord::new(),
            rows_read: 0,
        })
    }
}

impl TabularSource for DelimitedSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn next_row(&mut self) -> Result<Option<SourceRow>, LoadError> {
        let has_row = self
            .reader
            .read_byte_record(&mut self.record)
            .map_err(|err| LoadError::unreadable(&self.path, err))?;
        if !has_row {
            return Ok(None);
        }
        self.rows_read += 1;
        let line = self
            .record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(self.rows_read + 1);
        let cells = io_utils::decode_record(&self.record, self.encoding)
            .map_err(|err| LoadError::unreadable(&self.path, format!("row {line}: {err}")))?
            .iter()
            .map(|value| CellValue::from(value.as_str()))
            .collect();
        Ok(Some(SourceRow { line, cells }))
    }
}

/// One worksheet read fully into memory; the size guard bounds how much that is.
pub struct WorkbookSource {
    label: String,
    headers: Vec<String>,
    rows: std::vec::IntoIter<SourceRow>,
}

impl WorkbookSource {
    pub fn open(path: &Path, sheet: Option<&str>) -> Result<Self, LoadError> {
        let mut workbook: Sheets<_> =
            open_workbook_auto(path).map_err(|err| LoadError::unreadable(path, err))?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let sheet_name = match sheet {
            Some(wanted) => sheet_names
                .iter()
                .find(|name| name.eq_ignore_ascii_case(wanted.trim()))
                .cloned()
                .ok_or_else(|| LoadError::unreadable(path, format!("no sheet named '{wanted}'")))?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| LoadError::unreadable(path, "workbook contains no sheets"))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|err| LoadError::unreadable(path, format!("sheet '{sheet_name}': {err}")))?;
        let formulas = match workbook.worksheet_formula(&sheet_name) {
            Ok(formula_range) => {
                let (start_row, start_col) = formula_range.start().unwrap_or((0, 0));
                let mut formulas = HashMap::new();
                for (row_idx, row) in formula_range.rows().enumerate() {
                    for (col_idx, formula) in row.iter().enumerate() {
                        if !formula.is_empty() {
                            let position = (start_row + row_idx as u32, start_col + col_idx as u32);
                            formulas.insert(position, strip_formula_prefix(formula));
                        }
                    }
                }
                formulas
            }
            Err(err) => {
                debug!("No formulas read from sheet '{sheet_name}' in {path:?}: {err}");
                HashMap::new()
            }
        };

        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for (row_idx, row) in range.rows().enumerate() {
            let absolute_row = start_row + row_idx as u32;
            let cells: Vec<CellValue> = row
                .iter()
                .enumerate()
                .map(|(col_idx, cell)| {
                    let position = (absolute_row, start_col + col_idx as u32);
                    match formulas.get(&position) {
                        Some(formula) => CellValue::Formula(formula.clone()),
                        None => convert_cell(cell),
                    }
                })
                .collect();
            if row_idx == 0 {
                headers = cells
                    .iter()
                    .map(|cell| cell.to_field_string().trim().to_string())
                    .collect();
                continue;
            }
            let line = absolute_row as usize + 1;
            if cells.iter().all(CellValue::is_empty) {
                debug!("Skipping blank row {line} in sheet '{sheet_name}'");
                continue;
            }
            rows.push(SourceRow { line, cells });
        }

        Ok(Self {
            label: format!("{} [{}]", path.display(), sheet_name),
            headers,
            rows: rows.into_iter(),
        })
    }
}

impl TabularSource for WorkbookSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn next_row(&mut self) -> Result<Option<SourceRow>, LoadError> {
        Ok(self.rows.next())
    }
}

/// Rows that were already parsed elsewhere.
pub struct MemorySource {
    label: String,
    headers: Vec<String>,
    rows: std::vec::IntoIter<SourceRow>,
}

impl MemorySource {
    pub fn new<H: Into<String>>(
        label: impl Into<String>,
        headers: impl IntoIterator<Item = H>,
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let rows: Vec<SourceRow> = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| SourceRow {
                line: idx + 2,
                cells,
            })
            .collect();
        Self {
            label: label.into(),
            headers: headers
                .into_iter()
                .map(|header| header.into().trim().to_string())
                .collect(),
            rows: rows.into_iter(),
        }
    }
}

impl TabularSource for MemorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn next_row(&mut self) -> Result<Option<SourceRow>, LoadError> {
        Ok(self.rows.next())
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        // Dates surface as their serial number, like any other numeric cell.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn strip_formula_prefix(formula: &str) -> String {
    formula.strip_prefix('=').unwrap_or(formula).to_string()
}
