#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tempfile::{TempDir, tempdir};

/// Cell written into a generated workbook fixture.
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Formula(&'a str),
    Blank,
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file bytes");
        path
    }

    /// Writes a single-sheet workbook whose first row is the header.
    pub fn write_workbook(&self, name: &str, sheet: &str, rows: &[Vec<Cell<'_>>]) -> PathBuf {
        self.write_workbook_sheets(name, &[(sheet, rows)])
    }

    pub fn write_workbook_sheets(
        &self,
        name: &str,
        sheets: &[(&str, &[Vec<Cell<'_>>])],
    ) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut workbook = Workbook::new();
        for (sheet_name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*sheet_name).expect("sheet name");
            for (row_idx, row) in rows.iter().enumerate() {
                for (col_idx, cell) in row.iter().enumerate() {
                    let (r, c) = (row_idx as u32, col_idx as u16);
                    match cell {
                        Cell::Text(value) => {
                            worksheet.write_string(r, c, *value).expect("write string");
                        }
                        Cell::Number(value) => {
                            worksheet.write_number(r, c, *value).expect("write number");
                        }
                        Cell::Bool(value) => {
                            worksheet.write_boolean(r, c, *value).expect("write boolean");
                        }
                        Cell::Formula(value) => {
                            worksheet.write_formula(r, c, *value).expect("write formula");
                        }
                        Cell::Blank => {}
                    }
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }
}

pub fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}
