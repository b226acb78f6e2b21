//! Tabular workbook abstraction.
//!
//! The pipeline reads and writes workbooks only through the `WorkbookSource`
//! and `WorkbookSink` traits; spreadsheet codecs live outside the core. A
//! JSON-backed adapter is bundled so the CLI and tests have a concrete
//! implementation.

mod json;

pub use json::JsonWorkbook;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Suffix inserted before the extension of the output artifact.
const OUTPUT_SUFFIX: &str = "_processed";

/// One sheet as raw tabular data: a header row plus data rows.
///
/// Rows may be ragged (shorter than the header); missing cells read as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Cell at (row, col), or "" when the row is ragged or out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sets the cell at (row, col), padding the row with empty cells if needed.
    /// Rows outside the sheet are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value;
    }

    /// Index of a header column by name (case-insensitive, trimmed).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }
}

/// Read side of the workbook boundary. Implementations hold whatever handle
/// the underlying codec needs (a file path, an open document, a buffer).
pub trait WorkbookSource {
    /// Reads every sheet, in workbook order.
    fn read_sheets(&self) -> Result<Vec<SheetData>>;
}

/// Write side of the workbook boundary. The pipeline calls this exactly once
/// per run with the complete output, so implementations can (and should)
/// replace the artifact atomically.
pub trait WorkbookSink {
    fn write_sheets(&self, sheets: &[SheetData]) -> Result<()>;
}

/// Output artifact path for a given input: base name plus `_processed`,
/// keeping the extension (`videos.xlsx` → `videos_processed.xlsx`).
pub fn processed_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(name)
}
