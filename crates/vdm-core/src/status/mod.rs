//! Per-row outcome accumulation and single-flush merge into the output.
//!
//! The tracker owns the full workbook snapshot. Processed rows overwrite only
//! their own status cell; untouched sheets (including non-data sheets) pass
//! through unchanged; the whole artifact is flushed exactly once via the
//! sink, so an interrupted run never loses sheets that existed before it.

use std::collections::HashMap;
use std::fmt;

use crate::manifest::RowStatus;
use crate::workbook::{SheetData, WorkbookSink};

/// Header of the per-row status column, appended to a data sheet on first use.
pub const STATUS_COLUMN: &str = "Download Status";

/// Aggregate per-status counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.downloaded + self.already_present + self.skipped + self.failed + self.errors
    }

    fn add(&mut self, status: RowStatus) {
        match status {
            RowStatus::Downloaded => self.downloaded += 1,
            RowStatus::AlreadyPresent => self.already_present += 1,
            RowStatus::Skipped => self.skipped += 1,
            RowStatus::Failed => self.failed += 1,
            RowStatus::Error => self.errors += 1,
            RowStatus::Pending => {}
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} already present, {} skipped, {} failed, {} errors",
            self.downloaded, self.already_present, self.skipped, self.failed, self.errors
        )
    }
}

/// Accumulates `(sheet, row) -> status` over the workbook snapshot.
#[derive(Debug)]
pub struct StatusTracker {
    sheets: Vec<SheetData>,
    by_name: HashMap<String, usize>,
    summary: RunSummary,
}

impl StatusTracker {
    /// Takes ownership of the full snapshot, every sheet included.
    pub fn new(snapshot: Vec<SheetData>) -> Self {
        let by_name = snapshot
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        Self {
            sheets: snapshot,
            by_name,
            summary: RunSummary::default(),
        }
    }

    /// Records the terminal status of one row. Exactly one call per processed
    /// row; the status column is created on first use per sheet.
    pub fn record(&mut self, sheet: &str, row_index: usize, status: RowStatus) {
        self.summary.add(status);
        let Some(&index) = self.by_name.get(sheet) else {
            tracing::warn!(sheet, "status recorded for unknown sheet; dropped");
            return;
        };
        let sheet = &mut self.sheets[index];
        let col = match sheet.column_index(STATUS_COLUMN) {
            Some(col) => col,
            None => {
                sheet.header.push(STATUS_COLUMN.to_string());
                sheet.header.len() - 1
            }
        };
        sheet.set_cell(row_index, col, status.as_str().to_string());
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Writes the complete output in one shot.
    pub fn flush(&self, sink: &dyn WorkbookSink) -> anyhow::Result<()> {
        sink.write_sheets(&self.sheets)
    }
}
