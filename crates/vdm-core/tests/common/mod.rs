//! Shared helpers for integration tests.

pub mod file_server;

use std::sync::Mutex;

use vdm_core::workbook::{SheetData, WorkbookSink, WorkbookSource};

/// Workbook held in memory: the source side serves a fixed snapshot, the sink
/// side captures whatever the pipeline flushes.
pub struct MemoryWorkbook {
    input: Vec<SheetData>,
    output: Mutex<Option<Vec<SheetData>>>,
}

impl MemoryWorkbook {
    pub fn new(input: Vec<SheetData>) -> Self {
        Self {
            input,
            output: Mutex::new(None),
        }
    }

    /// The flushed output; panics if the pipeline never flushed.
    pub fn output(&self) -> Vec<SheetData> {
        self.output
            .lock()
            .unwrap()
            .clone()
            .expect("pipeline flushed no output")
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn read_sheets(&self) -> anyhow::Result<Vec<SheetData>> {
        Ok(self.input.clone())
    }
}

impl WorkbookSink for MemoryWorkbook {
    fn write_sheets(&self, sheets: &[SheetData]) -> anyhow::Result<()> {
        *self.output.lock().unwrap() = Some(sheets.to_vec());
        Ok(())
    }
}

/// Builds a data sheet with the standard manifest columns.
/// Each row: [title, link, subject, topic, subtopic].
pub fn data_sheet(name: &str, rows: &[[&str; 5]]) -> SheetData {
    SheetData {
        name: name.to_string(),
        header: vec![
            "Video Title".to_string(),
            "Google Drive URL".to_string(),
            "Subject".to_string(),
            "Topic".to_string(),
            "Sub Topic".to_string(),
        ],
        rows: rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    }
}
