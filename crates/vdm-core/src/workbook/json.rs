//! JSON-backed workbook adapter.
//!
//! Minimal on-disk form: `{"sheets": [{"name", "header", "rows"}]}`. The
//! sink writes to a temp file and renames so an interrupted flush never
//! leaves a half-written artifact.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{SheetData, WorkbookSink, WorkbookSource};

#[derive(Debug, Serialize, Deserialize)]
struct JsonDoc {
    sheets: Vec<JsonSheet>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonSheet {
    name: String,
    #[serde(default)]
    header: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

/// Workbook stored as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonWorkbook {
    path: PathBuf,
}

impl JsonWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for JsonWorkbook {
    fn read_sheets(&self) -> Result<Vec<SheetData>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read workbook: {}", self.path.display()))?;
        let doc: JsonDoc = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse workbook JSON: {}", self.path.display()))?;
        Ok(doc
            .sheets
            .into_iter()
            .map(|s| SheetData {
                name: s.name,
                header: s.header,
                rows: s.rows,
            })
            .collect())
    }
}

impl WorkbookSink for JsonWorkbook {
    fn write_sheets(&self, sheets: &[SheetData]) -> Result<()> {
        let doc = JsonDoc {
            sheets: sheets
                .iter()
                .map(|s| JsonSheet {
                    name: s.name.clone(),
                    header: s.header.clone(),
                    rows: s.rows.clone(),
                })
                .collect(),
        };
        let body = serde_json::to_vec_pretty(&doc).context("serialize workbook JSON")?;

        // Write-then-rename keeps the previous artifact intact on failure.
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, &body)
            .with_context(|| format!("write workbook temp file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!("rename {} to {}", tmp.display(), self.path.display())
        })?;
        Ok(())
    }
}
