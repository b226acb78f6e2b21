//! Load the workbook snapshot and parse data sheets into work items.

use thiserror::Error;

use crate::workbook::{SheetData, WorkbookSource};

use super::columns::ColumnMap;
use super::model::{Manifest, Sheet, WorkItem};

/// Fatal manifest problems; nothing is downloaded when any of these occur.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read workbook: {0:#}")]
    Source(anyhow::Error),
    #[error("sheet {sheet:?} is missing required column {column:?}")]
    MissingColumn { sheet: String, column: &'static str },
    #[error("workbook has no data sheets")]
    NoDataSheets,
}

/// The parsed manifest plus the raw snapshot it came from. The snapshot
/// keeps every sheet (including non-data sheets) for status write-back.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub snapshot: Vec<SheetData>,
    pub manifest: Manifest,
}

/// Reads the workbook once and parses every sheet not named in `skip_sheets`
/// (exact match). Rows with an empty title are excluded from processing
/// entirely; they still exist in the snapshot and pass through to the output.
pub fn load_manifest(
    source: &dyn WorkbookSource,
    skip_sheets: &[String],
) -> Result<LoadedManifest, ManifestError> {
    let snapshot = source.read_sheets().map_err(ManifestError::Source)?;

    let mut sheets = Vec::new();
    for sheet in &snapshot {
        if skip_sheets.iter().any(|s| s == &sheet.name) {
            tracing::debug!(sheet = %sheet.name, "skipping non-data sheet");
            continue;
        }
        sheets.push(parse_sheet(sheet)?);
    }

    if sheets.is_empty() {
        return Err(ManifestError::NoDataSheets);
    }

    Ok(LoadedManifest {
        snapshot,
        manifest: Manifest { sheets },
    })
}

fn parse_sheet(sheet: &SheetData) -> Result<Sheet, ManifestError> {
    let map = ColumnMap::discover(&sheet.header).map_err(|column| {
        ManifestError::MissingColumn {
            sheet: sheet.name.clone(),
            column,
        }
    })?;

    let mut items = Vec::new();
    for row_index in 0..sheet.rows.len() {
        let title = sheet.cell(row_index, map.title).trim();
        if title.is_empty() {
            continue;
        }
        let subject = match sheet.cell(row_index, map.subject).trim() {
            // Per-row subject may be blank; the sheet name stands in for it.
            "" => sheet.name.clone(),
            s => s.to_string(),
        };
        items.push(WorkItem {
            row_index,
            title: title.to_string(),
            link: sheet.cell(row_index, map.link).trim().to_string(),
            subject,
            topic: optional_cell(sheet, row_index, map.topic),
            subtopic: optional_cell(sheet, row_index, map.subtopic),
        });
    }

    Ok(Sheet {
        name: sheet.name.clone(),
        items,
    })
}

fn optional_cell(sheet: &SheetData, row: usize, col: Option<usize>) -> Option<String> {
    let value = sheet.cell(row, col?).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
