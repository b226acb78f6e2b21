//! Manifest data model and per-row terminal status.

/// Immutable snapshot of all data sheets, in workbook order.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub sheets: Vec<Sheet>,
}

impl Manifest {
    /// Total number of processable rows across all sheets.
    pub fn row_count(&self) -> usize {
        self.sheets.iter().map(|s| s.items.len()).sum()
    }
}

/// One data sheet: name plus its work rows in original order.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub items: Vec<WorkItem>,
}

/// One row of the manifest: an asset to acquire plus its taxonomy and link.
///
/// `row_index` addresses the row inside the workbook snapshot so status
/// write-back never depends on re-matching by content.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub row_index: usize,
    pub title: String,
    pub link: String,
    pub subject: String,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
}

/// Terminal outcome of one row, written exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowStatus {
    Pending,
    Downloaded,
    AlreadyPresent,
    Failed,
    Error,
    Skipped,
}

impl RowStatus {
    /// Human-readable form written to the status column.
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Pending => "Pending",
            RowStatus::Downloaded => "Downloaded",
            RowStatus::AlreadyPresent => "Already Present",
            RowStatus::Failed => "Failed",
            RowStatus::Error => "Error",
            RowStatus::Skipped => "Skipped",
        }
    }

    /// Tolerant inverse of `as_str` (accepts spaced and compact forms).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(RowStatus::Pending),
            "downloaded" => Some(RowStatus::Downloaded),
            "already present" | "alreadypresent" => Some(RowStatus::AlreadyPresent),
            "failed" => Some(RowStatus::Failed),
            "error" => Some(RowStatus::Error),
            "skipped" => Some(RowStatus::Skipped),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_roundtrip() {
        for status in [
            RowStatus::Pending,
            RowStatus::Downloaded,
            RowStatus::AlreadyPresent,
            RowStatus::Failed,
            RowStatus::Error,
            RowStatus::Skipped,
        ] {
            assert_eq!(RowStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RowStatus::parse("AlreadyPresent"), Some(RowStatus::AlreadyPresent));
        assert_eq!(RowStatus::parse("nope"), None);
    }
}
