//! Work manifest: sheets of download rows parsed from a workbook snapshot.
//!
//! The workbook is read once at pipeline start; data sheets become `Sheet`s
//! of `WorkItem`s while the raw snapshot is kept for status write-back.

mod columns;
mod load;
mod model;

pub use columns::ColumnMap;
pub use load::{load_manifest, LoadedManifest, ManifestError};
pub use model::{Manifest, RowStatus, Sheet, WorkItem};
