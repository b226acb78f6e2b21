//! `vdm check` – validate a manifest without downloading anything.

use anyhow::Result;
use std::path::Path;

use vdm_core::config::VdmConfig;
use vdm_core::manifest::load_manifest;
use vdm_core::workbook::JsonWorkbook;

pub fn run_check(cfg: &VdmConfig, manifest_path: &Path) -> Result<()> {
    let source = JsonWorkbook::new(manifest_path);
    let loaded = load_manifest(&source, &cfg.skip_sheets)?;

    println!(
        "{}: {} data sheet(s), {} row(s)",
        manifest_path.display(),
        loaded.manifest.sheets.len(),
        loaded.manifest.row_count()
    );
    for sheet in &loaded.manifest.sheets {
        println!("  {}: {} row(s)", sheet.name, sheet.items.len());
    }
    Ok(())
}
