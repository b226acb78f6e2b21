//! `vdm run` – process a manifest and download every row.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vdm_core::config::VdmConfig;
use vdm_core::control::RunControl;
use vdm_core::manifest::load_manifest;
use vdm_core::scheduler::{run_pipeline, RowEvent};
use vdm_core::workbook::{self, JsonWorkbook};

use crate::ytdlp::YtDlpClient;

pub async fn run_download(
    cfg: &VdmConfig,
    manifest_path: &Path,
    root: &Path,
    output: Option<PathBuf>,
) -> Result<()> {
    let source = JsonWorkbook::new(manifest_path);
    let loaded = load_manifest(&source, &cfg.skip_sheets)?;
    let out_path = output.unwrap_or_else(|| workbook::processed_output_path(manifest_path));
    let sink = JsonWorkbook::new(&out_path);

    let control = RunControl::new();
    {
        // First Ctrl-C stops claiming rows; in-flight transfers abort.
        let control = control.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nstopping; waiting for in-flight rows...");
                control.request_abort();
            }
        });
    }

    let total = loaded.manifest.row_count();
    println!(
        "Processing {} row(s) from {} into {}",
        total,
        manifest_path.display(),
        root.display()
    );

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<RowEvent>(64);
    let printer = tokio::spawn(async move {
        let mut done = 0usize;
        while let Some(event) = progress_rx.recv().await {
            done += 1;
            match &event.detail {
                Some(reason) => println!(
                    "[{}/{}] {} / {}: {} ({})",
                    done,
                    total,
                    event.sheet,
                    event.title,
                    event.status.as_str(),
                    reason
                ),
                None => println!(
                    "[{}/{}] {} / {}: {}",
                    done,
                    total,
                    event.sheet,
                    event.title,
                    event.status.as_str()
                ),
            }
        }
    });

    let summary = run_pipeline(
        loaded,
        root,
        cfg,
        Arc::new(YtDlpClient::new()),
        &sink,
        Some(progress_tx),
        control,
    )
    .await?;
    let _ = printer.await;

    println!("Done: {}", summary);
    println!("Status written to {}", out_path.display());
    Ok(())
}
