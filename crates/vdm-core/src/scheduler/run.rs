//! The pipeline run: queue construction, worker pool, per-row containment.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::VdmConfig;
use crate::control::RunControl;
use crate::fetch::{self, FetchError, FetchOptions, FetchOutcome, VideoClient};
use crate::layout;
use crate::manifest::{LoadedManifest, RowStatus, WorkItem};
use crate::resolve::{self, ResolveError};
use crate::retry::{self, RetryPolicy};
use crate::status::{RunSummary, StatusTracker};
use crate::workbook::WorkbookSink;

use super::budget::HostBudget;
use super::pace::HostPacer;
use super::path_lock::PathLocks;
use super::progress::RowEvent;

/// Per-row failure, mapped to a terminal status at the containment boundary.
#[derive(Debug, Error)]
enum RowError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One queued unit of work: a row plus the sheet it came from.
struct RowTask {
    sheet: String,
    item: WorkItem,
}

/// Everything a worker needs; cloned once per worker.
#[derive(Clone)]
struct WorkerCtx {
    root: PathBuf,
    opts: FetchOptions,
    policy: RetryPolicy,
    queue: Arc<Mutex<VecDeque<RowTask>>>,
    tracker: Arc<tokio::sync::Mutex<StatusTracker>>,
    budget: Arc<HostBudget>,
    pacer: Arc<HostPacer>,
    paths: Arc<PathLocks>,
    video: Arc<dyn VideoClient>,
    progress_tx: Option<mpsc::Sender<RowEvent>>,
    control: RunControl,
}

/// Runs the whole pipeline: processes every row of `loaded` through a bounded
/// worker pool, then flushes the status tracker to `sink` exactly once.
///
/// Per-row failures never abort the run; only the final flush can fail here.
/// Progress events are pushed through `progress_tx` when provided.
pub async fn run_pipeline(
    loaded: LoadedManifest,
    root: &Path,
    cfg: &VdmConfig,
    video: Arc<dyn VideoClient>,
    sink: &dyn WorkbookSink,
    progress_tx: Option<mpsc::Sender<RowEvent>>,
    control: RunControl,
) -> anyhow::Result<RunSummary> {
    let LoadedManifest { snapshot, manifest } = loaded;
    let sheet_count = manifest.sheets.len();

    let queue: VecDeque<RowTask> = manifest
        .sheets
        .into_iter()
        .flat_map(|sheet| {
            let name = sheet.name;
            sheet
                .items
                .into_iter()
                .map(move |item| RowTask {
                    sheet: name.clone(),
                    item,
                })
        })
        .collect();
    let total = queue.len();
    tracing::info!(sheets = sheet_count, rows = total, "starting pipeline");

    let tracker = Arc::new(tokio::sync::Mutex::new(StatusTracker::new(snapshot)));
    let ctx = WorkerCtx {
        root: root.to_path_buf(),
        opts: cfg.fetch_options(),
        policy: cfg.retry_policy(),
        queue: Arc::new(Mutex::new(queue)),
        tracker: Arc::clone(&tracker),
        budget: Arc::new(HostBudget::new(cfg.max_per_host)),
        pacer: Arc::new(HostPacer::new(Duration::from_millis(cfg.pacing_ms))),
        paths: Arc::new(PathLocks::new()),
        video,
        progress_tx,
        control,
    };

    let workers = cfg.max_workers.max(1).min(total);
    let mut join_set = JoinSet::new();
    for _ in 0..workers {
        join_set.spawn(worker_loop(ctx.clone()));
    }
    while let Some(res) = join_set.join_next().await {
        res.map_err(|e| anyhow::anyhow!("worker task join: {}", e))?;
    }
    drop(ctx);

    let tracker = Arc::try_unwrap(tracker)
        .map_err(|_| anyhow::anyhow!("status tracker still shared after workers joined"))?
        .into_inner();
    tracker.flush(sink).context("flush output workbook")?;
    let summary = tracker.summary();
    tracing::info!(%summary, "pipeline finished");
    Ok(summary)
}

async fn worker_loop(ctx: WorkerCtx) {
    loop {
        if ctx.control.is_aborted() {
            break;
        }
        let Some(task) = ctx.queue.lock().unwrap().pop_front() else {
            break;
        };
        let event = process_row(&ctx, &task).await;
        ctx.tracker
            .lock()
            .await
            .record(&task.sheet, task.item.row_index, event.status);
        if let Some(tx) = &ctx.progress_tx {
            let _ = tx.try_send(event);
        }
    }
}

/// Containment boundary: every failure becomes a terminal status, logged with
/// the row's identity.
async fn process_row(ctx: &WorkerCtx, task: &RowTask) -> RowEvent {
    let item = &task.item;
    let event = |status: RowStatus, bytes: u64, detail: Option<String>| RowEvent {
        sheet: task.sheet.clone(),
        title: item.title.clone(),
        status,
        bytes,
        detail,
    };

    match try_process(ctx, task).await {
        Ok(FetchOutcome::AlreadyPresent) => {
            tracing::info!(sheet = %task.sheet, title = %item.title, "already present");
            event(RowStatus::AlreadyPresent, 0, None)
        }
        Ok(FetchOutcome::Downloaded(bytes)) => {
            tracing::info!(sheet = %task.sheet, title = %item.title, bytes, "downloaded");
            event(RowStatus::Downloaded, bytes, None)
        }
        Err(RowError::Resolve(e)) => {
            tracing::warn!(sheet = %task.sheet, title = %item.title, error = %e, "row skipped");
            event(RowStatus::Skipped, 0, Some(e.to_string()))
        }
        Err(RowError::Fetch(e)) => {
            tracing::warn!(sheet = %task.sheet, title = %item.title, error = %e, "download failed");
            event(RowStatus::Failed, 0, Some(e.to_string()))
        }
        Err(RowError::Other(e)) => {
            tracing::error!(
                sheet = %task.sheet,
                subject = %item.subject,
                title = %item.title,
                error = %format!("{:#}", e),
                "row processing error"
            );
            event(RowStatus::Error, 0, Some(format!("{:#}", e)))
        }
    }
}

async fn try_process(ctx: &WorkerCtx, task: &RowTask) -> Result<FetchOutcome, RowError> {
    let item = &task.item;
    let source = resolve::resolve(&item.link)?;
    let dest = layout::dest_path(
        &ctx.root,
        &item.subject,
        item.topic.as_deref(),
        item.subtopic.as_deref(),
        &item.title,
    );

    // Completed in an earlier run: answer without pacing or permits.
    if fetch::is_complete(&dest).map_err(anyhow::Error::from)? {
        return Ok(FetchOutcome::AlreadyPresent);
    }

    layout::ensure_parent_dir(&dest).map_err(|e| {
        anyhow::Error::new(e).context(format!("create directories for {}", dest.display()))
    })?;

    let host = source.host();
    let _path_guard = ctx.paths.acquire(dest.clone()).await;
    let _permit = ctx.budget.acquire(host).await;
    ctx.pacer.wait_turn(host).await;
    if ctx.control.is_aborted() {
        return Err(RowError::Fetch(FetchError::Aborted));
    }

    let policy = ctx.policy;
    let opts = ctx.opts;
    let video = Arc::clone(&ctx.video);
    let control = ctx.control.clone();
    let fetch_dest = dest.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        retry::run_with_retry(&policy, || {
            fetch::fetch(&source, &fetch_dest, opts, video.as_ref(), &control)
        })
    })
    .await
    .map_err(|e| anyhow::anyhow!("fetch task join: {}", e))
    .map_err(RowError::Other)??;
    Ok(outcome)
}
