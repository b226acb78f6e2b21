//! yt-dlp subprocess client for hosted-video downloads.
//!
//! Asks the platform for the best single-file mp4 and writes it directly to
//! the destination path; the core's fetcher verifies the result afterwards.

use anyhow::Context;
use std::path::Path;
use std::process::Command;

use vdm_core::fetch::VideoClient;

/// Runs the `yt-dlp` binary found on PATH.
#[derive(Debug, Clone)]
pub struct YtDlpClient {
    binary: String,
}

impl YtDlpClient {
    pub fn new() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
        }
    }
}

impl Default for YtDlpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoClient for YtDlpClient {
    fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        let output = Command::new(&self.binary)
            .arg("-f")
            .arg("best[ext=mp4]")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("-o")
            .arg(dest)
            .arg(url)
            .output()
            .with_context(|| format!("spawn {}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp exited with {}: {}", output.status, stderr.trim());
        }
        Ok(())
    }
}
