//! Seam for the hosted-video platform client.
//!
//! The core never talks to the video platform directly. Front-ends inject a
//! client that downloads one link to one destination file, selecting the best
//! available single-file format. Called from blocking context.

use std::path::Path;

pub trait VideoClient: Send + Sync {
    /// Downloads `url` to exactly `dest`. Implementations should not leave a
    /// file behind on failure; the fetcher removes leftovers regardless.
    fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<()>;
}

/// Client for runs that must never reach the video platform (e.g. tests or
/// drive-only deployments); every fetch fails cleanly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVideoClient;

impl VideoClient for NoVideoClient {
    fn fetch(&self, url: &str, _dest: &Path) -> anyhow::Result<()> {
        anyhow::bail!("no video client configured (cannot fetch {url})")
    }
}
