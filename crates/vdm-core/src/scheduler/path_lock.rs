//! In-flight destination-path exclusion.
//!
//! Two workers must never stream to the same destination file. The second
//! claimant waits until the first releases, then (typically) finds the
//! completed file via the fetch pre-check and records `AlreadyPresent`.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct PathLocks {
    in_flight: Mutex<HashSet<PathBuf>>,
    released: Notify,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `path`, waiting while another worker holds it. The claim is
    /// released when the returned guard drops.
    pub async fn acquire(&self, path: PathBuf) -> PathGuard<'_> {
        loop {
            // Register interest before checking, so a release between the
            // check and the await cannot be missed.
            let released = self.released.notified();
            if self.in_flight.lock().unwrap().insert(path.clone()) {
                return PathGuard { locks: self, path };
            }
            released.await;
        }
    }
}

/// Releases the claimed path on drop and wakes waiting workers.
#[derive(Debug)]
pub struct PathGuard<'a> {
    locks: &'a PathLocks,
    path: PathBuf,
}

impl Drop for PathGuard<'_> {
    fn drop(&mut self) {
        self.locks.in_flight.lock().unwrap().remove(&self.path);
        self.locks.released.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn second_claim_waits_for_release() {
        let locks = Arc::new(PathLocks::new());
        let path = PathBuf::from("/x/a.mp4");

        let guard = locks.acquire(path.clone()).await;

        let locks2 = Arc::clone(&locks);
        let path2 = path.clone();
        let waiter = tokio::spawn(async move {
            let _g = locks2.acquire(path2).await;
        });

        // Give the waiter a chance to block, then release.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
        assert!(locks.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn different_paths_do_not_contend() {
        let locks = PathLocks::new();
        let _a = locks.acquire(PathBuf::from("/x/a.mp4")).await;
        let _b = locks.acquire(PathBuf::from("/x/b.mp4")).await;
    }
}
