//! Per-host concurrency budget.
//!
//! The worker pool caps global concurrency; this caps it again per remote
//! host so one backend cannot absorb the whole pool and neither host sees
//! more parallel connections than configured.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Hands out per-host connection permits. Hosts are created on first use.
#[derive(Debug)]
pub struct HostBudget {
    per_host: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl HostBudget {
    pub fn new(per_host: usize) -> Self {
        Self {
            per_host: per_host.max(1),
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Waits for and claims a connection permit for `host`. The permit is
    /// released on drop.
    pub async fn acquire(&self, host: &str) -> OwnedSemaphorePermit {
        let semaphore = {
            let mut hosts = self.hosts.lock().unwrap();
            Arc::clone(
                hosts
                    .entry(host.to_string())
                    .or_insert_with(|| Arc::new(Semaphore::new(self.per_host))),
            )
        };
        semaphore
            .acquire_owned()
            .await
            .expect("host semaphore never closed")
    }
}
