//! Minimum inter-request spacing per host.
//!
//! Generalizes the fixed sleep between sequential downloads: each host hands
//! out start slots at least `interval` apart, no matter which worker asks.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct HostPacer {
    interval: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Claims the next start slot for `host` and sleeps until it arrives.
    /// Slots are assigned under the lock, so concurrent callers queue up
    /// `interval` apart instead of racing for the same slot.
    pub async fn wait_turn(&self, host: &str) {
        if self.interval.is_zero() {
            return;
        }
        let wait = {
            let mut slots = self.next_slot.lock().unwrap();
            let now = Instant::now();
            let slot = slots.entry(host.to_string()).or_insert(now);
            let start_at = (*slot).max(now);
            *slot = start_at + self.interval;
            start_at.saturating_duration_since(now)
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spaces_consecutive_turns_for_one_host() {
        let pacer = HostPacer::new(Duration::from_millis(30));
        let start = Instant::now();
        pacer.wait_turn("h").await;
        pacer.wait_turn("h").await;
        pacer.wait_turn("h").await;
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn hosts_do_not_pace_each_other() {
        let pacer = HostPacer::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.wait_turn("a").await;
        pacer.wait_turn("b").await;
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn zero_interval_is_a_no_op() {
        let pacer = HostPacer::new(Duration::ZERO);
        pacer.wait_turn("h").await;
        assert!(pacer.next_slot.lock().unwrap().is_empty());
    }
}
