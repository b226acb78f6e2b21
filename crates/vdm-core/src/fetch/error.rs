//! Download error type, classified per failure mode.

use thiserror::Error;

/// Error from one fetch attempt. Every variant maps to a `Failed` row at the
/// orchestrator boundary; the retry layer decides which are worth retrying.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level curl failure (timeout, connection, TLS, stall).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Response completed with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Declared content length of 0, or no bytes actually written.
    #[error("empty response body")]
    EmptyBody,
    /// Transfer ended with fewer bytes than the declared content length
    /// (e.g. the server closed early).
    #[error("truncated transfer: expected {expected} bytes, got {received}")]
    Truncated { expected: u64, received: u64 },
    /// Fetched video below the size floor; the platform returned a
    /// valid-looking placeholder.
    #[error("fetched file too small: {got} bytes (floor {floor})")]
    TooSmall { got: u64, floor: u64 },
    /// Filesystem failure while writing or finalizing the asset.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    /// Transfer cancelled by the run control token.
    #[error("fetch aborted")]
    Aborted,
    /// The injected video client failed.
    #[error("video client: {0:#}")]
    Client(anyhow::Error),
}
