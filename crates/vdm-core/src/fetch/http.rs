//! Streaming HTTP GET via curl into a local file.
//!
//! Writes the response body sequentially as libcurl delivers it. The caller
//! owns temp-file placement and cleanup; this layer only reports what
//! happened on the wire.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::control::RunControl;

use super::{FetchError, FetchOptions};

/// Stall guard: abort when the transfer stays under 1 KiB/s for 60 seconds.
const LOW_SPEED_LIMIT: u32 = 1024;
const LOW_SPEED_TIME_SECS: u64 = 60;

/// Streams `url` into the file at `path` and returns the bytes written.
///
/// Fails on non-2xx status, a declared or actual empty body, mid-stream I/O
/// failure, transport errors, and abort. The file is left in whatever state
/// the transfer reached; the caller deletes it on any error.
pub fn download_to_file(
    url: &str,
    path: &Path,
    opts: FetchOptions,
    control: &RunControl,
) -> Result<u64, FetchError> {
    let mut out = File::create(path)?;
    let mut written: u64 = 0;
    let mut declared: Option<u64> = None;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.low_speed_limit(LOW_SPEED_LIMIT)?;
    easy.low_speed_time(std::time::Duration::from_secs(LOW_SPEED_TIME_SECS))?;

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer.header_function(|header| {
            // A new status line starts a new response (redirect hop); any
            // Content-Length seen before it belonged to the previous hop.
            if header.starts_with(b"HTTP/") {
                declared = None;
            } else if let Some(len) = parse_content_length(header) {
                declared = Some(len);
            }
            true
        })?;
        transfer.write_function(|data| {
            if control.is_aborted() {
                return Ok(0); // abort transfer
            }
            match out.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.perform()
    };

    if control.is_aborted() {
        return Err(FetchError::Aborted);
    }
    if let Some(e) = write_error {
        return Err(FetchError::Io(e));
    }
    perform_result?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    if declared == Some(0) || written == 0 {
        return Err(FetchError::EmptyBody);
    }
    if let Some(expected) = declared {
        if written != expected {
            return Err(FetchError::Truncated {
                expected,
                received: written,
            });
        }
    }

    out.sync_all()?;
    Ok(written)
}

fn parse_content_length(header: &[u8]) -> Option<u64> {
    let header = std::str::from_utf8(header).ok()?;
    let (name, value) = header.split_once(':')?;
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse().ok()
}
