//! Destination layout: taxonomy folder hierarchy and safe filenames.
//!
//! Assets land at `root/{subject}/[{topic}/][{subtopic}/]{Title}.mp4`;
//! missing taxonomy levels are simply omitted.

mod sanitize;

pub use sanitize::sanitize_title;

use std::path::{Path, PathBuf};

/// Media container extension for every fetched asset.
pub const MEDIA_EXT: &str = "mp4";

/// Stem used when sanitization strips a title down to nothing.
const FALLBACK_STEM: &str = "untitled";

/// Derives the destination path for one work item. Pure; does not touch the
/// filesystem.
pub fn dest_path(
    root: &Path,
    subject: &str,
    topic: Option<&str>,
    subtopic: Option<&str>,
    title: &str,
) -> PathBuf {
    let mut path = root.join(subject.trim());
    for level in [topic, subtopic].into_iter().flatten() {
        let level = level.trim();
        if !level.is_empty() {
            path.push(level);
        }
    }
    let mut stem = sanitize_title(title);
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    path.join(format!("{}.{}", stem, MEDIA_EXT))
}

/// Creates the directory chain above `path`. Create-if-absent: succeeds when
/// the directories already exist, so concurrent callers are safe.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
