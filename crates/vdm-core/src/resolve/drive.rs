//! Google Drive file-id extraction and the direct-download endpoint.

use url::Url;

/// Direct-download endpoint for a Drive file id.
pub fn direct_download_url(id: &str) -> String {
    format!("https://drive.google.com/uc?id={}", id)
}

/// Extracts the opaque file id from a Drive link.
///
/// Precedence, first match wins:
/// 1. path form `/file/d/<id>/...`
/// 2. query form `open?id=<id>`
/// 3. query form `uc?id=<id>`
pub fn extract_file_id(url: &Url) -> Option<String> {
    if let Some(segments) = url.path_segments() {
        let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
        if segments.len() >= 3 && segments[0] == "file" && segments[1] == "d" {
            return Some(segments[2].to_string());
        }
    }

    if matches!(url.path(), "/open" | "/uc") {
        return url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty());
    }

    None
}
