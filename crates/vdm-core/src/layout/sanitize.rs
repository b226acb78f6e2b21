//! Title sanitization for stable, filesystem-safe filenames.

/// Sanitizes an asset title for use as a file stem.
///
/// Keeps only alphanumerics, spaces, hyphens and underscores, trims the ends,
/// then replaces the remaining spaces with underscores. Deterministic and
/// idempotent: `sanitize_title(sanitize_title(x)) == sanitize_title(x)`.
pub fn sanitize_title(title: &str) -> String {
    let mut kept = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
            kept.push(c);
        }
    }
    kept.trim().replace(' ', "_")
}
