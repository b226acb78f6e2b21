//! Keyword-based column discovery for data sheets.
//!
//! Real-world manifests are inconsistent about header wording ("Video Title",
//! "Title ", "Google Drive URL"), so columns are located by case- and
//! whitespace-insensitive keyword containment rather than exact names.

const TITLE_KEYWORDS: &[&str] = &["video title", "title"];
const LINK_KEYWORDS: &[&str] = &["google drive url", "url", "link"];
const SUBJECT_KEYWORDS: &[&str] = &["subject"];
const TOPIC_KEYWORDS: &[&str] = &["topic"];
const SUBTOPIC_KEYWORDS: &[&str] = &["sub topic", "subtopic"];

/// Resolved column positions for one data sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: usize,
    pub link: usize,
    pub subject: usize,
    pub topic: Option<usize>,
    pub subtopic: Option<usize>,
}

impl ColumnMap {
    /// Locates all columns in `header`. Required: title, link, subject;
    /// the error names the first missing one.
    pub fn discover(header: &[String]) -> Result<Self, &'static str> {
        // Subtopic first: its header also contains the "topic" keyword, and
        // excluding it keeps the topic search order-independent.
        let subtopic = find(header, SUBTOPIC_KEYWORDS, None);
        let title = find(header, TITLE_KEYWORDS, None).ok_or("title")?;
        let link = find(header, LINK_KEYWORDS, None).ok_or("link")?;
        let subject = find(header, SUBJECT_KEYWORDS, None).ok_or("subject")?;
        let topic = find(header, TOPIC_KEYWORDS, subtopic);
        Ok(Self {
            title,
            link,
            subject,
            topic,
            subtopic,
        })
    }
}

fn find(header: &[String], keywords: &[&str], exclude: Option<usize>) -> Option<usize> {
    for keyword in keywords.iter().copied() {
        let hit = header.iter().enumerate().position(|(i, name)| {
            Some(i) != exclude && name.trim().to_lowercase().contains(keyword)
        });
        if hit.is_some() {
            return hit;
        }
    }
    None
}
