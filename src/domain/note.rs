//! Note record and partial updates.

use crate::domain::{NoteId, TagId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum content length, in characters.
pub const MAX_CONTENT_LEN: usize = 20_000;

/// Truncates `s` to at most `max` characters.
pub(crate) fn clamp_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((end, _)) => s[..end].to_string(),
        None => s.to_string(),
    }
}

/// A short text note.
///
/// Serialized with camelCase keys (`lastEdited`, `isArchived`) and an
/// ISO-8601 timestamp with millisecond precision, the layout stored under
/// the notes key.
///
/// # Examples
///
/// ```
/// use notekeep::domain::{Note, NotePatch};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let mut note = Note::new(now);
/// assert!(note.title().is_empty());
///
/// note.apply(NotePatch::new().title("Groceries"), now);
/// assert_eq!(note.title(), "Groceries");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    title: String,
    content: String,
    tags: Vec<TagId>,
    #[serde(with = "timestamp")]
    last_edited: DateTime<Utc>,
    is_archived: bool,
}

impl Note {
    /// Creates an empty, unarchived note with a fresh id.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(NoteId::new(), now)
    }

    /// Creates an empty, unarchived note with the given id.
    pub fn with_id(id: NoteId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            last_edited: now,
            is_archived: false,
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    pub fn last_edited(&self) -> DateTime<Utc> {
        self.last_edited
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns true if the note references the given tag.
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.contains(tag)
    }

    /// Merges a partial update into the note.
    ///
    /// `lastEdited` becomes the patch's explicit timestamp when one is given,
    /// otherwise `now`. The title is trimmed, title and content are clamped
    /// to their maximum lengths, and duplicate tag ids are dropped.
    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = clamp_chars(title.trim(), MAX_TITLE_LEN);
        }
        if let Some(content) = patch.content {
            self.content = clamp_chars(&content, MAX_CONTENT_LEN);
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
        if let Some(archived) = patch.is_archived {
            self.is_archived = archived;
        }
        self.last_edited = patch.last_edited.unwrap_or(now);
    }

    /// Drops a tag reference without touching `lastEdited`.
    ///
    /// Returns true if the note referenced the tag.
    pub(crate) fn strip_tag(&mut self, tag: &TagId) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Applies the trimming and length bounds enforced on stored notes.
    pub(crate) fn normalized(mut self) -> Self {
        self.title = clamp_chars(self.title.trim(), MAX_TITLE_LEN);
        self.content = clamp_chars(&self.content, MAX_CONTENT_LEN);
        self.tags = dedup_tags(self.tags);
        self
    }
}

/// Removes duplicate tag ids (first occurrence kept).
fn dedup_tags(tags: Vec<TagId>) -> Vec<TagId> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

/// A partial update to a note. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<TagId>>,
    pub is_archived: Option<bool>,
    /// Explicit timestamp; only the editor's revert path sets this.
    pub last_edited: Option<DateTime<Utc>>,
}

impl NotePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn tags(mut self, tags: Vec<TagId>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn archived(mut self, archived: bool) -> Self {
        self.is_archived = Some(archived);
        self
    }

    pub fn last_edited(mut self, at: DateTime<Utc>) -> Self {
        self.last_edited = Some(at);
        self
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{s}': {e}")))
    }
}
