//! Builder for test notes with sensible defaults.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Value, json};

/// Builder for notes written straight into a notes directory.
///
/// Produces the stored JSON shape rather than going through the library, so
/// tests can also write data another client might have produced.
#[derive(Debug, Clone)]
pub struct TestNote {
    id: String,
    title: String,
    content: String,
    tags: Vec<String>,
    last_edited: DateTime<Utc>,
    archived: bool,
}

impl TestNote {
    /// Creates a new test note with the given title.
    ///
    /// Automatically generates a unique ID and sets the timestamp to now.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            title: title.into(),
            content: String::new(),
            tags: Vec::new(),
            last_edited: Utc::now(),
            archived: false,
        }
    }

    /// Sets an explicit ID for the note.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// References a tag by ID.
    pub fn tag(mut self, tag_id: impl Into<String>) -> Self {
        self.tags.push(tag_id.into());
        self
    }

    /// Sets the edit timestamp.
    pub fn last_edited(mut self, at: DateTime<Utc>) -> Self {
        self.last_edited = at;
        self
    }

    /// Marks the note archived.
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    /// Returns the note ID.
    pub fn get_id(&self) -> &str {
        &self.id
    }

    /// Returns the stored JSON form.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "content": self.content,
            "tags": self.tags,
            "lastEdited": self.last_edited.to_rfc3339_opts(SecondsFormat::Millis, true),
            "isArchived": self.archived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_json_uses_camel_case_keys() {
        let value = TestNote::new("T").tag("t1").archived().to_json();
        assert_eq!(value["title"], "T");
        assert_eq!(value["tags"][0], "t1");
        assert_eq!(value["isArchived"], true);
        assert!(value["lastEdited"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_note_ids_are_unique() {
        assert_ne!(TestNote::new("a").get_id(), TestNote::new("a").get_id());
    }
}
