//! Named labels referenced by notes.

use crate::domain::TagId;
use crate::domain::note::clamp_chars;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum tag name length, in characters.
pub const MAX_TAG_NAME_LEN: usize = 50;

/// Error returned when a tag name is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

/// Normalizes a tag name: trims surrounding whitespace and clamps the length.
///
/// # Errors
///
/// Returns `ParseTagError` if the name is empty or whitespace-only.
pub fn normalize_tag_name(name: &str) -> Result<String, ParseTagError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ParseTagError("tag name cannot be empty".to_string()));
    }
    Ok(clamp_chars(trimmed, MAX_TAG_NAME_LEN))
}

/// A named label.
///
/// Names keep the case they were entered with but compare case-insensitively:
/// `Work` and `work` name the same tag.
///
/// ```
/// use notekeep::domain::Tag;
///
/// let tag = Tag::new("  Work ").unwrap();
/// assert_eq!(tag.name(), "Work");
/// assert!(tag.matches_name("WORK"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    name: String,
}

impl Tag {
    /// Creates a tag with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the name is empty after trimming.
    pub fn new(name: &str) -> Result<Self, ParseTagError> {
        Self::with_id(TagId::new(), name)
    }

    /// Creates a tag with the given id.
    pub fn with_id(id: TagId, name: &str) -> Result<Self, ParseTagError> {
        Ok(Self {
            id,
            name: normalize_tag_name(name)?,
        })
    }

    pub fn id(&self) -> &TagId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `name` names this tag once normalized: surrounding
    /// whitespace and case are ignored and over-long input is clamped the
    /// same way stored names are.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == clamp_chars(name.trim(), MAX_TAG_NAME_LEN).to_lowercase()
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
