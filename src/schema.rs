//! Structural validators for data read back from storage.
//!
//! Storage is untrusted input: a user can edit the JSON files in a selected
//! directory by hand. Each schema turns a raw JSON value into a typed value or
//! a [`SchemaError`]; the storage layer then falls back to the caller's
//! default instead of propagating corrupt state.

use crate::domain::{Note, Tag, TagId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use thiserror::Error;

/// Errors raised when stored data does not match its expected shape.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The value could not be decoded into the expected type.
    #[error("structure mismatch: {0}")]
    Structure(#[from] serde_json::Error),

    /// A field decoded but holds an unacceptable value.
    #[error("invalid {field} at index {index}: {reason}")]
    Invalid {
        field: &'static str,
        index: usize,
        reason: String,
    },
}

/// Validates and decodes a raw JSON value.
pub trait Schema<T> {
    fn parse(&self, value: Value) -> Result<T, SchemaError>;
}

/// Decodes any deserializable type without further checks.
pub struct Typed<T>(PhantomData<fn() -> T>);

impl<T> Typed<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Schema<T> for Typed<T> {
    fn parse(&self, value: Value) -> Result<T, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// The stored notes collection.
///
/// Every field is required. Titles are trimmed, title and content are
/// clamped to their maximum lengths, and repeated tag references collapse.
pub struct NotesSchema;

impl Schema<Vec<Note>> for NotesSchema {
    fn parse(&self, value: Value) -> Result<Vec<Note>, SchemaError> {
        let notes: Vec<Note> = serde_json::from_value(value)?;
        Ok(notes.into_iter().map(Note::normalized).collect())
    }
}

/// The stored tags collection.
///
/// Names are trimmed and clamped; a name that is empty after trimming
/// rejects the collection.
pub struct TagsSchema;

impl Schema<Vec<Tag>> for TagsSchema {
    fn parse(&self, value: Value) -> Result<Vec<Tag>, SchemaError> {
        #[derive(Deserialize)]
        struct RawTag {
            id: TagId,
            name: String,
        }

        let raw: Vec<RawTag> = serde_json::from_value(value)?;
        raw.into_iter()
            .enumerate()
            .map(|(index, tag)| {
                Tag::with_id(tag.id, &tag.name).map_err(|e| SchemaError::Invalid {
                    field: "tag name",
                    index,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
