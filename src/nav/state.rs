//! UI state derived from a location.

use super::Location;
use crate::domain::{NoteId, TagId};
use serde::Serialize;
use std::fmt;

/// Top-level note scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Notes that are not archived.
    #[default]
    All,
    Archived,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::All => write!(f, "all"),
            View::Archived => write!(f, "archived"),
        }
    }
}

/// Everything the UI shows that is encoded in the location.
///
/// Recognized paths, each optionally followed by `/delete`:
///
/// ```text
/// /                      all notes
/// /<note>                all notes, note open
/// /archived[/<note>]     archived notes
/// /tags/<tag>[/<note>]   notes with a tag
/// ```
///
/// The `q` query parameter holds the search text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavState {
    pub view: View,
    pub selected_tag_id: Option<TagId>,
    pub active_note_id: Option<NoteId>,
    pub is_deleting: bool,
    pub search_query: String,
}

impl NavState {
    pub fn from_location(location: &Location) -> Self {
        let mut segments = location.segments();
        let mut state = NavState {
            search_query: location.query_param("q").unwrap_or_default(),
            ..NavState::default()
        };

        if segments.last() == Some(&"delete") {
            state.is_deleting = true;
            segments.pop();
        }

        let segment = |i: usize| segments.get(i).copied();
        match segment(0) {
            Some("archived") => {
                state.view = View::Archived;
                state.active_note_id = segment(1).and_then(|s| s.parse().ok());
            }
            Some("tags") => {
                state.selected_tag_id = segment(1).and_then(|s| s.parse().ok());
                state.active_note_id = segment(2).and_then(|s| s.parse().ok());
            }
            first => {
                state.active_note_id = first.and_then(|s| s.parse().ok());
            }
        }
        state
    }

    /// Path for opening `note` (or closing the open note with `None`) while
    /// staying in the current view or tag.
    ///
    /// The delete suffix is only added when a note is given.
    pub fn path_for_note(&self, note: Option<&NoteId>, delete: bool) -> String {
        let mut path = match (self.view, &self.selected_tag_id, note) {
            (View::Archived, _, Some(id)) => format!("/archived/{id}"),
            (View::Archived, _, None) => "/archived".to_string(),
            (View::All, Some(tag), Some(id)) => format!("/tags/{tag}/{id}"),
            (View::All, Some(tag), None) => format!("/tags/{tag}"),
            (View::All, None, Some(id)) => format!("/{id}"),
            (View::All, None, None) => "/".to_string(),
        };
        if delete && note.is_some() {
            path.push_str("/delete");
        }
        path
    }
}
