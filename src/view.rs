//! The filtered, sorted note list shown for a navigation state.

use crate::domain::{Note, TagId};
use crate::nav::{NavState, View};

/// Criteria for [`NoteFilter::apply`].
#[derive(Debug, Clone, Copy)]
pub struct NoteFilter<'a> {
    pub query: &'a str,
    pub tag: Option<&'a TagId>,
    pub view: View,
}

impl<'a> NoteFilter<'a> {
    pub fn from_state(state: &'a NavState) -> Self {
        Self {
            query: &state.search_query,
            tag: state.selected_tag_id.as_ref(),
            view: state.view,
        }
    }

    fn matches(&self, note: &Note, query: &str) -> bool {
        let matches_search = note.title().to_lowercase().contains(query)
            || note.content().to_lowercase().contains(query);
        let matches_tag = self.tag.is_none_or(|tag| note.has_tag(tag));
        let matches_view = match self.view {
            View::All => !note.is_archived(),
            View::Archived => note.is_archived(),
        };
        matches_search && matches_tag && matches_view
    }

    /// Notes matching every criterion, most recently edited first.
    ///
    /// The search is a case-insensitive substring match on title or content;
    /// an empty query matches everything. Ties keep collection order.
    pub fn apply<'n>(&self, notes: &'n [Note]) -> Vec<&'n Note> {
        let query = self.query.to_lowercase();
        let mut out: Vec<&Note> = notes.iter().filter(|n| self.matches(n, &query)).collect();
        out.sort_by(|a, b| b.last_edited().cmp(&a.last_edited()));
        out
    }
}

/// Shorthand for filtering `notes` by a navigation state.
pub fn filtered_notes<'n>(notes: &'n [Note], state: &NavState) -> Vec<&'n Note> {
    NoteFilter::from_state(state).apply(notes)
}
