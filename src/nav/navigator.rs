use super::{Location, NavState, View};
use crate::domain::{NoteId, TagId};
use tracing::debug;

/// Source of the current location.
pub trait Router {
    fn location(&self) -> Location;

    /// Pushes a new history entry.
    fn navigate(&mut self, to: Location);
}

/// In-memory history with back and forward.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    entries: Vec<Location>,
    index: usize,
}

impl MemoryRouter {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Moves one entry back. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Moves one entry forward. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new(Location::root())
    }
}

impl Router for MemoryRouter {
    fn location(&self) -> Location {
        self.entries[self.index].clone()
    }

    fn navigate(&mut self, to: Location) {
        self.entries.truncate(self.index + 1);
        self.entries.push(to);
        self.index += 1;
    }
}

/// Expresses every UI state change as a navigation.
///
/// Nothing is stored here besides the router; [`state`](Self::state) is
/// recomputed from the current location on each call.
#[derive(Debug, Clone, Default)]
pub struct Navigator<R> {
    router: R,
}

impl<R: Router> Navigator<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    pub fn state(&self) -> NavState {
        NavState::from_location(&self.router.location())
    }

    pub fn location(&self) -> Location {
        self.router.location()
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    fn go(&mut self, to: Location) {
        debug!(to = %to, "navigate");
        self.router.navigate(to);
    }

    /// Opens `id`, or closes the open note with `None`.
    pub fn set_active_note_id(&mut self, id: Option<&NoteId>) {
        let location = self.location();
        let path = NavState::from_location(&location).path_for_note(id, false);
        self.go(location.with_path(path));
    }

    pub fn open_delete_modal(&mut self, id: &NoteId) {
        let location = self.location();
        let path = NavState::from_location(&location).path_for_note(Some(id), true);
        self.go(location.with_path(path));
    }

    /// Returns to the open note's path without the delete suffix.
    pub fn close_delete_modal(&mut self) {
        let location = self.location();
        let state = NavState::from_location(&location);
        let path = state.path_for_note(state.active_note_id.as_ref(), false);
        self.go(location.with_path(path));
    }

    /// Sets the `q` parameter, or removes it for an empty query.
    pub fn set_search_query(&mut self, query: &str) {
        let value = (!query.is_empty()).then_some(query);
        let to = self.location().with_query_param("q", value);
        self.go(to);
    }

    pub fn set_selected_tag_id(&mut self, id: Option<&TagId>) {
        let path = match id {
            Some(id) => format!("/tags/{id}"),
            None => "/".to_string(),
        };
        let to = self.location().with_path(path);
        self.go(to);
    }

    pub fn set_view(&mut self, view: View) {
        let path = match view {
            View::Archived => "/archived",
            View::All => "/",
        };
        let to = self.location().with_path(path);
        self.go(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn navigator(at: &str) -> Navigator<MemoryRouter> {
        Navigator::new(MemoryRouter::new(Location::parse(at).unwrap()))
    }

    fn id(s: &str) -> NoteId {
        s.parse().unwrap()
    }

    fn at(nav: &Navigator<MemoryRouter>) -> String {
        nav.location().to_string()
    }

    #[test]
    fn opening_a_note_keeps_tag_and_query() {
        let mut nav = navigator("/tags/t1?q=pie");
        nav.set_active_note_id(Some(&id("n1")));
        assert_eq!(at(&nav), "/tags/t1/n1?q=pie");
        nav.set_active_note_id(Some(&id("n2")));
        assert_eq!(at(&nav), "/tags/t1/n2?q=pie");
        nav.set_active_note_id(None);
        assert_eq!(at(&nav), "/tags/t1?q=pie");
    }

    #[test]
    fn delete_modal_opens_and_closes_deterministically() {
        let mut nav = navigator("/");
        nav.set_active_note_id(Some(&id("n1")));
        nav.set_active_note_id(Some(&id("n2")));
        nav.open_delete_modal(&id("n2"));
        assert_eq!(at(&nav), "/n2/delete");
        assert!(nav.state().is_deleting);

        nav.close_delete_modal();
        assert_eq!(at(&nav), "/n2");
        assert!(!nav.state().is_deleting);
        assert_eq!(nav.router().history_len(), 5);
    }

    #[test]
    fn search_query_is_set_and_cleared() {
        let mut nav = navigator("/archived/n1");
        nav.set_search_query("meeting notes");
        assert_eq!(at(&nav), "/archived/n1?q=meeting+notes");
        assert_eq!(nav.state().search_query, "meeting notes");
        nav.set_search_query("");
        assert_eq!(at(&nav), "/archived/n1");
    }

    #[test]
    fn view_and_tag_switches_keep_query_and_drop_note() {
        let mut nav = navigator("/n1?q=x");
        nav.set_view(View::Archived);
        assert_eq!(at(&nav), "/archived?q=x");
        nav.set_selected_tag_id(Some(&"t3".parse().unwrap()));
        assert_eq!(at(&nav), "/tags/t3?q=x");
        nav.set_selected_tag_id(None);
        assert_eq!(at(&nav), "/?q=x");
        nav.set_view(View::All);
        assert_eq!(nav.state().view, View::All);
    }

    #[test]
    fn history_back_and_forward() {
        let mut router = MemoryRouter::default();
        assert!(!router.back());
        router.navigate(Location::parse("/a").unwrap());
        router.navigate(Location::parse("/b").unwrap());
        assert!(router.back());
        assert_eq!(router.location().path(), "/a");
        assert!(router.forward());
        assert!(!router.forward());

        router.back();
        router.navigate(Location::parse("/c").unwrap());
        assert_eq!(router.history_len(), 3);
        assert!(!router.forward());
    }
}
