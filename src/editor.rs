//! Editing session for the open note, with cancel-to-revert.

use crate::domain::{Note, NoteId, NotePatch, ParseTagError, TagId};
use crate::manager::NotesManager;
use crate::nav::{Navigator, Router};
use chrono::{DateTime, Utc};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    title: String,
    content: String,
    last_edited: DateTime<Utc>,
}

/// Edits one note through the manager.
///
/// Every change is persisted as it is made. The state at open time is kept
/// so [`cancel`](Self::cancel) can undo the session.
#[derive(Debug, Clone)]
pub struct EditSession {
    note_id: NoteId,
    snapshot: Snapshot,
}

impl EditSession {
    /// Starts a session on `id`. Returns `None` if the note does not exist.
    pub fn open(manager: &NotesManager, id: &NoteId) -> Option<Self> {
        let note = manager.note(id)?;
        Some(Self {
            note_id: id.clone(),
            snapshot: Snapshot {
                title: note.title().to_string(),
                content: note.content().to_string(),
                last_edited: note.last_edited(),
            },
        })
    }

    /// Starts a session on the note open in `navigator`, if any.
    pub fn for_active_note<R: Router>(manager: &NotesManager, navigator: &Navigator<R>) -> Option<Self> {
        let id = navigator.state().active_note_id?;
        Self::open(manager, &id)
    }

    pub fn note_id(&self) -> &NoteId {
        &self.note_id
    }

    pub fn note<'m>(&self, manager: &'m NotesManager) -> Option<&'m Note> {
        manager.note(&self.note_id)
    }

    pub fn update_title(&self, manager: &mut NotesManager, title: &str) {
        manager.update_note(&self.note_id, NotePatch::new().title(title));
    }

    pub fn update_content(&self, manager: &mut NotesManager, content: &str) {
        manager.update_note(&self.note_id, NotePatch::new().content(content));
    }

    /// Creates the tag if needed and attaches it.
    pub fn add_tag(&self, manager: &mut NotesManager, name: &str) -> Result<TagId, ParseTagError> {
        let tag = manager.add_tag(name)?;
        self.add_existing_tag(manager, tag.id());
        Ok(tag.id().clone())
    }

    /// Attaches an existing tag. Already-attached tags are left alone.
    pub fn add_existing_tag(&self, manager: &mut NotesManager, tag: &TagId) {
        let Some(note) = manager.note(&self.note_id) else {
            return;
        };
        if note.has_tag(tag) {
            return;
        }
        let mut tags = note.tags().to_vec();
        tags.push(tag.clone());
        manager.update_note(&self.note_id, NotePatch::new().tags(tags));
    }

    pub fn remove_tag(&self, manager: &mut NotesManager, tag: &TagId) {
        let Some(note) = manager.note(&self.note_id) else {
            return;
        };
        let tags = note.tags().iter().filter(|t| *t != tag).cloned().collect();
        manager.update_note(&self.note_id, NotePatch::new().tags(tags));
    }

    /// Keeps the changes and closes the note.
    pub fn save<R: Router>(self, navigator: &mut Navigator<R>) {
        navigator.set_active_note_id(None);
    }

    /// Undoes the session and closes the note.
    ///
    /// A note that was blank when opened and still has no tags is deleted.
    /// Otherwise title and content go back to their opening values and
    /// `lastEdited` is restored with them.
    pub fn cancel<R: Router>(self, manager: &mut NotesManager, navigator: &mut Navigator<R>) {
        if let Some(note) = manager.note(&self.note_id) {
            let was_blank = self.snapshot.title.is_empty() && self.snapshot.content.is_empty();
            if was_blank && note.tags().is_empty() {
                debug!(note_id = %self.note_id, "discarding new note");
                manager.delete_note(&self.note_id);
            } else {
                let Snapshot {
                    title,
                    content,
                    last_edited,
                } = self.snapshot;
                manager.update_note(
                    &self.note_id,
                    NotePatch::new()
                        .title(title)
                        .content(content)
                        .last_edited(last_edited),
                );
            }
        }
        navigator.set_active_note_id(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::nav::{Location, MemoryRouter};
    use crate::notify::RecordingNotifier;
    use crate::storage::{KeyValueProvider, StorageService};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn setup() -> (NotesManager, ManualClock) {
        let storage = Rc::new(StorageService::new(
            Rc::new(KeyValueProvider::open_in_memory().unwrap()),
            Rc::new(KeyValueProvider::open_in_memory().unwrap()),
        ));
        let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let mut manager =
            NotesManager::new(storage, Box::new(RecordingNotifier::new())).with_clock(clock.clone());
        manager.sync();
        (manager, clock)
    }

    fn navigator_at(note: &NoteId) -> Navigator<MemoryRouter> {
        let mut nav = Navigator::new(MemoryRouter::new(Location::parse("/tags/t1?q=x").unwrap()));
        nav.set_active_note_id(Some(note));
        nav
    }

    #[test]
    fn opens_active_note_from_navigator() {
        let (mut manager, _) = setup();
        let note = manager.create_note();
        let nav = navigator_at(note.id());
        let session = EditSession::for_active_note(&manager, &nav).unwrap();
        assert_eq!(session.note_id(), note.id());

        let empty = Navigator::new(MemoryRouter::default());
        assert!(EditSession::for_active_note(&manager, &empty).is_none());
    }

    #[test]
    fn save_closes_and_keeps_changes() {
        let (mut manager, _) = setup();
        let note = manager.create_note();
        let mut nav = navigator_at(note.id());
        let session = EditSession::open(&manager, note.id()).unwrap();

        session.update_title(&mut manager, "Kept");
        session.save(&mut nav);

        assert_eq!(manager.note(note.id()).unwrap().title(), "Kept");
        assert_eq!(nav.location().to_string(), "/tags/t1?q=x");
    }

    #[test]
    fn cancel_on_new_blank_note_deletes_it() {
        let (mut manager, _) = setup();
        let note = manager.create_note();
        let mut nav = navigator_at(note.id());
        let session = EditSession::open(&manager, note.id()).unwrap();

        session.update_title(&mut manager, "typed then abandoned");
        session.cancel(&mut manager, &mut nav);

        assert!(manager.note(note.id()).is_none());
        assert_eq!(nav.state().active_note_id, None);
    }

    #[test]
    fn cancel_on_new_note_with_tags_reverts_instead() {
        let (mut manager, _) = setup();
        let note = manager.create_note();
        let mut nav = navigator_at(note.id());
        let session = EditSession::open(&manager, note.id()).unwrap();

        session.add_tag(&mut manager, "keep").unwrap();
        session.update_content(&mut manager, "draft");
        session.cancel(&mut manager, &mut nav);

        let note = manager.note(note.id()).unwrap();
        assert_eq!(note.content(), "");
        assert_eq!(note.tags().len(), 1);
    }

    #[test]
    fn cancel_restores_title_content_and_timestamp() {
        let (mut manager, clock) = setup();
        let note = manager.create_note();
        manager.update_note(note.id(), NotePatch::new().title("Original").content("body"));
        let opened_at = manager.note(note.id()).unwrap().last_edited();

        let mut nav = navigator_at(note.id());
        let session = EditSession::open(&manager, note.id()).unwrap();
        clock.advance(Duration::minutes(30));
        session.update_title(&mut manager, "Changed");
        session.update_content(&mut manager, "other");
        session.cancel(&mut manager, &mut nav);

        let note = manager.note(note.id()).unwrap();
        assert_eq!(note.title(), "Original");
        assert_eq!(note.content(), "body");
        assert_eq!(note.last_edited(), opened_at);
    }

    #[test]
    fn tags_attach_once_and_detach() {
        let (mut manager, _) = setup();
        let note = manager.create_note();
        let session = EditSession::open(&manager, note.id()).unwrap();

        let work = session.add_tag(&mut manager, "Work").unwrap();
        assert_eq!(session.add_tag(&mut manager, " work ").unwrap(), work);
        session.add_existing_tag(&mut manager, &work);
        assert_eq!(session.note(&manager).unwrap().tags(), &[work.clone()]);

        session.remove_tag(&mut manager, &work);
        assert!(session.note(&manager).unwrap().tags().is_empty());
        assert_eq!(manager.tags().len(), 1);
        assert!(session.add_tag(&mut manager, "  ").is_err());
    }

    #[test]
    fn cancel_after_note_was_deleted_just_closes() {
        let (mut manager, _) = setup();
        let note = manager.create_note();
        let mut nav = navigator_at(note.id());
        let session = EditSession::open(&manager, note.id()).unwrap();
        manager.delete_note(note.id());
        session.cancel(&mut manager, &mut nav);
        assert_eq!(nav.location().path(), "/tags/t1");
    }
}
