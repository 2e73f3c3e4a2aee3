//! In-memory owner of the notes and tags collections.
//!
//! The manager is the only writer of both collections. Every mutation is
//! applied in memory and then the whole affected collection is written back
//! through the current storage provider. Writes are suppressed until the
//! collections have been loaded from that provider, so an empty or stale
//! in-memory state never overwrites existing data.


use crate::clock::{Clock, SystemClock};
use crate::domain::{Note, NoteId, NotePatch, ParseTagError, Tag, TagId, normalize_tag_name};
use crate::notify::{Notification, Notifier};
use crate::schema::{NotesSchema, TagsSchema};
use crate::storage::{StorageExt, StorageService, keys};
use std::rc::Rc;
use tracing::{debug, error, info};

/// Lifecycle of the loaded collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing loaded yet.
    Uninitialized,
    /// A reload is in progress.
    Loading,
    /// The current provider lacks write access; collections are empty.
    PermissionPending,
    /// Collections reflect the current provider.
    Ready,
    /// Loading failed; collections are empty and writes are suppressed.
    Failed,
}

/// Owns the notes and tags for the session.
pub struct NotesManager {
    storage: Rc<StorageService>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    notes: Vec<Note>,
    tags: Vec<Tag>,
    state: LoadState,
    loaded_generation: Option<u64>,
}

impl NotesManager {
    pub fn new(storage: Rc<StorageService>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            storage,
            notifier,
            clock: Box::new(SystemClock),
            notes: Vec::new(),
            tags: Vec::new(),
            state: LoadState::Uninitialized,
            loaded_generation: None,
        }
    }

    /// Replaces the time source used for `lastEdited` stamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// True until the collections reflect the current provider.
    pub fn is_loading(&self) -> bool {
        self.state != LoadState::Ready
    }

    pub fn needs_permission(&self) -> bool {
        self.state == LoadState::PermissionPending
    }

    // ===========================================
    // Loading
    // ===========================================

    /// Reloads if the storage provider changed since the last load, or if the
    /// last load was waiting on permission.
    pub fn sync(&mut self) -> LoadState {
        let stale = self.loaded_generation != Some(self.storage.generation());
        if stale || matches!(self.state, LoadState::Uninitialized | LoadState::PermissionPending) {
            self.reload();
        }
        self.state
    }

    /// Discards in-memory state and loads both collections from the current
    /// provider.
    pub fn reload(&mut self) -> LoadState {
        self.state = LoadState::Loading;
        self.notes.clear();
        self.tags.clear();

        let generation = self.storage.generation();
        let provider = self.storage.current();
        self.loaded_generation = Some(generation);

        match provider.has_permission() {
            Ok(true) => {}
            Ok(false) => {
                debug!(backend = %provider.describe(), "waiting for storage permission");
                self.state = LoadState::PermissionPending;
                return self.state;
            }
            Err(err) => {
                error!(backend = %provider.describe(), error = %err, "failed to load notes");
                self.notifier
                    .notify(Notification::error(format!("failed to load notes: {err}")));
                self.state = LoadState::Failed;
                return self.state;
            }
        }

        self.notes = provider.get_with(keys::NOTES, Vec::new(), &NotesSchema);
        self.tags = provider.get_with(keys::TAGS, Vec::new(), &TagsSchema);
        self.state = LoadState::Ready;
        info!(
            backend = %provider.describe(),
            notes = self.notes.len(),
            tags = self.tags.len(),
            "loaded notes"
        );
        self.state
    }

    fn can_persist(&self) -> bool {
        self.state == LoadState::Ready && self.loaded_generation == Some(self.storage.generation())
    }

    fn persist_notes(&self) {
        if !self.can_persist() {
            debug!(state = ?self.state, "skipping notes write until storage is loaded");
            return;
        }
        self.storage.current().set(keys::NOTES, &self.notes);
    }

    fn persist_tags(&self) {
        if !self.can_persist() {
            debug!(state = ?self.state, "skipping tags write until storage is loaded");
            return;
        }
        self.storage.current().set(keys::TAGS, &self.tags);
    }

    // ===========================================
    // Reads
    // ===========================================

    /// Notes in storage order (newest created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id() == id)
    }

    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id() == id)
    }

    /// Returns the tag's name, or an empty string for an unknown id.
    pub fn tag_name(&self, id: &TagId) -> &str {
        self.tag(id).map(Tag::name).unwrap_or("")
    }

    /// Finds a tag by name, ignoring case and surrounding whitespace.
    pub fn find_tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.matches_name(name))
    }

    /// Number of notes referencing the tag.
    pub fn tag_usage(&self, id: &TagId) -> usize {
        self.notes.iter().filter(|n| n.has_tag(id)).count()
    }

    /// Tags whose name contains `input` (case-insensitive), skipping those in
    /// `exclude`.
    pub fn suggest_tags(&self, input: &str, exclude: &[TagId]) -> Vec<&Tag> {
        let needle = input.to_lowercase();
        self.tags
            .iter()
            .filter(|t| t.name().to_lowercase().contains(&needle) && !exclude.contains(t.id()))
            .collect()
    }

    // ===========================================
    // Note operations
    // ===========================================

    /// Creates an empty note at the front of the collection.
    pub fn create_note(&mut self) -> Note {
        let note = Note::new(self.clock.now());
        self.notes.insert(0, note.clone());
        debug!(note_id = %note.id(), "created note");
        self.persist_notes();
        note
    }

    /// Merges `patch` into the note. Unknown ids are ignored.
    ///
    /// Stamps `lastEdited` with the current time unless the patch carries
    /// an explicit timestamp.
    pub fn update_note(&mut self, id: &NoteId, patch: NotePatch) -> Option<&Note> {
        let now = self.clock.now();
        let index = self.notes.iter().position(|n| n.id() == id)?;
        self.notes[index].apply(patch, now);
        self.persist_notes();
        Some(&self.notes[index])
    }

    /// Removes the note. Returns true if it existed.
    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id() != id);
        let removed = self.notes.len() != before;
        if removed {
            debug!(note_id = %id, "deleted note");
            self.persist_notes();
        }
        removed
    }

    pub fn archive_note(&mut self, id: &NoteId) -> Option<&Note> {
        self.update_note(id, NotePatch::new().archived(true))
    }

    pub fn unarchive_note(&mut self, id: &NoteId) -> Option<&Note> {
        self.update_note(id, NotePatch::new().archived(false))
    }

    // ===========================================
    // Tag operations
    // ===========================================

    /// Returns the tag with this name, creating it if none matches.
    ///
    /// Matching ignores case and surrounding whitespace, so repeated calls
    /// with equivalent names return the same tag.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the name is empty after trimming.
    pub fn add_tag(&mut self, name: &str) -> Result<Tag, ParseTagError> {
        let name = normalize_tag_name(name)?;
        if let Some(existing) = self.find_tag_by_name(&name) {
            return Ok(existing.clone());
        }
        let tag = Tag::new(&name)?;
        self.tags.push(tag.clone());
        debug!(tag_id = %tag.id(), name = tag.name(), "created tag");
        self.persist_tags();
        Ok(tag)
    }

    /// Renames the tag in place. Returns false for an unknown id.
    ///
    /// The new name is not checked against other tags, so a rename can
    /// produce two tags whose names differ only in case.
    pub fn update_tag(&mut self, id: &TagId, name: &str) -> Result<bool, ParseTagError> {
        let name = normalize_tag_name(name)?;
        let Some(tag) = self.tags.iter_mut().find(|t| t.id() == id) else {
            return Ok(false);
        };
        tag.rename(name);
        self.persist_tags();
        Ok(true)
    }

    /// Removes the tag and strips it from every note that references it.
    ///
    /// Returns false for an unknown id.
    pub fn delete_tag(&mut self, id: &TagId) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.id() != id);
        if self.tags.len() == before {
            return false;
        }
        let stripped = self
            .notes
            .iter_mut()
            .map(|n| n.strip_tag(id))
            .filter(|&changed| changed)
            .count();
        debug!(tag_id = %id, notes = stripped, "deleted tag");
        self.persist_tags();
        self.persist_notes();
        true
    }
}
