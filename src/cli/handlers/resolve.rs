//! Note and tag resolution utilities.

use anyhow::{Result, bail};

use crate::domain::{Note, Tag};
use crate::manager::NotesManager;

/// Result of resolving a note identifier.
#[derive(Debug)]
pub enum ResolveResult<'a> {
    /// Exactly one note matched.
    Unique(&'a Note),
    /// Multiple notes matched (ambiguous).
    Ambiguous(Vec<&'a Note>),
    /// No notes matched.
    NotFound,
}

/// Resolves a note identifier to a unique note.
///
/// Resolution order:
/// 1. Exact ID
/// 2. ID prefix (at least 4 characters)
/// 3. Title, ignoring case and surrounding whitespace
pub fn resolve_note<'a>(manager: &'a NotesManager, identifier: &str) -> ResolveResult<'a> {
    let identifier = identifier.trim();

    if let Some(note) = manager.notes().iter().find(|n| n.id().as_str() == identifier) {
        return ResolveResult::Unique(note);
    }

    let mut candidates: Vec<&Note> = Vec::new();
    if identifier.len() >= 4 {
        let upper = identifier.to_ascii_uppercase();
        candidates.extend(
            manager
                .notes()
                .iter()
                .filter(|n| n.id().as_str().to_ascii_uppercase().starts_with(&upper)),
        );
        // ID matches are the most precise
        if candidates.len() == 1 {
            return ResolveResult::Unique(candidates[0]);
        }
    }

    let wanted = identifier.to_lowercase();
    candidates.extend(
        manager
            .notes()
            .iter()
            .filter(|n| !wanted.is_empty() && n.title().trim().to_lowercase() == wanted),
    );
    candidates.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
    candidates.dedup_by(|a, b| a.id() == b.id());

    match candidates.len() {
        0 => ResolveResult::NotFound,
        1 => ResolveResult::Unique(candidates[0]),
        _ => ResolveResult::Ambiguous(candidates),
    }
}

/// Resolves a note or fails with a message listing the candidates.
pub(crate) fn require_note<'a>(manager: &'a NotesManager, identifier: &str) -> Result<&'a Note> {
    match resolve_note(manager, identifier) {
        ResolveResult::Unique(note) => Ok(note),
        ResolveResult::Ambiguous(notes) => {
            print_ambiguous_notes(identifier, &notes);
            bail!("ambiguous note identifier");
        }
        ResolveResult::NotFound => bail!("note not found: {}", identifier),
    }
}

/// Prints the ambiguous notes to help distinguish them.
fn print_ambiguous_notes(identifier: &str, notes: &[&Note]) {
    eprintln!("Ambiguous: '{}' matches {} notes:", identifier, notes.len());
    for note in notes {
        eprintln!("  {} - {}", note.id(), note.title());
    }
    eprintln!();
    eprintln!("Use the ID to specify which note you mean.");
}

/// Resolves a tag by exact ID, then by name ignoring case.
pub fn resolve_tag<'a>(manager: &'a NotesManager, identifier: &str) -> Option<&'a Tag> {
    let identifier = identifier.trim();
    manager
        .tags()
        .iter()
        .find(|t| t.id().as_str() == identifier)
        .or_else(|| manager.find_tag_by_name(identifier))
}

pub(crate) fn require_tag<'a>(manager: &'a NotesManager, identifier: &str) -> Result<&'a Tag> {
    match resolve_tag(manager, identifier) {
        Some(tag) => Ok(tag),
        None => bail!("tag not found: {}", identifier),
    }
}
