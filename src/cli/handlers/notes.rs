//! Note command handlers (new, show, edit, rm, archive, unarchive).

use anyhow::{Context, Result, bail};
use chrono::{Local, Utc};
use serde::Serialize;

use super::resolve::require_note;
use crate::cli::output::{NoteListing, OutputFormat, print_json};
use crate::cli::session::Session;
use crate::cli::{EditArgs, NewArgs, NoteArgs, ShowArgs};
use crate::domain::{Note, NoteId};
use crate::editor::EditSession;
use crate::i18n::{Text, format_last_edited};
use crate::manager::NotesManager;
use crate::nav::{MemoryRouter, Navigator};
use crate::settings::Language;

/// A note with its content, for `show` and `edit` output.
#[derive(Debug, Serialize)]
pub struct NoteDetail {
    #[serde(flatten)]
    pub listing: NoteListing,
    pub content: String,
}

impl NoteDetail {
    pub fn new(note: &Note, manager: &NotesManager) -> Self {
        Self {
            listing: NoteListing::new(note, manager),
            content: note.content().to_string(),
        }
    }
}

/// Changes requested for a note by `new` or `edit`.
#[derive(Debug, Default)]
pub(crate) struct NoteChanges<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a str>,
    pub tags: &'a [String],
}

/// Applies `changes` to `id` through an edit session and closes it.
pub(crate) fn apply_changes(
    manager: &mut NotesManager,
    id: &NoteId,
    changes: &NoteChanges<'_>,
) -> Result<()> {
    let mut navigator = Navigator::new(MemoryRouter::default());
    navigator.set_active_note_id(Some(id));
    let Some(edit) = EditSession::for_active_note(manager, &navigator) else {
        bail!("note not found: {}", id);
    };

    if let Some(title) = changes.title {
        edit.update_title(manager, title);
    }
    if let Some(content) = changes.content {
        edit.update_content(manager, content);
    }
    for name in changes.tags {
        edit.add_tag(manager, name)
            .with_context(|| format!("invalid tag '{}'", name))?;
    }
    edit.save(&mut navigator);
    Ok(())
}

pub fn handle_new(args: &NewArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    let id = session.manager.create_note().id().clone();
    let changes = NoteChanges {
        title: args.title.as_deref(),
        content: args.content.as_deref(),
        tags: &args.tags,
    };
    apply_changes(&mut session.manager, &id, &changes)?;

    let note = session
        .manager
        .note(&id)
        .with_context(|| format!("note vanished after creation: {}", id))?;
    match args.format {
        OutputFormat::Human => {
            println!("Created: {}", display_title(note, session.language()));
            println!("ID: {}", note.id());
        }
        OutputFormat::Json => print_json(NoteDetail::new(note, &session.manager))?,
    }
    Ok(())
}

pub fn handle_show(args: &ShowArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    let manager = &session.manager;
    let note = require_note(manager, &args.note)?;

    match args.format {
        OutputFormat::Human => print_note(note, manager, session.language()),
        OutputFormat::Json => print_json(NoteDetail::new(note, manager))?,
    }
    Ok(())
}

pub fn handle_edit(args: &EditArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    if args.title.is_none() && args.content.is_none() {
        bail!("nothing to change; pass --title and/or --content");
    }
    let id = require_note(&session.manager, &args.note)?.id().clone();
    let changes = NoteChanges {
        title: args.title.as_deref(),
        content: args.content.as_deref(),
        tags: &[],
    };
    apply_changes(&mut session.manager, &id, &changes)?;

    let manager = &session.manager;
    let note = require_note(manager, id.as_str())?;
    match args.format {
        OutputFormat::Human => println!("Updated: {}", display_title(note, session.language())),
        OutputFormat::Json => print_json(NoteDetail::new(note, manager))?,
    }
    Ok(())
}

/// Result of deleting a note.
#[derive(Debug, Serialize)]
pub struct RemoveResult {
    pub id: String,
    pub title: String,
}

pub fn handle_rm(args: &NoteArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    let note = require_note(&session.manager, &args.note)?;
    let result = RemoveResult {
        id: note.id().to_string(),
        title: note.title().to_string(),
    };
    let id = note.id().clone();
    session.manager.delete_note(&id);

    match args.format {
        OutputFormat::Human => println!("Deleted '{}' [{}]", result.title, result.id),
        OutputFormat::Json => print_json(result)?,
    }
    Ok(())
}

pub fn handle_archive(args: &NoteArgs, session: &mut Session) -> Result<()> {
    set_archived(args, session, true)
}

pub fn handle_unarchive(args: &NoteArgs, session: &mut Session) -> Result<()> {
    set_archived(args, session, false)
}

fn set_archived(args: &NoteArgs, session: &mut Session, archived: bool) -> Result<()> {
    session.require_ready()?;
    let language = session.language();
    let id = require_note(&session.manager, &args.note)?.id().clone();
    let updated = if archived {
        session.manager.archive_note(&id)
    } else {
        session.manager.unarchive_note(&id)
    };
    let note = updated.with_context(|| format!("note not found: {}", id))?;
    let title = display_title(note, language);

    match args.format {
        OutputFormat::Human => {
            let verb = if archived { "Archived" } else { "Unarchived" };
            println!("{} '{}' [{}]", verb, title, id);
        }
        OutputFormat::Json => {
            let note = note.clone();
            print_json(NoteListing::new(&note, &session.manager))?
        }
    }
    Ok(())
}

/// The note's title, or the translated placeholder when it has none.
pub(crate) fn display_title(note: &Note, language: Language) -> String {
    if note.title().trim().is_empty() {
        language.text(Text::Untitled).to_string()
    } else {
        note.title().to_string()
    }
}

fn print_note(note: &Note, manager: &NotesManager, language: Language) {
    println!("# {}", display_title(note, language));
    println!("ID: {}", note.id());
    if !note.tags().is_empty() {
        let names: Vec<&str> = note.tags().iter().map(|t| manager.tag_name(t)).collect();
        println!("{}: {}", language.text(Text::Tags), names.join(", "));
    }
    println!(
        "{}: {}",
        language.text(Text::LastEdited),
        format_last_edited(note.last_edited(), Utc::now(), language, &Local)
    );
    if note.is_archived() {
        println!("[{}]", language.text(Text::ArchivedNotes));
    }
    if !note.content().is_empty() {
        println!();
        println!("{}", note.content());
    }
}
