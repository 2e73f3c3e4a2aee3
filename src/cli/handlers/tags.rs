//! Tag command handlers (tag, untag, tags).

use anyhow::{Context, Result, bail};
use serde::Serialize;

use super::notes::{NoteChanges, apply_changes, display_title};
use super::resolve::{require_note, require_tag};
use crate::cli::output::{OutputFormat, TagListing, print_json, truncate_str};
use crate::cli::session::Session;
use crate::cli::{TagArgs, TagsAction, TagsArgs, UntagArgs};
use crate::editor::EditSession;
use crate::i18n::Text;

pub fn handle_tag(args: &TagArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    let id = require_note(&session.manager, &args.note)?.id().clone();
    let changes = NoteChanges {
        tags: std::slice::from_ref(&args.tag),
        ..NoteChanges::default()
    };
    apply_changes(&mut session.manager, &id, &changes)?;

    let tag_name = session
        .manager
        .find_tag_by_name(&args.tag)
        .map(|t| t.name().to_string())
        .unwrap_or_else(|| args.tag.trim().to_string());
    let note = require_note(&session.manager, id.as_str())?;
    println!("Tagged '{}' with '{}'", display_title(note, session.language()), tag_name);
    Ok(())
}

pub fn handle_untag(args: &UntagArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    let note = require_note(&session.manager, &args.note)?;
    let note_id = note.id().clone();
    let tag = require_tag(&session.manager, &args.tag)?;
    if !note.has_tag(tag.id()) {
        bail!("note does not have tag '{}'", tag.name());
    }
    let (tag_id, tag_name) = (tag.id().clone(), tag.name().to_string());

    let edit = EditSession::open(&session.manager, &note_id)
        .with_context(|| format!("note not found: {}", note_id))?;
    edit.remove_tag(&mut session.manager, &tag_id);

    println!("Removed tag '{}' from {}", tag_name, note_id);
    Ok(())
}

/// Result of renaming or deleting a tag.
#[derive(Debug, Serialize)]
pub struct TagChange {
    pub id: String,
    pub name: String,
    /// Notes that referenced the tag.
    pub notes: usize,
}

pub fn handle_tags(args: &TagsArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    match &args.action {
        None => list_tags(args, session),
        Some(TagsAction::Rename { tag, name }) => {
            let id = require_tag(&session.manager, tag)?.id().clone();
            session
                .manager
                .update_tag(&id, name)
                .with_context(|| format!("invalid tag name '{}'", name))?;
            let renamed = require_tag(&session.manager, id.as_str())?;
            let change = TagChange {
                id: id.to_string(),
                name: renamed.name().to_string(),
                notes: session.manager.tag_usage(&id),
            };
            match args.format {
                OutputFormat::Human => println!("Renamed tag {} to '{}'", change.id, change.name),
                OutputFormat::Json => print_json(change)?,
            }
            Ok(())
        }
        Some(TagsAction::Rm { tag }) => {
            let tag = require_tag(&session.manager, tag)?;
            let change = TagChange {
                id: tag.id().to_string(),
                name: tag.name().to_string(),
                notes: session.manager.tag_usage(tag.id()),
            };
            let id = tag.id().clone();
            session.manager.delete_tag(&id);
            match args.format {
                OutputFormat::Human => println!(
                    "Deleted tag '{}' (removed from {} note(s))",
                    change.name, change.notes
                ),
                OutputFormat::Json => print_json(change)?,
            }
            Ok(())
        }
    }
}

fn list_tags(args: &TagsArgs, session: &Session) -> Result<()> {
    let manager = &session.manager;
    let listings: Vec<TagListing> = manager
        .tags()
        .iter()
        .map(|t| TagListing::new(t, manager))
        .collect();

    match args.format {
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No tags found.");
                return Ok(());
            }
            println!("{}:", session.language().text(Text::Tags));
            for listing in &listings {
                println!(
                    "  {:<30}  {:>5}  {}",
                    truncate_str(&listing.name, 30),
                    listing.count,
                    listing.id
                );
            }
        }
        OutputFormat::Json => print_json(listings)?,
    }
    Ok(())
}
