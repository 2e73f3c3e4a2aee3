//! List command handler.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use serde::Serialize;

use super::notes::display_title;
use super::resolve::require_tag;
use crate::cli::ListArgs;
use crate::cli::output::{NoteListing, OutputFormat, print_json, truncate_str};
use crate::cli::session::Session;
use crate::i18n::{Text, format_last_edited};
use crate::manager::NotesManager;
use crate::nav::{Location, MemoryRouter, NavState, Navigator, View};
use crate::view::filtered_notes;

/// The listing for a location: the derived state and the notes it shows.
#[derive(Debug, Serialize)]
pub struct ListResult {
    pub location: String,
    pub state: NavState,
    pub notes: Vec<NoteListing>,
}

/// Resolves the location and flags of `ls` into a navigation state and the
/// filtered notes for it.
pub fn list_notes(args: &ListArgs, manager: &NotesManager) -> Result<ListResult> {
    let start = Location::parse(&args.location)
        .with_context(|| format!("invalid location '{}'", args.location))?;
    let mut navigator = Navigator::new(MemoryRouter::new(start));

    if args.archived {
        navigator.set_view(View::Archived);
    }
    if let Some(tag) = &args.tag {
        let id = require_tag(manager, tag)?.id().clone();
        navigator.set_selected_tag_id(Some(&id));
    }
    if let Some(query) = &args.query {
        navigator.set_search_query(query);
    }

    let state = navigator.state();
    let notes = filtered_notes(manager.notes(), &state)
        .into_iter()
        .map(|n| NoteListing::new(n, manager))
        .collect();
    Ok(ListResult {
        location: navigator.location().to_string(),
        state,
        notes,
    })
}

pub fn handle_list(args: &ListArgs, session: &mut Session) -> Result<()> {
    session.require_ready()?;
    let manager = &session.manager;
    let language = session.language();
    let result = list_notes(args, manager)?;

    match args.format {
        OutputFormat::Human => {
            let heading = match result.state.view {
                View::All => language.text(Text::AllNotes),
                View::Archived => language.text(Text::ArchivedNotes),
            };
            match &result.state.selected_tag_id {
                Some(tag) => println!("{} · #{}", heading, manager.tag_name(tag)),
                None => println!("{}", heading),
            }
            if !result.state.search_query.is_empty() {
                println!("q: {}", result.state.search_query);
            }
            println!();

            if result.notes.is_empty() {
                println!("{}.", language.text(Text::NoNotes));
                return Ok(());
            }

            let now = Utc::now();
            for listing in &result.notes {
                let Some(note) = manager.notes().iter().find(|n| n.id().as_str() == listing.id)
                else {
                    continue;
                };
                let title = truncate_str(&display_title(note, language), 40);
                let edited = format_last_edited(note.last_edited(), now, language, &Local);
                println!("{:<26}  {:<40}  {}", listing.id, title, edited);
            }
            println!();
            println!("{} note(s)", result.notes.len());
        }
        OutputFormat::Json => print_json(result)?,
    }

    Ok(())
}
