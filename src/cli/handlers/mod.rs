//! Command handlers for the CLI.

mod list;
mod notes;
mod resolve;
mod storage;
mod tags;


use anyhow::Result;
use clap::CommandFactory;
use std::io;

use super::{Cli, CompletionsArgs};

// Re-export public items
pub use list::{ListResult, handle_list, list_notes};
pub use notes::{
    handle_archive, handle_edit, handle_new, handle_rm, handle_show, handle_unarchive,
};
pub use resolve::{ResolveResult, resolve_note, resolve_tag};
pub use storage::{PathPicker, handle_lang, handle_storage};
pub use tags::{handle_tag, handle_tags, handle_untag};

pub fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "notes", &mut io::stdout());
    Ok(())
}
