//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;
pub mod session;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::settings::Language;
use output::OutputFormat;

/// notes - tagged notes stored locally or in a directory you choose
#[derive(Parser, Debug)]
#[command(name = "notes", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the local store (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new note
    New(NewArgs),

    /// Show a note
    Show(ShowArgs),

    /// Change a note's title or content
    Edit(EditArgs),

    /// Delete a note
    Rm(NoteArgs),

    /// Archive a note
    Archive(NoteArgs),

    /// Move a note out of the archive
    Unarchive(NoteArgs),

    /// Add a tag to a note, creating the tag if needed
    Tag(TagArgs),

    /// Remove a tag from a note
    Untag(UntagArgs),

    /// List, rename, or delete tags
    Tags(TagsArgs),

    /// List notes for a location such as /archived or /tags/<id>?q=text
    #[command(name = "ls")]
    List(ListArgs),

    /// Choose where notes are stored
    Storage(StorageArgs),

    /// Show or set the display language
    Lang(LangArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title
    #[arg(long)]
    pub title: Option<String>,

    /// Note content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Tag for the note (can be specified multiple times)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `edit` command
#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New content
    #[arg(short, long)]
    pub content: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for commands that take a single note
#[derive(Parser, Debug)]
pub struct NoteArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tag` command (add tag to note)
#[derive(Parser, Debug)]
pub struct TagArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// Tag name
    pub tag: String,
}

/// Arguments for the `untag` command (remove tag from note)
#[derive(Parser, Debug)]
pub struct UntagArgs {
    /// Note ID, ID prefix, or title
    pub note: String,

    /// Tag ID or name
    pub tag: String,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub action: Option<TagsAction>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum TagsAction {
    /// Rename a tag
    Rename {
        /// Tag ID or name
        tag: String,
        /// New name
        name: String,
    },

    /// Delete a tag and remove it from every note
    Rm {
        /// Tag ID or name
        tag: String,
    },
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Location to list, e.g. `/`, `/archived`, `/tags/<id>?q=apple`
    #[arg(default_value = "/")]
    pub location: String,

    /// Switch to the archived view
    #[arg(short = 'a', long)]
    pub archived: bool,

    /// Filter by tag ID or name
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Search text (replaces any `q` in the location)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `storage` command
#[derive(Parser, Debug)]
pub struct StorageArgs {
    #[command(subcommand)]
    pub action: StorageAction,
}

#[derive(Subcommand, Debug)]
pub enum StorageAction {
    /// Store notes in the local store
    Local,

    /// Store notes as JSON files in a directory
    Files {
        /// Directory to use (created on first write access)
        dir: PathBuf,
    },

    /// Grant write access to the selected directory
    Grant,

    /// Show the storage mode and access state
    Status {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },
}

/// Arguments for the `lang` command
#[derive(Parser, Debug)]
pub struct LangArgs {
    /// Language to switch to (en or pt)
    pub language: Option<Language>,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
