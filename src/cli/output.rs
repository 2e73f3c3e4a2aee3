//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::{Note, Tag};
use crate::manager::NotesManager;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Prints `data` wrapped in [`Output`] as pretty JSON.
pub fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&Output::new(data))?);
    Ok(())
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub last_edited: String,
    pub is_archived: bool,
}

impl NoteListing {
    /// Builds a listing with tag names resolved through `manager`.
    pub fn new(note: &Note, manager: &NotesManager) -> Self {
        Self {
            id: note.id().to_string(),
            title: note.title().to_string(),
            tags: note
                .tags()
                .iter()
                .map(|id| manager.tag_name(id).to_string())
                .collect(),
            last_edited: note
                .last_edited()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            is_archived: note.is_archived(),
        }
    }
}

/// A tag with its usage count.
#[derive(Debug, Serialize)]
pub struct TagListing {
    pub id: String,
    pub name: String,
    pub count: usize,
}

impl TagListing {
    pub fn new(tag: &Tag, manager: &NotesManager) -> Self {
        Self {
            id: tag.id().to_string(),
            name: tag.name().to_string(),
            count: manager.tag_usage(tag.id()),
        }
    }
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
