//! Display strings and date formatting for the supported languages.

use crate::settings::Language;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// Translatable user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AllNotes,
    ArchivedNotes,
    Tags,
    LastEdited,
    MinutesAgo,
    NoNotes,
    Untitled,
    ConfirmDelete,
}

impl Language {
    pub fn text(self, key: Text) -> &'static str {
        match (self, key) {
            (Language::En, Text::AllNotes) => "All notes",
            (Language::En, Text::ArchivedNotes) => "Archived notes",
            (Language::En, Text::Tags) => "Tags",
            (Language::En, Text::LastEdited) => "Last edited",
            (Language::En, Text::MinutesAgo) => "minutes ago",
            (Language::En, Text::NoNotes) => "No notes found",
            (Language::En, Text::Untitled) => "Untitled",
            (Language::En, Text::ConfirmDelete) => "Are you sure you want to delete this note?",
            (Language::Pt, Text::AllNotes) => "Todas as notas",
            (Language::Pt, Text::ArchivedNotes) => "Notas arquivadas",
            (Language::Pt, Text::Tags) => "Tags",
            (Language::Pt, Text::LastEdited) => "Última edição",
            (Language::Pt, Text::MinutesAgo) => "minutos atrás",
            (Language::Pt, Text::NoNotes) => "Nenhuma nota encontrada",
            (Language::Pt, Text::Untitled) => "Sem título",
            (Language::Pt, Text::ConfirmDelete) => "Tem certeza que deseja excluir esta nota?",
        }
    }
}

/// Formats an edit timestamp relative to `now`, in the zone `tz`.
///
/// Within the last hour the result is a minute count ("5 minutes ago").
/// Older timestamps use the language's date layout: `MM/DD/YYYY, hh:mm AM`
/// for English, `DD/MM/YYYY, HH:mm` for Portuguese. Timestamps in the
/// future count as zero minutes.
pub fn format_last_edited<Tz>(
    edited: DateTime<Utc>,
    now: DateTime<Utc>,
    language: Language,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let minutes = (now - edited).num_minutes();
    if minutes < 60 {
        return format!("{} {}", minutes.max(0), language.text(Text::MinutesAgo));
    }
    let local = edited.with_timezone(tz);
    let pattern = match language {
        Language::En => "%m/%d/%Y, %I:%M %p",
        Language::Pt => "%d/%m/%Y, %H:%M",
    };
    local.format(pattern).to_string()
}
