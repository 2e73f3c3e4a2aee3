//! Core types: Note, Tag, and their ids

mod id;
mod note;
mod tag;

pub use id::{NoteId, ParseIdError, TagId};
pub use note::{MAX_CONTENT_LEN, MAX_TITLE_LEN, Note, NotePatch};
pub use tag::{MAX_TAG_NAME_LEN, ParseTagError, Tag, normalize_tag_name};
