//! Opaque string identifiers for notes and tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an invalid identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    value: String,
    reason: &'static str,
}

impl ParseIdError {
    /// Returns the invalid value that caused this error.
    pub fn invalid_value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid id '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

fn check_id(s: &str) -> Result<(), ParseIdError> {
    let reason = if s.trim().is_empty() {
        "id cannot be empty"
    } else if s.contains('/') {
        "id cannot contain '/'"
    } else {
        return Ok(());
    };
    Err(ParseIdError {
        value: s.to_string(),
        reason,
    })
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh identifier (a ULID rendered as 26 characters).
            pub fn new() -> Self {
                Self(Ulid::new().to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(\"{}\")", stringify!($name), self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                check_id(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_id! {
    /// Identifier of a note.
    ///
    /// Fresh ids are ULIDs; ids read from storage may be any non-empty string
    /// without a `/` (other clients write UUIDs), so the value is kept opaque.
    ///
    /// ```
    /// use notekeep::domain::NoteId;
    ///
    /// let id: NoteId = "3f2b8c1e-4d5a-4b6c-9e7f-0a1b2c3d4e5f".parse().unwrap();
    /// assert_eq!(id.as_str(), "3f2b8c1e-4d5a-4b6c-9e7f-0a1b2c3d4e5f");
    /// assert_eq!(NoteId::new().as_str().len(), 26);
    /// ```
    NoteId
}

string_id! {
    /// Identifier of a tag.
    TagId
}
