//! Path-plus-query locations and form encoding of query strings.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location is empty")]
    Empty,

    #[error("location '{0}' must start with '/'")]
    Relative(String),
}

/// A router location: an absolute path and an optional query string.
///
/// `search` is either empty or starts with `?`, and is kept exactly as given
/// so it can be carried across navigations unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    search: String,
}

impl Location {
    /// Parses `"/path?query"`. A fragment, if present, is dropped.
    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LocationError::Empty);
        }
        if !input.starts_with('/') {
            return Err(LocationError::Relative(input.to_string()));
        }
        let input = input.split_once('#').map_or(input, |(before, _)| before);
        let (path, search) = match input.find('?') {
            Some(at) => input.split_at(at),
            None => (input, ""),
        };
        let search = if search == "?" { "" } else { search };
        Ok(Self {
            path: path.to_string(),
            search: search.to_string(),
        })
    }

    /// The root location `/`.
    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            search: String::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query string including its leading `?`, or empty.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// First value of the query parameter `name`, decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        parse_query(&self.search)
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns `path` with this location's query string appended.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            search: self.search.clone(),
        }
    }

    /// Returns a copy with `name` set to `value`, or removed when `value` is
    /// `None`. Other parameters keep their order.
    pub fn with_query_param(&self, name: &str, value: Option<&str>) -> Self {
        let mut pairs = parse_query(&self.search);
        match value {
            Some(value) => match pairs.iter().position(|(key, _)| key == name) {
                Some(first) => {
                    pairs[first].1 = value.to_string();
                    let mut index = 0;
                    pairs.retain(|(key, _)| {
                        let keep = key != name || index == first;
                        index += 1;
                        keep
                    });
                }
                None => pairs.push((name.to_string(), value.to_string())),
            },
            None => pairs.retain(|(key, _)| key != name),
        }
        Self {
            path: self.path.clone(),
            search: serialize_query(&pairs),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.path, self.search)
    }
}

// ===========================================
// application/x-www-form-urlencoded
// ===========================================

/// Decodes `+` and `%XX`; malformed escapes are kept literally.
fn parse_query(search: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

fn serialize_query(pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("?{encoded}")
}
