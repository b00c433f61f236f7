mod path;
mod request;

pub use path::*;
pub use request::*;

use serde::ser::SerializeMap;
use std::{borrow::Cow, fmt};

/// A position inside the GraphQL document, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl From<async_graphql_parser::Pos> for Location {
    fn from(pos: async_graphql_parser::Pos) -> Self {
        Location {
            line: pos.line,
            column: pos.column,
        }
    }
}

pub type GraphqlResult<T> = Result<T, GraphqlError>;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlError {
    pub message: Cow<'static, str>,
    pub locations: Vec<Location>,
    pub path: Option<ErrorPath>,
    // Serialized as a map, but kept as a Vec for efficiency.
    pub extensions: Vec<(Cow<'static, str>, serde_json::Value)>,
}

impl GraphqlError {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        GraphqlError {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.locations.push(location.into());
        self
    }

    #[must_use]
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations.extend(locations);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<ErrorPath>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_extension(mut self, key: impl Into<Cow<'static, str>>, value: impl Into<serde_json::Value>) -> Self {
        self.extensions.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GraphqlError {}

impl From<&'static str> for GraphqlError {
    fn from(message: &'static str) -> Self {
        GraphqlError::new(message)
    }
}

impl From<String> for GraphqlError {
    fn from(message: String) -> Self {
        GraphqlError::new(message)
    }
}

impl serde::Serialize for GraphqlError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("message", &self.message)?;

        if !self.locations.is_empty() {
            map.serialize_entry("locations", &self.locations)?;
        }

        if let Some(path) = &self.path {
            map.serialize_entry("path", path)?;
        }

        if !self.extensions.is_empty() {
            map.serialize_entry("extensions", &Extensions(&self.extensions))?;
        }

        map.end()
    }
}

struct Extensions<'a>(&'a [(Cow<'static, str>, serde_json::Value)]);

impl serde::Serialize for Extensions<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_only_present_fields() {
        let error = GraphqlError::new("Boom");
        insta::assert_json_snapshot!(error, @r###"
        {
          "message": "Boom"
        }
        "###);
    }

    #[test]
    fn serializes_locations_path_and_extensions() {
        let mut path = ErrorPath::default();
        path.push("users");
        path.push(0usize);
        path.push("name");

        let error = GraphqlError::new("Cannot read name")
            .with_location(Location::new(3, 7))
            .with_path(path)
            .with_extension("code", "INTERNAL");

        insta::assert_json_snapshot!(error, @r###"
        {
          "message": "Cannot read name",
          "locations": [
            {
              "line": 3,
              "column": 7
            }
          ],
          "path": [
            "users",
            0,
            "name"
          ],
          "extensions": {
            "code": "INTERNAL"
          }
        }
        "###);
    }
}
