//! Where schemas live inside a document.
//!
//! A location is a reference prefix such as `#/definitions/`. The same value
//! decides the `$ref` strings handed out by a resolver, the definitions path
//! used when deriving nested schemas, and the place the document serializes
//! its schema table to, so every reference in a document resolves.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LocationError;

/// Default prefix for schema references.
pub const DEFAULT_REFERENCE_PREFIX: &str = "#/definitions/";

/// Top-level document keys a schema location must not shadow.
const DOCUMENT_KEYS: &[&str] = &["swagger", "info", "host", "basePath", "schemes", "paths"];

/// A validated reference prefix: `#/` followed by one or more `/`-terminated segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaLocation {
    prefix: String,
    segments: Vec<String>,
}

impl SchemaLocation {
    /// Parse a reference prefix such as `#/components/schemas/`.
    pub fn parse(prefix: &str) -> Result<Self, LocationError> {
        let invalid = |reason: &'static str| LocationError {
            prefix: prefix.to_string(),
            reason,
        };

        let body = prefix
            .strip_prefix("#/")
            .ok_or_else(|| invalid("must start with `#/`"))?;
        let body = body
            .strip_suffix('/')
            .ok_or_else(|| invalid("must end with `/`"))?;
        let segments: Vec<String> = body.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(invalid("contains an empty segment"));
        }
        if segments.iter().any(|segment| segment.contains('~')) {
            return Err(invalid("contains an escaped segment"));
        }
        if DOCUMENT_KEYS.contains(&segments[0].as_str()) {
            return Err(invalid("collides with a top-level document key"));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            segments,
        })
    }

    /// The prefix, e.g. `#/definitions/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Path segments below the document root, e.g. `["components", "schemas"]`.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Reference string for the schema named `name`.
    pub fn reference(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// Remove the definitions nested at this location inside a root schema.
    pub(crate) fn take_definitions(&self, root: &mut Map<String, Value>) -> BTreeMap<String, Value> {
        let Some((head, rest)) = self.segments.split_first() else {
            return BTreeMap::new();
        };
        let Some(mut node) = root.remove(head) else {
            return BTreeMap::new();
        };
        for segment in rest {
            node = match node {
                Value::Object(mut map) => match map.remove(segment) {
                    Some(next) => next,
                    None => return BTreeMap::new(),
                },
                _ => return BTreeMap::new(),
            };
        }
        match node {
            Value::Object(map) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}

impl Default for SchemaLocation {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            segments: vec!["definitions".to_string()],
        }
    }
}

impl TryFrom<String> for SchemaLocation {
    type Error = LocationError;

    fn try_from(prefix: String) -> Result<Self, Self::Error> {
        Self::parse(&prefix)
    }
}

impl From<SchemaLocation> for String {
    fn from(location: SchemaLocation) -> Self {
        location.prefix
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}
