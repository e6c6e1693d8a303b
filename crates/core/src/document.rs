//! The generated API document.
//!
//! Facets are copied out of resolved schemas at build time so a document stays
//! self-contained after the resolver that produced it is gone. All maps are
//! ordered, which keeps serialized output stable across runs.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::location::SchemaLocation;
use crate::registry::ExampleValue;
use crate::resolver::SchemaRef;

/// Key under which a response's single example is stored.
pub const EXAMPLE_KEY: &str = "0";

/// Base values a service may set before any operation is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentInfo {
    /// API title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// API version string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Host (and optional port) serving the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Path prefix shared by every operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Transfer protocols, e.g. `http`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
}

/// Schema type: a single type or a list of types (for nullable values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// `"type": "object"`
    Single(String),
    /// `"type": ["string", "null"]`
    Multiple(Vec<String>),
}

impl SchemaType {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(single) => Some(SchemaType::Single(single.clone())),
            Value::Array(items) => Some(SchemaType::Multiple(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// Exclusive bound: a boolean flag (older dialects) or the bound itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    /// Modifies `minimum`/`maximum` to be exclusive.
    Flag(bool),
    /// The exclusive limit.
    Value(f64),
}

impl Bound {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Bound::Flag(*flag)),
            Value::Number(n) => n.as_f64().map(Bound::Value),
            _ => None,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// One operation input, with facets copied from its schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Declared type name.
    pub name: String,
    /// Reference to the full schema.
    pub schema: SchemaRef,
    /// Schema description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// True iff the schema lists at least one required field.
    pub required: bool,
    /// `uniqueItems`
    #[serde(skip_serializing_if = "is_false")]
    pub unique_items: bool,
    /// `exclusiveMinimum`
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_min: Option<Bound>,
    /// `exclusiveMaximum`
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub exclusive_max: Option<Bound>,
    /// `type`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// `format`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `enum`
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// `maxLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// `minLength`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// `pattern`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Parameter {
    /// Build a parameter named `name` from a resolved schema.
    pub fn from_schema(name: impl Into<String>, schema: &SchemaRef) -> Self {
        let value = schema.value();
        let str_facet = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            name: name.into(),
            schema: schema.clone(),
            description: str_facet("description"),
            required: value
                .get("required")
                .and_then(Value::as_array)
                .is_some_and(|fields| !fields.is_empty()),
            unique_items: value
                .get("uniqueItems")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            exclusive_min: value.get("exclusiveMinimum").and_then(Bound::from_value),
            exclusive_max: value.get("exclusiveMaximum").and_then(Bound::from_value),
            schema_type: value.get("type").and_then(SchemaType::from_value),
            format: str_facet("format"),
            enum_values: value.get("enum").and_then(Value::as_array).cloned(),
            max_length: value.get("maxLength").and_then(Value::as_u64),
            min_length: value.get("minLength").and_then(Value::as_u64),
            pattern: str_facet("pattern"),
        }
    }
}

/// One operation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Schema description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reference to the full schema.
    pub schema: SchemaRef,
    /// Example values keyed by [`EXAMPLE_KEY`].
    pub examples: BTreeMap<String, ExampleValue>,
}

impl Response {
    /// Build a response from a resolved schema and its registered example.
    pub fn from_schema(schema: &SchemaRef, example: ExampleValue) -> Self {
        Self {
            description: schema
                .value()
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            schema: schema.clone(),
            examples: BTreeMap::from([(EXAMPLE_KEY.to_string(), example)]),
        }
    }
}

/// A documented operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Operation {
    /// Inputs in signature order.
    pub parameters: Vec<Parameter>,
    /// Outputs keyed by declared type name.
    pub responses: BTreeMap<String, Response>,
}

/// Operations by method, for one path.
pub type PathItem = BTreeMap<String, Operation>;

/// The full API document.
///
/// Serializes as a Swagger 2.0 object: `info` holds title, description and
/// version, while host, base path and schemes sit at the top level. The
/// schema table is written at [`Document::location`], so every `$ref` a
/// resolver with the same location handed out resolves inside the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Base values.
    pub info: DocumentInfo,
    /// Operations by path, then by method.
    pub paths: BTreeMap<String, PathItem>,
    /// One schema per documented type name.
    pub schemas: BTreeMap<String, SchemaRef>,
    /// Where the schema table is written.
    pub location: SchemaLocation,
}

/// Swagger version written to every document.
pub const SWAGGER_VERSION: &str = "2.0";

#[derive(Serialize)]
struct InfoObject<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

/// Schema table nested under the remaining location segments.
struct SchemaTable<'a> {
    segments: &'a [String],
    schemas: &'a BTreeMap<String, SchemaRef>,
}

impl Serialize for SchemaTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.segments.split_first() {
            Some((head, rest)) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    head,
                    &SchemaTable {
                        segments: rest,
                        schemas: self.schemas,
                    },
                )?;
                map.end()
            }
            None => {
                let mut map = serializer.serialize_map(Some(self.schemas.len()))?;
                for (name, schema) in self.schemas {
                    map.serialize_entry(name, schema.value())?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let info = &self.info;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("swagger", SWAGGER_VERSION)?;
        map.serialize_entry(
            "info",
            &InfoObject {
                title: info.title.as_deref(),
                description: info.description.as_deref(),
                version: info.version.as_deref(),
            },
        )?;
        if let Some(host) = &info.host {
            map.serialize_entry("host", host)?;
        }
        if let Some(base_path) = &info.base_path {
            map.serialize_entry("basePath", base_path)?;
        }
        if !info.schemes.is_empty() {
            map.serialize_entry("schemes", &info.schemes)?;
        }
        map.serialize_entry("paths", &self.paths)?;
        if let Some((head, rest)) = self.location.segments().split_first() {
            map.serialize_entry(
                head,
                &SchemaTable {
                    segments: rest,
                    schemas: &self.schemas,
                },
            )?;
        }
        map.end()
    }
}

impl Document {
    /// Empty document carrying `info`.
    pub fn new(info: DocumentInfo) -> Self {
        Self {
            info,
            paths: BTreeMap::new(),
            schemas: BTreeMap::new(),
            location: SchemaLocation::default(),
        }
    }

    /// Place `operation` at `path` + `method`.
    ///
    /// Returns the operation previously stored in that slot, if any.
    pub fn insert_operation(
        &mut self,
        path: impl Into<String>,
        method: impl Into<String>,
        operation: Operation,
    ) -> Option<Operation> {
        self.paths
            .entry(path.into())
            .or_default()
            .insert(method.into(), operation)
    }

    /// Operation stored at `path` + `method`.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }

    /// Total number of (path, method) slots filled.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(BTreeMap::len).sum()
    }

    /// Record `schema` under `name`, replacing any previous entry.
    pub fn register_schema(&mut self, name: impl Into<String>, schema: SchemaRef) {
        self.schemas.insert(name.into(), schema);
    }
}
