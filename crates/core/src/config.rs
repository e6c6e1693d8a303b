//! Generator configuration, loaded from TOML.
//!
//! ```toml
//! default_method = "GET"
//! path_prefix = "happy/"
//! reference_prefix = "#/definitions/"
//! dialect = "draft07"
//!
//! [info]
//! title = "Happy API"
//! host = "localhost"
//! schemes = ["http"]
//!
//! [overrides]
//! BlockHeaderAsString = { method = "POST", path = "postBHaS" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentInfo};
use crate::error::ConfigError;
use crate::placement::MethodOverrides;
use crate::location::SchemaLocation;
use crate::resolver::{SchemaDialect, SchemarsResolver};

const DEFAULT_METHOD: &str = "GET";

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Method for operations without an override.
    #[serde(default = "default_method")]
    pub default_method: String,
    /// Default path is this prefix followed by the operation name.
    #[serde(default)]
    pub path_prefix: String,
    /// Where schemas are placed and referenced, e.g. `#/definitions/`.
    #[serde(default)]
    pub reference_prefix: SchemaLocation,
    /// Schema flavour.
    #[serde(default)]
    pub dialect: SchemaDialect,
    /// Base document values.
    #[serde(default)]
    pub info: DocumentInfo,
    /// Placement overrides, merged over any the service declares.
    #[serde(default)]
    pub overrides: MethodOverrides,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_method: default_method(),
            path_prefix: String::new(),
            reference_prefix: SchemaLocation::default(),
            dialect: SchemaDialect::default(),
            info: DocumentInfo::default(),
            overrides: MethodOverrides::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Fresh resolver with this config's dialect and schema location.
    pub fn resolver(&self) -> SchemarsResolver {
        SchemarsResolver::with_location(self.dialect, self.reference_prefix.clone())
    }

    /// Default method for `operation`.
    pub fn default_method_for(&self, _operation: &str) -> String {
        self.default_method.clone()
    }

    /// Default path for `operation`.
    pub fn default_path_for(&self, operation: &str) -> String {
        format!("{}{operation}", self.path_prefix)
    }

    /// Empty document carrying the configured info block and schema location.
    pub fn base_document(&self) -> Document {
        let mut document = Document::new(self.info.clone());
        document.location = self.reference_prefix.clone();
        document
    }
}
