//! Error types for registry, schema resolution, configuration and generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::{TypeKey, TypeKind};
use crate::document::Document;

/// Failure to register an example value.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The example could not be encoded as JSON.
    #[error("Failed to encode example for `{key}`: {source}")]
    Encode {
        /// Type whose example failed.
        key: TypeKey,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// A reference prefix that cannot name a place in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid schema location `{prefix}`: {reason}")]
pub struct LocationError {
    /// The rejected prefix.
    pub prefix: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

/// Failure inside a schema resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The descriptor carries no derivation function.
    #[error("No schema derivation available for `{name}` ({key})")]
    Underivable {
        /// Declared name of the type.
        name: String,
        /// Identity key of the type.
        key: TypeKey,
    },
    /// The derived root schema is a bare `true`/`false` schema.
    #[error("Schema for `{name}` is not an object schema")]
    NotAnObject {
        /// Declared name of the type.
        name: String,
    },
    /// The derived schema could not be turned into JSON.
    #[error("Failed to encode schema for `{name}`: {source}")]
    Encode {
        /// Declared name of the type.
        name: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A shared resolver's lock was poisoned by a panicking holder.
    #[error("Schema cache lock poisoned")]
    Poisoned,
}

/// Fatal condition hit while documenting one operation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A named, registered type has no serializable shape.
    #[error("Unsupported {kind} type `{type_name}` in operation `{operation}`")]
    Unsupported {
        /// Operation being documented.
        operation: String,
        /// Declared name of the offending type.
        type_name: String,
        /// Its kind.
        kind: TypeKind,
    },
    /// The schema resolver failed.
    #[error("Failed to resolve `{type_name}` in operation `{operation}`: {source}")]
    Resolve {
        /// Operation being documented.
        operation: String,
        /// Declared name of the type being resolved.
        type_name: String,
        /// Resolver error.
        #[source]
        source: ResolveError,
    },
    /// The document being merged into keeps its schemas somewhere else.
    #[error("Document keeps schemas at `{document}` but the resolver references `{resolver}`")]
    LocationMismatch {
        /// Location of the existing document's schemas.
        document: String,
        /// Location the resolver hands out references for.
        resolver: String,
    },
}

impl GenerateError {
    /// Name of the operation that failed, if the failure belongs to one.
    pub fn operation(&self) -> Option<&str> {
        match self {
            GenerateError::Unsupported { operation, .. } | GenerateError::Resolve { operation, .. } => {
                Some(operation)
            }
            GenerateError::LocationMismatch { .. } => None,
        }
    }
}

/// A failed generation run.
///
/// Carries whatever had been assembled before the failure. The partial
/// document is for diagnostics only and must not be treated as complete.
#[derive(Debug, Error)]
#[error("Document generation failed")]
pub struct GenerateFailure {
    /// The fatal error that stopped the run.
    #[source]
    pub error: GenerateError,
    /// Operations and schemas assembled before the failure.
    pub partial: Box<Document>,
}

impl GenerateFailure {
    /// Split into the error and the partial document.
    pub fn into_parts(self) -> (GenerateError, Document) {
        (self.error, *self.partial)
    }
}

/// Failure to load generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config text is not valid.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
