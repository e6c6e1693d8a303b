use std::io;
use std::path::PathBuf;

use apidoc_core::{ConfigError, GenerateFailure, RegistryError};
use thiserror::Error;

/// Anything that stops the CLI from producing a document.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{}: {}", .0, .0.error)]
    Generate(#[from] GenerateFailure),

    #[error("Failed to encode document as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode document as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
