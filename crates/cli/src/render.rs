use std::fs;
use std::io::{self, Write};
use std::path::Path;

use apidoc_core::Document;
use clap::ValueEnum;

use crate::error::CliError;

/// Output encodings.
#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
#[value(rename_all = "lower")]
pub enum Format {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Encode `document` as text.
pub fn encode(document: &Document, format: Format) -> Result<String, CliError> {
    let mut text = match format {
        Format::Json => serde_json::to_string_pretty(document)?,
        Format::Yaml => serde_yaml::to_string(document)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Write `text` to `output`, or to stdout when no file is given.
pub fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, text).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .map_err(|source| CliError::Write {
                path: "<stdout>".into(),
                source,
            }),
    }
}
