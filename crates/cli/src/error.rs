use std::path::PathBuf;

use fgd_core::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("input '{0}' does not exist")]
    MissingInput(PathBuf),

    #[error("{path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            CliError::Parse { path, source } => {
                let mut v = source.to_json_value();
                v["file"] = serde_json::json!(path.display().to_string());
                v
            }
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}
