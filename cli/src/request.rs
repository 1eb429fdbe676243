//! Input loading utilities.

use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// Error type for input loading.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to read stdin: {0}")]
    ReadStdin(#[source] io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse file (tried YAML and JSON)")]
    ParseFailed,
}

/// Reads text from a file, or from stdin when `path` is `-`.
pub fn read_input(path: &str) -> Result<String, RequestError> {
    if path == "-" {
        let mut data = String::new();
        io::stdin()
            .read_to_string(&mut data)
            .map_err(RequestError::ReadStdin)?;
        return Ok(data);
    }
    fs::read_to_string(path).map_err(|source| RequestError::ReadFile {
        path: path.to_string(),
        source,
    })
}

/// Loads a YAML or JSON file (or stdin with `-`) into the provided type.
pub fn load_request<T: DeserializeOwned>(path: &str) -> Result<T, RequestError> {
    let data = read_input(path)?;
    parse_request(data.as_bytes(), path)
}

/// Parses data based on file extension, trying YAML then JSON otherwise.
pub fn parse_request<T: DeserializeOwned>(
    data: &[u8],
    path: impl AsRef<Path>,
) -> Result<T, RequestError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => {
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            if let Ok(v) = serde_json::from_slice(data) {
                return Ok(v);
            }
            Err(RequestError::ParseFailed)
        }
    }
}
