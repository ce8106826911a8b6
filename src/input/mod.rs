//! Response file loading and validation.
//!
//! Reads the JSON array of candidate responses and validates every
//! record before anything is handed to the aggregator.

use crate::models::ResponseRecord;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while reading the response file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("response file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read response file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("response file {} is not valid JSON: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("response file {} must contain a JSON array of records", .0.display())]
    NotAnArray(PathBuf),

    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

/// Load and validate all response records from `path`.
///
/// Fails on the first malformed record; no records are returned in that case.
pub fn load_records(path: &Path) -> Result<Vec<ResponseRecord>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
        _ => InputError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let records = parse_records(&content).map_err(|e| match e {
        ParseFailure::Json(source) => InputError::InvalidJson {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::NotAnArray => InputError::NotAnArray(path.to_path_buf()),
        ParseFailure::Record { index, reason } => InputError::MalformedRecord { index, reason },
    })?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

enum ParseFailure {
    Json(serde_json::Error),
    NotAnArray,
    Record { index: usize, reason: String },
}

fn parse_records(content: &str) -> Result<Vec<ResponseRecord>, ParseFailure> {
    let value: Value = serde_json::from_str(content).map_err(ParseFailure::Json)?;

    let Value::Array(items) = value else {
        return Err(ParseFailure::NotAnArray);
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(ParseFailure::Record {
                index,
                reason: "expected a JSON object".to_string(),
            });
        }

        let record: ResponseRecord =
            serde_json::from_value(item).map_err(|e| ParseFailure::Record {
                index,
                reason: e.to_string(),
            })?;

        if record.skills.is_empty() {
            warn!("Record #{} has no skills; it only contributes its title and categories", index);
        }

        records.push(record);
    }

    Ok(records)
}
