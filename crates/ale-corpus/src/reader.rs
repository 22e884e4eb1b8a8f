//! Reasoning-log loading for the corpus builder.
//!
//! The log is a single JSON array written by the ALE reasoning endpoint.
//! Anything that is not a readable JSON array is treated as "no events".

use std::io::ErrorKind;
use std::path::Path;

use ale_core::error::{AleError, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Load the reasoning events stored at `path`.
///
/// Returns an empty list when the file is missing, is not valid JSON, or
/// does not hold a top-level array. Other I/O failures are returned.
pub fn load_events(path: &Path) -> Result<Vec<Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Reasoning log {} not found, nothing to aggregate", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(AleError::FileRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(events)) => {
            debug!("Loaded {} events from {}", events.len(), path.display());
            Ok(events)
        }
        Ok(other) => {
            warn!(
                "Reasoning log {} holds a JSON {} instead of an array, ignoring it",
                path.display(),
                json_kind(&other)
            );
            Ok(Vec::new())
        }
        Err(e) => {
            warn!("Failed to parse reasoning log {}: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
