//! Pretty-printed JSON output shared by both tools.

use std::path::Path;

use serde::Serialize;

use crate::error::{AleError, Result};

/// Serialize `value` as 2-space indented JSON and write it to `path`,
/// creating parent directories and replacing any existing file.
///
/// The document is written to a sibling temp file first and then renamed
/// over the target, so readers never observe a half-written file.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| AleError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|source| AleError::FileWrite {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| AleError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
