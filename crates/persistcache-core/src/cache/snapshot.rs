//! Whole-file JSON snapshot codec.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{CacheError, Result};

pub type Document = Map<String, Value>;

/// Read a snapshot. A missing file is `Ok(None)`, not an error.
pub fn load_document(path: &Path) -> Result<Option<Document>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::read(path, e)),
    };

    let document: Value =
        serde_json::from_str(&contents).map_err(|e| CacheError::parse(path, e))?;

    match document {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(CacheError::NotAnObject(path.to_path_buf())),
    }
}

/// Overwrite the snapshot with `document`, pretty-printed. Missing parent
/// directories are created.
pub fn save_document(path: &Path, document: &Document) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CacheError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let contents = serde_json::to_string_pretty(document).map_err(CacheError::Serialize)?;
    std::fs::write(path, contents).map_err(|e| CacheError::write(path, e))?;
    Ok(())
}

/// Delete the snapshot if it exists as a regular file. Returns whether a
/// file was removed.
pub fn remove_document(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    std::fs::remove_file(path).map_err(|e| CacheError::Remove {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}
