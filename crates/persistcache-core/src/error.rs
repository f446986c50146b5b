use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cache file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache file {0} does not contain a JSON object")]
    NotAnObject(PathBuf),

    #[error("Failed to encode cached value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize cache snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove cache file {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn read(path: &Path, source: std::io::Error) -> Self {
        CacheError::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_json::Error) -> Self {
        CacheError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: std::io::Error) -> Self {
        CacheError::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file this error relates to, when there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            CacheError::Read { path, .. }
            | CacheError::Parse { path, .. }
            | CacheError::CreateDir { path, .. }
            | CacheError::Write { path, .. }
            | CacheError::Remove { path, .. } => Some(path),
            CacheError::NotAnObject(path) => Some(path),
            CacheError::Encode { .. } | CacheError::Serialize(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
