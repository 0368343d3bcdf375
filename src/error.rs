// Error types for bindscope.
// Covers snapshot loading, state persistence, and terminal errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindscopeError {
    #[error("Snapshot not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),

    #[error("No snapshot given: pass --snapshot or set BINDSCOPE_SNAPSHOT")]
    NoSnapshot,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BindscopeError>;
