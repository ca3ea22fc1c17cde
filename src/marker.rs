// src/marker.rs

//! The marker file watched by the devtools agent.
//!
//! Only the file's existence and modification time matter; its content is
//! never written or read.

use std::path::Path;

use tracing::info;

use crate::errors::{DevsyncError, Result};
use crate::fs::FileSystem;

/// Create `path` empty if missing, otherwise bump its modification time.
pub fn touch(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    if fs.exists(path) {
        fs.set_modified_now(path).map_err(|e| io_error(path, e))?;
        info!(marker = ?path, "touched trigger file");
    } else {
        fs.create_empty(path).map_err(|e| io_error(path, e))?;
        info!(marker = ?path, "created trigger file");
    }
    Ok(())
}

/// Keep I/O failures classified as such even when they arrive wrapped.
fn io_error(path: &Path, err: anyhow::Error) -> DevsyncError {
    match err.downcast::<std::io::Error>() {
        Ok(io) => DevsyncError::IoError(std::io::Error::new(io.kind(), format!("{path:?}: {io}"))),
        Err(other) => DevsyncError::Other(other),
    }
}
