//! Rendered preview documents.
//!
//! A preview is written to its own file and owned by exactly one
//! [`PreviewDocument`]. Dropping the handle deletes the file, so replacing
//! or dismissing a preview releases it.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use paperdesk_core::error::Result;

#[derive(Debug)]
pub struct PreviewDocument {
    path: PathBuf,
    len: usize,
}

impl PreviewDocument {
    /// Write rendered bytes to a fresh file under `dir`.
    pub fn write(dir: &Path, bytes: &[u8]) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("preview-{}.pdf", Uuid::new_v4()));
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Preview written");
        Ok(Self {
            path,
            len: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the preview somewhere the user chose. The handle keeps ownership of its own file.
    pub fn persist(&self, dest: &Path) -> Result<u64> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(std::fs::copy(&self.path, dest)?)
    }
}

impl Drop for PreviewDocument {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Preview released"),
            Err(e) => warn!(path = %self.path.display(), "Failed to release preview: {}", e),
        }
    }
}
