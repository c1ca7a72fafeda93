use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to unlock `{path}`: {message}")]
pub struct UnlockError {
    pub path: PathBuf,
    pub message: String,
}

impl UnlockError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Turns a protected document into a readable workbook before it is parsed.
///
/// Document-protection products hook in here. Implementations receive the raw file bytes
/// and return readable workbook bytes.
pub trait DocumentUnlocker {
    fn unlock(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, UnlockError>;
}

/// Returns the bytes unchanged, for documents that are not protected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl DocumentUnlocker for PassThrough {
    fn unlock(&self, _path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, UnlockError> {
        Ok(bytes)
    }
}

impl<F> DocumentUnlocker for F
where
    F: Fn(&Path, Vec<u8>) -> Result<Vec<u8>, UnlockError>,
{
    fn unlock(&self, path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>, UnlockError> {
        self(path, bytes)
    }
}
