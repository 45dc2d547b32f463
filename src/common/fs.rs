//! File system helpers

use std::fs;
use std::path::Path;

use super::error::Result;

/// Check that a path points at an existing directory
///
/// An empty path is never a directory.
pub fn is_existing_dir(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_dir()
}

/// Read a file as raw bytes
///
/// Decoding is left to the caller so that it can retry with other encodings.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}
