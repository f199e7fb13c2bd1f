//! File writing for generated sources and snapshots.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HsgenError, Result};

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes content to a file atomically using temp file + rename.
///
/// Parent directories are created as needed and an existing file is
/// replaced unconditionally.
///
/// ## Errors
///
/// Returns [`HsgenError::Io`] if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| HsgenError::io(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content).map_err(|e| HsgenError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| HsgenError::io(path, e))?;

    Ok(())
}
