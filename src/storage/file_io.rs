//! File I/O utilities with atomic writes
//!
//! Used for the small JSON side files (settings, language preferences) and by
//! the local file transport for report artifacts. Writes go to a temp file in
//! the target directory and are renamed into place.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> LedgerResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LedgerError::Json(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Serialize `data` as pretty JSON and write it atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> LedgerResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let bytes = serde_json::to_vec_pretty(data)?;
    write_bytes_atomic(path, &bytes)
}

/// Write bytes to `path` so that the file is either fully written or untouched
pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> LedgerResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Io(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| LedgerError::Io(format!("Invalid file path {}", path.display())))?;
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = File::create(&temp_path)
        .map_err(|e| LedgerError::Io(format!("Failed to create temp file: {}", e)))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LedgerError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Io(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Absolute, symlink-resolved form of `path`
///
/// The file itself need not exist: when only its directory does, the
/// directory is resolved and the file name appended. Otherwise a relative
/// path is joined onto the current directory.
pub fn absolute_path(path: &Path) -> LedgerResult<PathBuf> {
    if let Ok(resolved) = fs::canonicalize(path) {
        return Ok(resolved);
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(resolved) = fs::canonicalize(parent) {
            return Ok(resolved.join(name));
        }
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| LedgerError::Io(format!("Failed to read current directory: {}", e)))?;
    Ok(cwd.join(path))
}
