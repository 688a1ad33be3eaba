//! Local filesystem transport

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::FileTransport;
use crate::error::{LedgerError, LedgerResult};
use crate::storage::file_io::write_bytes_atomic;

/// Stores files on the local disk with atomic writes
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileTransport;

impl LocalFileTransport {
    pub fn new() -> Self {
        Self
    }
}

fn validate_filename(filename: &str) -> LedgerResult<()> {
    let trimmed = filename.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(LedgerError::Transport(format!(
            "Invalid file name '{}'",
            filename
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(LedgerError::Transport(format!(
            "File name '{}' must not contain path separators",
            filename
        )));
    }
    Ok(())
}

impl FileTransport for LocalFileTransport {
    fn save(&self, bytes: &[u8], directory: &Path, filename: &str) -> LedgerResult<PathBuf> {
        validate_filename(filename)?;
        let path = directory.join(filename);
        write_bytes_atomic(&path, bytes)
            .map_err(|e| LedgerError::Transport(format!("Failed to save {}: {}", path.display(), e)))?;
        debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    fn read(&self, path: &Path) -> LedgerResult<Vec<u8>> {
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::file_not_found(path.display().to_string()),
            _ => LedgerError::Transport(format!("Failed to read {}: {}", path.display(), e)),
        })
    }

    fn delete(&self, path: &Path) -> LedgerResult<()> {
        fs::remove_file(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::file_not_found(path.display().to_string()),
            _ => LedgerError::Transport(format!("Failed to delete {}: {}", path.display(), e)),
        })?;
        debug!("Deleted {}", path.display());
        Ok(())
    }

    fn list(&self, directory: &Path) -> LedgerResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LedgerError::Transport(format!(
                    "Failed to list {}: {}",
                    directory.display(),
                    e
                )))
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_read_delete() {
        let temp_dir = TempDir::new().unwrap();
        let transport = LocalFileTransport::new();
        let dir = temp_dir.path().join("reports");

        let path = transport.save(b"a,b\n1,2\n", &dir, "r.csv").unwrap();
        assert_eq!(path, dir.join("r.csv"));
        assert_eq!(transport.read(&path).unwrap(), b"a,b\n1,2\n");

        transport.delete(&path).unwrap();
        assert!(!path.exists());
        assert!(transport.delete(&path).unwrap_err().is_not_found());
        assert!(transport.read(&path).unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let transport = LocalFileTransport::new();

        transport.save(b"first", temp_dir.path(), "x.txt").unwrap();
        let path = transport.save(b"second", temp_dir.path(), "x.txt").unwrap();
        assert_eq!(transport.read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_rejects_bad_filenames() {
        let temp_dir = TempDir::new().unwrap();
        let transport = LocalFileTransport::new();

        assert!(transport.save(b"", temp_dir.path(), "").is_err());
        assert!(transport.save(b"", temp_dir.path(), "../escape.csv").is_err());
    }

    #[test]
    fn test_list() {
        let temp_dir = TempDir::new().unwrap();
        let transport = LocalFileTransport::new();

        assert!(transport
            .list(&temp_dir.path().join("missing"))
            .unwrap()
            .is_empty());

        transport.save(b"2", temp_dir.path(), "b.pdf").unwrap();
        transport.save(b"1", temp_dir.path(), "a.csv").unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();

        let files = transport.list(temp_dir.path()).unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.csv"), temp_dir.path().join("b.pdf")]
        );
    }
}
