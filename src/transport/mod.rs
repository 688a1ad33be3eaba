//! File transport abstraction
//!
//! Report artifacts are handed to a [`FileTransport`] rather than written
//! directly, so the report engine does not care where bytes end up.

pub mod local;

pub use local::LocalFileTransport;

use std::path::{Path, PathBuf};

use crate::error::LedgerResult;

/// Saves, reads, deletes and lists stored report files
pub trait FileTransport: Send + Sync {
    /// Store `bytes` as `filename` inside `directory`, returning the full path
    fn save(&self, bytes: &[u8], directory: &Path, filename: &str) -> LedgerResult<PathBuf>;

    /// Read a stored file; missing files yield a `NotFound` error
    fn read(&self, path: &Path) -> LedgerResult<Vec<u8>>;

    /// Remove a stored file; missing files yield a `NotFound` error
    fn delete(&self, path: &Path) -> LedgerResult<()>;

    /// Regular files directly inside `directory`, sorted by path
    fn list(&self, directory: &Path) -> LedgerResult<Vec<PathBuf>>;
}
