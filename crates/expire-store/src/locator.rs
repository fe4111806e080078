//! Discovery of the ledger governing a directory.
//!
//! The governing ledger is the first file with the ledger's name found in
//! the starting directory or any of its ancestors. Not finding one is a
//! normal outcome, not an error.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Returns `true` unless stat-ing `path` reports that it does not exist.
///
/// Other stat failures (e.g. permission denied) count as existing, so a
/// ledger that is present but unreadable surfaces as a read error later
/// instead of being silently skipped.
pub fn exists(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}

/// Find `file_name` in `start` or the nearest ancestor that has it.
pub fn locate_from(start: &Path, file_name: &str) -> Option<PathBuf> {
    let found = start
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| exists(candidate));
    debug!(start = %start.display(), file_name, found = ?found, "ledger lookup");
    found
}

/// Find `file_name` starting at the process working directory.
pub fn locate(file_name: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    locate_from(&cwd, file_name)
}
