//! Reading and rewriting ledger files.
//!
//! A ledger is never edited in place. Every save encodes the full
//! collection into a temporary file next to the ledger, syncs it, and then
//! renames it over the ledger path, so readers see either the old or the
//! new snapshot.

use std::fs;
use std::io::Write;
use std::path::Path;

use expire_types::ExpirationRecords;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::codec::{decode, encode};
use crate::error::{StoreError, StoreResult};

/// Read and decode the ledger at `path`.
pub fn load(path: &Path) -> StoreResult<ExpirationRecords> {
    let bytes = fs::read(path)?;
    let records = decode(&bytes)?;
    debug!(path = %path.display(), records = records.len(), "ledger loaded");
    Ok(records)
}

/// Encode `records` and atomically replace the ledger at `path`.
///
/// Creates the ledger if it does not exist. An existing ledger keeps its
/// permissions.
pub fn save(path: &Path, records: &ExpirationRecords) -> StoreResult<()> {
    let bytes = encode(records)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| StoreError::Persist(format!("{}: {}", path.display(), e.error)))?;

    debug!(path = %path.display(), records = records.len(), bytes = bytes.len(), "ledger written");
    Ok(())
}

/// Remove the ledger file at `path`.
pub fn remove(path: &Path) -> StoreResult<()> {
    fs::remove_file(path)?;
    debug!(path = %path.display(), "ledger removed");
    Ok(())
}
