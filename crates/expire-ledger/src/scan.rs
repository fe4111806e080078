//! Tree-wide sweep for expired records.
//!
//! Walks the directory tree under the working directory, loads every file
//! named like the ledger, and reports its expired records. Each ledger is
//! read independently; one that cannot be read is skipped with a warning.

use std::path::{Path, PathBuf};

use expire_store::load;
use expire_types::ExpirationRecord;
use glob::Pattern;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{ledger_dir, Context, ScanConfig};
use crate::error::{LedgerError, LedgerResult};

/// One expired record found by [`scan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanHit {
    pub ledger: PathBuf,
    pub record: ExpirationRecord,
}

/// Collect the expired records of every ledger under `ctx.cwd`.
///
/// Ledgers are visited in file-name order. Within a ledger hits are in
/// expiry order, and their `resolved_path` is set when the target file
/// exists.
pub fn scan(config: &ScanConfig, ctx: &Context) -> LedgerResult<Vec<ScanHit>> {
    let exclude = compile_excludes(&config.exclude)?;
    let name = config.global.file_name();
    let root = ctx.cwd.as_path();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, root, &exclude));

    let mut hits = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != name {
            continue;
        }

        let ledger = entry.into_path();
        let records = match load(&ledger) {
            Ok(records) => records,
            Err(err) => {
                warn!(ledger = %ledger.display(), error = %err, "skipping unreadable ledger");
                continue;
            }
        };

        let dir = ledger_dir(&ledger);
        let before = hits.len();
        for record in records.iter().take_while(|r| r.is_expired(ctx.now)) {
            let file = dir.join(&record.target);
            let record = if expire_store::exists(&file) {
                record.clone().with_resolved_path(file)
            } else {
                record.clone()
            };
            hits.push(ScanHit {
                ledger: ledger.clone(),
                record,
            });
        }
        debug!(ledger = %ledger.display(), expired = hits.len() - before, "ledger scanned");
    }
    Ok(hits)
}

fn compile_excludes(patterns: &[String]) -> LedgerResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| LedgerError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// A directory is excluded when a pattern matches its name or its path
/// relative to the walk root. The root itself is never excluded.
fn is_excluded(entry: &DirEntry, root: &Path, exclude: &[Pattern]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let name = entry.file_name().to_string_lossy();
    exclude
        .iter()
        .any(|p| p.matches(&name) || p.matches_path(rel))
}
