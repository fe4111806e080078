//! Operation configs and the invocation context.
//!
//! For every config a zero value is the default: no flags set, no
//! duration override, the default ledger name.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use expire_store::{load, locate_from, DEFAULT_LEDGER_NAME};
use expire_types::{default_duration, ExpirationRecords};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::filter::QueryFilter;

/// Everything an operation needs to know about where and when it runs.
///
/// Operations never consult the process working directory, clock or
/// environment directly; they read them from here.
#[derive(Clone, Debug)]
pub struct Context {
    /// Directory the invocation is acting from. Ledger discovery starts
    /// here and display paths are relative to it.
    pub cwd: PathBuf,
    /// The invocation's notion of "now".
    pub now: DateTime<Utc>,
    /// TTL applied when a create does not specify one.
    pub default_duration: Duration,
}

impl Context {
    /// A context with an explicit directory and clock and the built-in
    /// default TTL.
    pub fn new(cwd: impl Into<PathBuf>, now: DateTime<Utc>) -> Self {
        Self {
            cwd: cwd.into(),
            now,
            default_duration: expire_types::DEFAULT_DURATION,
        }
    }

    /// The context of the running process: its working directory, the
    /// current time, and the default TTL from the environment.
    pub fn current() -> LedgerResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| LedgerError::Store(e.into()))?;
        Ok(Self {
            cwd,
            now: Utc::now(),
            default_duration: default_duration(),
        })
    }

    /// Override the default TTL.
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }
}

/// Settings shared by every operation.
#[derive(Clone, Debug, Default)]
pub struct GlobalConfig {
    /// Ledger file name; `.expirations` when unset.
    pub name: Option<String>,
}

impl GlobalConfig {
    /// The ledger file name in effect.
    pub fn file_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_LEDGER_NAME,
        }
    }

    /// The ledger governing `ctx.cwd`, if any.
    pub fn locate(&self, ctx: &Context) -> Option<PathBuf> {
        locate_from(&ctx.cwd, self.file_name())
    }

    /// Where `init` would place a ledger for `ctx`.
    pub fn local_path(&self, ctx: &Context) -> PathBuf {
        ctx.cwd.join(self.file_name())
    }
}

/// Cross-cutting modifiers of mutating operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Report what would happen instead of touching the filesystem.
    pub dry_run: bool,
    /// Treat a missing ledger, missing record or shadow conflict as a
    /// silent success.
    pub batch_run: bool,
}

#[derive(Clone, Debug, Default)]
pub struct InitConfig {
    pub global: GlobalConfig,
    pub dry_run: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CreateConfig {
    pub global: GlobalConfig,
    pub mode: RunMode,
    pub target: String,
    /// Initialize a ledger in the working directory if none governs it.
    pub init: bool,
    /// TTL; `None` or zero selects the context's default.
    pub duration: Option<Duration>,
    pub reset_on_touch: bool,
    /// Refuse to add a record when one already exists for the target.
    pub no_shadow: bool,
}

/// Config shared by `touch` and `renew`.
#[derive(Clone, Debug, Default)]
pub struct UpdateConfig {
    pub global: GlobalConfig,
    pub mode: RunMode,
    pub target: String,
}

pub type TouchConfig = UpdateConfig;
pub type RenewConfig = UpdateConfig;

#[derive(Clone, Debug, Default)]
pub struct DeleteConfig {
    pub global: GlobalConfig,
    pub mode: RunMode,
    pub target: String,
    /// Remove the ledger file when the delete leaves it empty.
    pub de_init: bool,
}

#[derive(Clone, Debug, Default)]
pub struct CheckConfig {
    pub global: GlobalConfig,
    pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct QueryConfig {
    pub global: GlobalConfig,
    pub dry_run: bool,
    /// Only consider records that have already expired.
    pub expired: bool,
    /// Maximum number of matches; `0` is unlimited.
    pub limit: usize,
    /// Remove matched records from the ledger.
    pub remove: bool,
    pub filter: QueryFilter,
}

#[derive(Clone, Debug, Default)]
pub struct ScanConfig {
    pub global: GlobalConfig,
    /// Glob patterns; directories whose path matches any of them are skipped.
    pub exclude: Vec<String>,
}

pub(crate) fn require_target(target: &str) -> LedgerResult<()> {
    if target.is_empty() {
        return Err(LedgerError::NoTarget);
    }
    Ok(())
}

/// Locate and load the ledger governing `ctx.cwd`.
pub(crate) fn open_ledger(
    global: &GlobalConfig,
    ctx: &Context,
) -> LedgerResult<Option<(PathBuf, ExpirationRecords)>> {
    let Some(path) = global.locate(ctx) else {
        debug!(name = global.file_name(), cwd = %ctx.cwd.display(), "no ledger found");
        return Ok(None);
    };
    let records = load(&path)?;
    Ok(Some((path, records)))
}

pub(crate) fn ledger_dir(ledger: &Path) -> &Path {
    match ledger.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_name() {
        assert_eq!(GlobalConfig::default().file_name(), ".expirations");
        let empty = GlobalConfig { name: Some(String::new()) };
        assert_eq!(empty.file_name(), ".expirations");
        let custom = GlobalConfig { name: Some("ttl.csv".into()) };
        assert_eq!(custom.file_name(), "ttl.csv");
    }

    #[test]
    fn empty_target_is_rejected() {
        assert!(matches!(require_target(""), Err(LedgerError::NoTarget)));
        assert!(require_target("a").is_ok());
    }

    #[test]
    fn ledger_dir_of_bare_name_is_dot() {
        assert_eq!(ledger_dir(Path::new(".expirations")), Path::new("."));
        assert_eq!(ledger_dir(Path::new("/a/.expirations")), Path::new("/a"));
    }
}
