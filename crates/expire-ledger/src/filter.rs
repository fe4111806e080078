//! The query filter: file presence, glob and regex matching.
//!
//! A [`QueryFilter`] is the user-facing description. Compiling it against a
//! ledger directory and the invoking directory yields a [`CompiledFilter`]
//! whose [`evaluate`](CompiledFilter::evaluate) is the predicate handed to
//! [`ExpirationRecords::filter_extract`](expire_types::ExpirationRecords::filter_extract).
//!
//! Evaluation of one record:
//!
//! 1. Resolve the target against the ledger directory and check whether
//!    that file exists.
//! 2. Apply the presence filter (`exist` / `no_exist`).
//! 3. If the file exists, every glob must match its path relative to the
//!    invoking directory. A glob that failed to compile never matches.
//! 4. Every regex must match the raw target. A regex that failed to
//!    compile is ignored.

use std::path::{Path, PathBuf};

use expire_store::exists;
use expire_types::{relative_to, ExpirationRecord};
use glob::{MatchOptions, Pattern};
use regex::Regex;
use tracing::warn;

/// Record selection criteria for queries.
#[derive(Clone, Debug, Default)]
pub struct QueryFilter {
    /// Keep only records whose target file exists. Wins over `no_exist`.
    pub exist: bool,
    /// Keep only records whose target file does not exist.
    pub no_exist: bool,
    /// Glob patterns matched against the target file's display path.
    pub globs: Vec<String>,
    /// Regular expressions matched against the raw target.
    pub regexes: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Presence {
    Any,
    Exist,
    NoExist,
}

/// Result of evaluating one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    /// Absolute path of the target file when it exists.
    pub resolved: Option<PathBuf>,
}

/// A [`QueryFilter`] bound to a ledger, ready for evaluation.
#[derive(Debug)]
pub struct CompiledFilter {
    ledger_dir: PathBuf,
    cwd: PathBuf,
    presence: Presence,
    globs: Vec<Option<Pattern>>,
    regexes: Vec<Regex>,
}

impl QueryFilter {
    /// Compile patterns and resolve competing flags.
    ///
    /// Never fails: bad patterns are logged and handled per the evaluation
    /// rules.
    pub fn compile(&self, ledger_dir: &Path, cwd: &Path) -> CompiledFilter {
        let presence = match (self.exist, self.no_exist) {
            (true, true) => {
                warn!("competing filters exist and no-exist set; using exist");
                Presence::Exist
            }
            (true, false) => Presence::Exist,
            (false, true) => Presence::NoExist,
            (false, false) => Presence::Any,
        };

        let globs = self
            .globs
            .iter()
            .map(|g| match Pattern::new(g) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = %g, error = %e, "invalid glob; it will match nothing");
                    None
                }
            })
            .collect();

        let regexes = self
            .regexes
            .iter()
            .filter_map(|r| match Regex::new(r) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!(pattern = %r, error = %e, "invalid regex; ignoring it");
                    None
                }
            })
            .collect();

        CompiledFilter {
            ledger_dir: ledger_dir.to_path_buf(),
            cwd: cwd.to_path_buf(),
            presence,
            globs,
            regexes,
        }
    }
}

impl CompiledFilter {
    pub fn evaluate(&self, record: &ExpirationRecord) -> Verdict {
        let abs = self.ledger_dir.join(&record.target);
        let file_exists = exists(&abs);
        let resolved = file_exists.then(|| abs.clone());
        let reject = Verdict {
            accepted: false,
            resolved: resolved.clone(),
        };

        match self.presence {
            Presence::Exist if !file_exists => return reject,
            Presence::NoExist if file_exists => return reject,
            _ => {}
        }

        if file_exists && !self.globs.is_empty() {
            let display = relative_to(&abs, &self.cwd).unwrap_or_else(|| abs.clone());
            let options = MatchOptions {
                require_literal_separator: true,
                ..MatchOptions::new()
            };
            let all_match = self.globs.iter().all(|g| {
                g.as_ref()
                    .is_some_and(|p| p.matches_path_with(&display, options))
            });
            if !all_match {
                return reject;
            }
        }

        if !self.regexes.iter().all(|r| r.is_match(&record.target)) {
            return reject;
        }

        Verdict {
            accepted: true,
            resolved,
        }
    }
}
