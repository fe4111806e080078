//! Effect plans for mutating operations.
//!
//! Planning and applying are separate steps. A planner validates its
//! config, reads the ledger, performs the in-memory mutation, and returns a
//! [`Plan`]: the ordered list of effects the operation wants. The caller
//! then [`execute`](Plan::execute)s the plan under a [`RunMode`], which
//! decides whether each effect is applied, reported to a
//! [`DryRunReporter`], or discarded.

use std::path::PathBuf;

use expire_store::{remove, save};
use expire_types::ExpirationRecords;
use tracing::debug;

use crate::config::RunMode;
use crate::error::{LedgerError, LedgerResult};

/// Sink for the actions a dry run would have taken.
pub trait DryRunReporter {
    fn report(&mut self, action: &str);
}

/// A [`DryRunReporter`] that keeps every reported action.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    pub actions: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DryRunReporter for RecordingReporter {
    fn report(&mut self, action: &str) {
        self.actions.push(action.to_string());
    }
}

/// A condition that stops an operation. Batch runs swallow it; other runs
/// turn it into the matching [`LedgerError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No ledger governs the working directory.
    NoLedger { name: String },
    /// The target has no record. `verb` names the attempted change.
    RecordNotFound { target: String, verb: &'static str },
    /// The target already has a record and shadowing was refused.
    ShadowConflict { target: String },
}

impl Rejection {
    pub fn describe(&self) -> String {
        match self {
            Rejection::NoLedger { name } => format!("No {name} file found. Nothing to do."),
            Rejection::RecordNotFound { target, verb } => {
                format!("Will not {verb} non-existent record: {target}")
            }
            Rejection::ShadowConflict { target } => {
                format!("Will not shadow existing record: {target}")
            }
        }
    }

    pub fn into_error(self) -> LedgerError {
        match self {
            Rejection::NoLedger { name } => LedgerError::NoLedger { name },
            Rejection::RecordNotFound { target, .. } => LedgerError::RecordNotFound { target },
            Rejection::ShadowConflict { target } => LedgerError::ShadowConflict { target },
        }
    }
}

/// One effect of an operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Create an empty ledger.
    CreateLedger { path: PathBuf },
    /// Replace the ledger at `path` with `records`. `change` describes the
    /// mutation for dry-run reports.
    WriteLedger {
        path: PathBuf,
        records: ExpirationRecords,
        change: String,
    },
    /// Delete the ledger file.
    RemoveLedger { path: PathBuf },
    /// No effect; only surfaces in dry-run reports.
    Note(String),
    /// Stop here.
    Reject(Rejection),
}

impl Action {
    /// The dry-run description of this action.
    pub fn describe(&self) -> String {
        match self {
            Action::CreateLedger { path } => format!("Would create {}", path.display()),
            Action::WriteLedger { change, .. } => change.clone(),
            Action::RemoveLedger { path } => format!("Will delete the file: {}", path.display()),
            Action::Note(note) => note.clone(),
            Action::Reject(rejection) => rejection.describe(),
        }
    }
}

/// The ordered effects of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    actions: Vec<Action>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plan with a single action.
    pub fn single(action: Action) -> Self {
        Self {
            actions: vec![action],
        }
    }

    /// A plan that only rejects.
    pub fn rejected(rejection: Rejection) -> Self {
        Self::single(Action::Reject(rejection))
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Returns `true` if the plan ends in a rejection.
    pub fn is_rejected(&self) -> bool {
        matches!(self.actions.last(), Some(Action::Reject(_)))
    }

    /// Carry out the plan.
    ///
    /// In a dry run every action is described to `reporter` and nothing is
    /// written. A rejection ends execution: as a success in a batch run,
    /// as an error otherwise (after being reported, in a dry run).
    pub fn execute(self, mode: RunMode, reporter: &mut dyn DryRunReporter) -> LedgerResult<()> {
        for action in self.actions {
            if mode.dry_run {
                reporter.report(&action.describe());
            }

            match action {
                Action::Reject(rejection) => {
                    if mode.batch_run {
                        debug!(rejection = ?rejection, "batch run: ignoring rejection");
                        return Ok(());
                    }
                    return Err(rejection.into_error());
                }
                _ if mode.dry_run => {}
                Action::CreateLedger { path } => save(&path, &ExpirationRecords::new())?,
                Action::WriteLedger { path, records, .. } => save(&path, &records)?,
                Action::RemoveLedger { path } => remove(&path)?,
                Action::Note(_) => {}
            }
        }
        Ok(())
    }
}
