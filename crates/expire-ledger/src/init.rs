use tracing::debug;

use crate::config::{Context, InitConfig, RunMode};
use crate::error::LedgerResult;
use crate::plan::{Action, DryRunReporter, Plan};

/// Plan the creation of an empty ledger in the working directory.
///
/// Only the working directory is checked: a ledger higher up the tree does
/// not prevent a nested one.
pub fn plan_init(config: &InitConfig, ctx: &Context) -> Plan {
    let path = config.global.local_path(ctx);
    if expire_store::exists(&path) {
        debug!(path = %path.display(), "ledger already present");
        return Plan::single(Action::Note(format!(
            "File exists: {}. Will not re-initialize.",
            path.display()
        )));
    }
    Plan::single(Action::CreateLedger { path })
}

pub fn init(
    config: &InitConfig,
    ctx: &Context,
    reporter: &mut dyn DryRunReporter,
) -> LedgerResult<()> {
    let mode = RunMode {
        dry_run: config.dry_run,
        batch_run: false,
    };
    plan_init(config, ctx).execute(mode, reporter)
}
