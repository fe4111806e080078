use std::path::Path;
use std::process::ExitCode;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use colored::Colorize;
use expire_ledger::{
    CheckConfig, Context, CreateConfig, DeleteConfig, DryRunReporter, GlobalConfig, InitConfig,
    QueryConfig, QueryFilter, RunMode, ScanConfig, UpdateConfig,
};
use expire_types::{ExpirationRecord, TargetState};
use serde::Serialize;

use crate::cli::*;
use crate::template::{Template, DEFAULT_TEMPLATE};

/// Prints dry-run actions to stdout.
struct ConsoleReporter;

impl DryRunReporter for ConsoleReporter {
    fn report(&mut self, action: &str) {
        println!("{} {}", "dry-run:".yellow().bold(), action);
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let ctx = Context::current()?;
    let global = GlobalConfig { name: cli.name };
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args, global, &ctx),
        Command::New(args) => cmd_new(args, global, &ctx),
        Command::Touch(args) => cmd_update(args, global, &ctx, "touch", expire_ledger::touch),
        Command::Renew(args) => cmd_update(args, global, &ctx, "renew", expire_ledger::renew),
        Command::Delete(args) => cmd_delete(args, global, &ctx),
        Command::Check(args) => cmd_check(args, global, &ctx, format),
        Command::Next(args) => cmd_next(args, global, &ctx, format),
        Command::Scan(args) => cmd_scan(args, global, &ctx, format),
    }
}

fn run_mode(flags: RunFlags) -> RunMode {
    RunMode {
        dry_run: flags.dry_run,
        batch_run: flags.batch,
    }
}

fn cmd_init(args: InitArgs, global: GlobalConfig, ctx: &Context) -> anyhow::Result<ExitCode> {
    let config = InitConfig {
        global,
        dry_run: args.dry_run,
    };
    expire_ledger::init(&config, ctx, &mut ConsoleReporter)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_new(args: NewArgs, global: GlobalConfig, ctx: &Context) -> anyhow::Result<ExitCode> {
    for target in args.targets {
        let config = CreateConfig {
            global: global.clone(),
            mode: run_mode(args.run),
            target,
            init: args.init,
            duration: args.duration,
            reset_on_touch: args.reset_on_touch,
            no_shadow: args.no_shadow,
        };
        expire_ledger::create(&config, ctx, &mut ConsoleReporter)
            .with_context(|| format!("new {}", config.target))?;
    }
    Ok(ExitCode::SUCCESS)
}

type UpdateFn = fn(&UpdateConfig, &Context, &mut dyn DryRunReporter) -> expire_ledger::LedgerResult<()>;

fn cmd_update(
    args: TargetArgs,
    global: GlobalConfig,
    ctx: &Context,
    verb: &str,
    update: UpdateFn,
) -> anyhow::Result<ExitCode> {
    for target in args.targets {
        let config = UpdateConfig {
            global: global.clone(),
            mode: run_mode(args.run),
            target,
        };
        update(&config, ctx, &mut ConsoleReporter)
            .with_context(|| format!("{verb} {}", config.target))?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_delete(args: DeleteArgs, global: GlobalConfig, ctx: &Context) -> anyhow::Result<ExitCode> {
    for target in args.targets {
        let config = DeleteConfig {
            global: global.clone(),
            mode: run_mode(args.run),
            target,
            de_init: args.de_init,
        };
        expire_ledger::delete(&config, ctx, &mut ConsoleReporter)
            .with_context(|| format!("delete {}", config.target))?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(
    args: CheckArgs,
    global: GlobalConfig,
    ctx: &Context,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let config = CheckConfig {
        global,
        target: args.target,
    };
    Ok(ExitCode::from(check_status(&config, ctx, format)))
}

/// Exit status of `check`. Failures report as untracked so that only a
/// readable, expired record yields the expired code.
fn check_status(config: &CheckConfig, ctx: &Context, format: OutputFormat) -> u8 {
    let state = match expire_ledger::check(config, ctx) {
        Ok(state) => state,
        Err(e) => {
            let err = anyhow::Error::from(e).context(format!("check {}", config.target));
            eprintln!("{} {err:#}", "error:".red().bold());
            return TargetState::Untracked.code();
        }
    };
    if format == OutputFormat::Json {
        let out = serde_json::json!({
            "target": config.target,
            "state": state,
            "code": state.code(),
        });
        println!("{out}");
    }
    state.code()
}

/// JSON shape of one listed record: the persisted fields plus display
/// helpers.
#[derive(Serialize)]
struct RecordView<'a> {
    #[serde(flatten)]
    record: &'a ExpirationRecord,
    contextual: String,
    relative: String,
    expired: bool,
}

impl<'a> RecordView<'a> {
    fn new(record: &'a ExpirationRecord, cwd: &Path, now: DateTime<Utc>) -> Self {
        Self {
            record,
            contextual: record.target_contextual(cwd),
            relative: record.expiration_relative(now),
            expired: record.is_expired(now),
        }
    }
}

fn cmd_next(
    args: NextArgs,
    global: GlobalConfig,
    ctx: &Context,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    // Parse before querying so a bad template never deletes anything.
    let template = Template::parse(args.template.as_deref().unwrap_or(DEFAULT_TEMPLATE))?;

    let config = QueryConfig {
        global,
        dry_run: args.dry_run,
        expired: args.expired,
        limit: args.limit,
        remove: args.delete,
        filter: QueryFilter {
            exist: args.exist,
            no_exist: args.no_exist,
            globs: args.match_glob,
            regexes: args.match_regex,
        },
    };
    let records = expire_ledger::query(&config, ctx, &mut ConsoleReporter)?;

    match format {
        OutputFormat::Text => {
            for record in &records {
                println!("{}", template.render(record, &ctx.cwd, ctx.now));
            }
        }
        OutputFormat::Json => {
            let views: Vec<_> = records
                .iter()
                .map(|r| RecordView::new(r, &ctx.cwd, ctx.now))
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_scan(
    args: ScanArgs,
    global: GlobalConfig,
    ctx: &Context,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let config = ScanConfig {
        global,
        exclude: args.exclude,
    };
    let hits = expire_ledger::scan(&config, ctx)?;

    match format {
        OutputFormat::Text => {
            for hit in &hits {
                let ledger = expire_types::relative_to(&hit.ledger, &ctx.cwd)
                    .unwrap_or_else(|| hit.ledger.clone());
                println!("{}\t{}", ledger.display().to_string().dimmed(), hit.record.target);
            }
        }
        OutputFormat::Json => {
            let out: Vec<_> = hits
                .iter()
                .map(|hit| {
                    serde_json::json!({
                        "ledger": hit.ledger,
                        "record": RecordView::new(&hit.record, &ctx.cwd, ctx.now),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
