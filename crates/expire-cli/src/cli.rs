use std::time::Duration;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "expire",
    about = "Track time-to-live metadata for files in a per-directory ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Ledger file name [default: .expirations]
    #[arg(long, global = true)]
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty ledger in the current directory
    Init(InitArgs),
    /// Start tracking targets
    New(NewArgs),
    /// Restart the timer of reset-on-touch targets that have not expired
    Touch(TargetArgs),
    /// Restart the timer of targets unconditionally
    Renew(TargetArgs),
    /// Stop tracking targets
    Delete(DeleteArgs),
    /// Report a target's state through the exit code (0 live, 1 expired, 2 untracked)
    Check(CheckArgs),
    /// List, and optionally delete, records
    Next(NextArgs),
    /// List expired records of every ledger below the current directory
    Scan(ScanArgs),
}

/// Flags shared by the mutating commands.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct RunFlags {
    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
    /// Treat a missing ledger or record as success
    #[arg(short = 'b', long)]
    pub batch: bool,
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(required = true)]
    pub targets: Vec<String>,
    /// Time to live, e.g. `10m` or `1h 30m` [default: $EXPIRE_DEFAULT_DURATION or 10m]
    #[arg(short, long, value_parser = expire_types::parse_duration)]
    pub duration: Option<Duration>,
    #[arg(short, long)]
    pub reset_on_touch: bool,
    /// Create a ledger in the current directory if none is found
    #[arg(long)]
    pub init: bool,
    /// Refuse to add a record for an already tracked target
    #[arg(long)]
    pub no_shadow: bool,
    #[command(flatten)]
    pub run: RunFlags,
}

#[derive(Args)]
pub struct TargetArgs {
    #[arg(required = true)]
    pub targets: Vec<String>,
    #[command(flatten)]
    pub run: RunFlags,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(required = true)]
    pub targets: Vec<String>,
    /// Remove the ledger file once it holds no records
    #[arg(long)]
    pub de_init: bool,
    #[command(flatten)]
    pub run: RunFlags,
}

#[derive(Args)]
pub struct CheckArgs {
    pub target: String,
}

#[derive(Args)]
pub struct NextArgs {
    /// Remove the listed records from the ledger
    #[arg(long)]
    pub delete: bool,
    /// Only list records that have expired
    #[arg(long)]
    pub expired: bool,
    /// Only list records whose file exists
    #[arg(long)]
    pub exist: bool,
    /// Only list records whose file does not exist
    #[arg(long)]
    pub no_exist: bool,
    /// Glob the file path must match (repeatable)
    #[arg(long = "match-glob", value_name = "GLOB")]
    pub match_glob: Vec<String>,
    /// Regex the target must match (repeatable)
    #[arg(long = "match-regex", value_name = "REGEX")]
    pub match_regex: Vec<String>,
    /// Maximum number of records, 0 for all
    #[arg(long, default_value = "0")]
    pub limit: usize,
    /// Line template; fields: {target} {contextual} {expires} {relative} {duration} {reset}
    #[arg(long)]
    pub template: Option<String>,
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Skip directories matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,
}
