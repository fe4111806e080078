//! Core ledger operations for expire.
//!
//! Every operation takes a config struct and an explicit [`Context`] (working
//! directory, clock, default TTL). Read-only operations return their result
//! directly. Mutating operations are split in two:
//!
//! 1. a planner (`plan_*`) that validates, loads the governing ledger, applies
//!    the change in memory and returns a [`Plan`];
//! 2. [`Plan::execute`], which applies, reports or discards each effect
//!    according to the [`RunMode`].
//!
//! The convenience functions ([`create`], [`touch`], ...) do both.
//!
//! # Modules
//!
//! - [`config`] -- operation configs, [`Context`] and [`RunMode`]
//! - [`plan`] -- [`Plan`], [`Action`] and the [`DryRunReporter`] sink
//! - [`filter`] -- presence, glob and regex record filtering
//! - [`init`], [`create`], [`update`], [`delete`] -- mutating operations
//! - [`check`] -- the state of one target
//! - [`query`] -- listing and sweeping records
//! - [`scan`] -- expired records across a directory tree
//! - [`error`] -- [`LedgerError`]

pub mod check;
pub mod config;
pub mod create;
pub mod delete;
pub mod error;
pub mod filter;
pub mod init;
pub mod plan;
pub mod query;
pub mod scan;
pub mod update;

pub use check::check;
pub use config::{
    CheckConfig, Context, CreateConfig, DeleteConfig, GlobalConfig, InitConfig, QueryConfig,
    RenewConfig, RunMode, ScanConfig, TouchConfig, UpdateConfig,
};
pub use create::{create, plan_create};
pub use delete::{delete, plan_delete};
pub use error::{LedgerError, LedgerResult};
pub use filter::{CompiledFilter, QueryFilter, Verdict};
pub use init::{init, plan_init};
pub use plan::{Action, DryRunReporter, Plan, RecordingReporter, Rejection};
pub use query::{plan_query, query, QueryOutcome};
pub use scan::{scan, ScanHit};
pub use update::{plan_renew, plan_touch, plan_update, renew, touch};
