//! Ledger persistence for expire.
//!
//! A ledger is a small CSV file (named `.expirations` by default) holding
//! one encoded [`ExpirationRecords`](expire_types::ExpirationRecords)
//! snapshot. This crate finds the ledger governing a directory, encodes and
//! decodes its contents, and rewrites it atomically.
//!
//! # Modules
//!
//! - [`locator`] -- upward search for the governing ledger
//! - [`codec`] -- the tabular record format
//! - [`file`] -- load, atomic save, and removal
//! - [`error`] -- [`StoreError`]
//!
//! # Design Rules
//!
//! 1. Every save writes the whole collection; there is no append path.
//! 2. Decoding is all-or-nothing: a malformed line fails the whole load.
//! 3. Not finding a ledger is an ordinary result, not an error.

pub mod codec;
pub mod error;
pub mod file;
pub mod locator;

pub use codec::{decode, encode, HEADER};
pub use error::{StoreError, StoreResult};
pub use file::{load, remove, save};
pub use locator::{exists, locate, locate_from};

/// Ledger file name used when none is configured.
pub const DEFAULT_LEDGER_NAME: &str = ".expirations";
