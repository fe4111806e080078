//! Foundation types for expire.
//!
//! Every other crate in the workspace builds on the types defined here:
//!
//! - [`ExpirationRecord`] -- one tracked target with its expiry and TTL
//! - [`ExpirationRecords`] -- the record collection, always sorted ascending
//!   by expiry
//! - [`TargetState`] -- the three states a target can occupy
//! - [`duration`] -- TTL parsing, formatting and the default TTL
//! - [`timestamp`] -- the persisted RFC 3339 form of expiry instants

pub mod duration;
pub mod error;
pub mod path;
pub mod record;
pub mod records;
pub mod state;
pub mod timestamp;

pub use duration::{
    default_duration, default_duration_from, expiry_after, format_duration, parse_duration,
    DEFAULT_DURATION, DEFAULT_DURATION_ENV,
};
pub use error::TypeError;
pub use path::relative_to;
pub use record::ExpirationRecord;
pub use records::ExpirationRecords;
pub use state::TargetState;
pub use timestamp::{format_timestamp, parse_timestamp};
