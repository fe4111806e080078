use expire_store::StoreError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("no target given")]
    NoTarget,

    #[error("no {name} file found; use init or the init option to create one")]
    NoLedger { name: String },

    #[error("no such record: {target}")]
    RecordNotFound { target: String },

    #[error("a record for {target} already exists and no-shadow was requested")]
    ShadowConflict { target: String },

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
