/// Errors from ledger persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A ledger line could not be decoded. `line` is 1-based.
    #[error("error parsing ledger (line {line}): {reason}")]
    Parse { line: u64, reason: String },

    /// The tabular layer failed to read or write a row.
    #[error("csv error: {0}")]
    Csv(String),

    /// The rewritten ledger could not be moved into place.
    #[error("failed to replace ledger: {0}")]
    Persist(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
