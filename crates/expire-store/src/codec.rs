//! The ledger's tabular text format.
//!
//! ```text
//! target,expires,duration,resetOnTouch
//! build/cache.tar,2024-06-01T12:10:00Z,10m,no
//! "notes, draft.md",2024-06-02T08:00:00Z,1day,yes
//! ```
//!
//! Standard CSV quoting applies to fields containing the delimiter, quotes
//! or newlines. The header row is always written; an empty ledger is a
//! header-only file.

use expire_types::{
    format_duration, format_timestamp, parse_duration, parse_timestamp, ExpirationRecord,
    ExpirationRecords,
};
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Column names, in order.
pub const HEADER: [&str; 4] = ["target", "expires", "duration", "resetOnTouch"];

const YES: &str = "yes";
const NO: &str = "no";

/// Decode a full ledger.
///
/// Fails on the first malformed data line, reporting its 1-based line
/// number; no partial collection is returned.
pub fn decode(bytes: &[u8]) -> StoreResult<ExpirationRecords> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header = reader.headers().map_err(csv_error)?;
    if !header.is_empty() && header.iter().ne(HEADER) {
        warn!(header = ?header, "unexpected ledger header; reading rows anyway");
    }

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        // Header is line 1; fall back to row counting if the reader has no position.
        let line = row.position().map(|p| p.line()).unwrap_or(idx as u64 + 2);
        let record = from_row(&row).map_err(|reason| StoreError::Parse { line, reason })?;
        records.push(record);
    }

    Ok(ExpirationRecords::from_vec(records))
}

/// Encode a full ledger, header included.
pub fn encode(records: &ExpirationRecords) -> StoreResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).map_err(csv_error)?;
    for record in records {
        writer.write_record(to_row(record)).map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Csv(e.to_string()))
}

fn from_row(row: &csv::StringRecord) -> Result<ExpirationRecord, String> {
    if row.len() != HEADER.len() {
        return Err(format!(
            "expected {} fields, found {}",
            HEADER.len(),
            row.len()
        ));
    }

    let expires = parse_timestamp(&row[1]).map_err(|e| e.to_string())?;
    let duration = parse_duration(&row[2]).map_err(|e| e.to_string())?;

    Ok(ExpirationRecord::new(&row[0], expires, duration, &row[3] == YES))
}

fn to_row(record: &ExpirationRecord) -> [String; 4] {
    [
        record.target.clone(),
        format_timestamp(&record.expires),
        format_duration(record.duration),
        if record.reset_on_touch { YES } else { NO }.to_string(),
    ]
}

fn csv_error(e: csv::Error) -> StoreError {
    match e.position() {
        Some(pos) => StoreError::Parse {
            line: pos.line(),
            reason: e.to_string(),
        },
        None => StoreError::Csv(e.to_string()),
    }
}
