//! The [`ExpirationRecords`] collection.
//!
//! Records are kept sorted ascending by `expires` after every mutation. The
//! ordering is load-bearing: "first match" lookups resolve duplicate targets
//! to the record expiring soonest, and expired-only extraction stops at the
//! first unexpired record.

use chrono::{DateTime, Utc};

use crate::record::ExpirationRecord;

/// An ordered collection of [`ExpirationRecord`]s, sorted by expiry.
///
/// Duplicate targets are tolerated; every lookup takes the first match in
/// expiry order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpirationRecords {
    records: Vec<ExpirationRecord>,
}

impl ExpirationRecords {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from records in any order.
    pub fn from_vec(records: Vec<ExpirationRecord>) -> Self {
        let mut out = Self { records };
        out.sort();
        out
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate in expiry order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExpirationRecord> {
        self.records.iter()
    }

    /// The records in expiry order.
    pub fn as_slice(&self) -> &[ExpirationRecord] {
        &self.records
    }

    /// Consume the collection, yielding records in expiry order.
    pub fn into_vec(self) -> Vec<ExpirationRecord> {
        self.records
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Add a record and restore expiry order.
    pub fn insert(&mut self, record: ExpirationRecord) {
        self.records.push(record);
        self.sort();
    }

    /// Remove the first record matching `predicate`.
    ///
    /// The remaining records keep their relative order.
    pub fn delete_first<P>(&mut self, mut predicate: P) -> Option<ExpirationRecord>
    where
        P: FnMut(&ExpirationRecord) -> bool,
    {
        let idx = self.records.iter().position(|r| predicate(r))?;
        Some(self.records.remove(idx))
    }

    /// Replace the first record matching `predicate` with `update(record)`.
    ///
    /// The replacement is built from a borrowed view of the current record
    /// and written back in one step; the collection is re-sorted afterwards
    /// since the expiry may have moved. Returns `true` if a record matched.
    pub fn update_first<P, F>(&mut self, mut predicate: P, update: F) -> bool
    where
        P: FnMut(&ExpirationRecord) -> bool,
        F: FnOnce(&ExpirationRecord) -> ExpirationRecord,
    {
        let Some(idx) = self.records.iter().position(|r| predicate(r)) else {
            return false;
        };
        let replacement = update(&self.records[idx]);
        self.records[idx] = replacement;
        self.sort();
        true
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// A copy of the first record matching `predicate`, in expiry order.
    pub fn find_first<P>(&self, mut predicate: P) -> Option<ExpirationRecord>
    where
        P: FnMut(&ExpirationRecord) -> bool,
    {
        self.records.iter().find(|&r| predicate(r)).cloned()
    }

    /// Collect copies of the records matching `predicate`, optionally
    /// removing them from the collection.
    ///
    /// - With `expired_only`, the walk stops at the first record whose expiry
    ///   is after `now`; `predicate` is never called on that record or any
    ///   later one.
    /// - At most `limit` records are collected; `0` means unlimited.
    /// - With `remove`, every collected record is excised in a single pass and
    ///   the survivors keep their order.
    pub fn filter_extract<P>(
        &mut self,
        now: DateTime<Utc>,
        expired_only: bool,
        limit: usize,
        remove: bool,
        mut predicate: P,
    ) -> Vec<ExpirationRecord>
    where
        P: FnMut(&ExpirationRecord) -> bool,
    {
        let mut matched_idx = Vec::new();
        for (idx, record) in self.records.iter().enumerate() {
            if expired_only && !record.is_expired(now) {
                break;
            }
            if limit > 0 && matched_idx.len() >= limit {
                break;
            }
            if predicate(record) {
                matched_idx.push(idx);
            }
        }

        let matched: Vec<ExpirationRecord> = matched_idx
            .iter()
            .map(|&idx| self.records[idx].clone())
            .collect();

        if remove && !matched_idx.is_empty() {
            let mut pending = matched_idx.into_iter().peekable();
            let mut idx = 0;
            self.records.retain(|_| {
                let drop = pending.next_if_eq(&idx).is_some();
                idx += 1;
                !drop
            });
        }

        matched
    }

    fn sort(&mut self) {
        self.records.sort_by_key(|r| r.expires);
    }
}

impl FromIterator<ExpirationRecord> for ExpirationRecords {
    fn from_iter<I: IntoIterator<Item = ExpirationRecord>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl IntoIterator for ExpirationRecords {
    type Item = ExpirationRecord;
    type IntoIter = std::vec::IntoIter<ExpirationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExpirationRecords {
    type Item = &'a ExpirationRecord;
    type IntoIter = std::slice::Iter<'a, ExpirationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
