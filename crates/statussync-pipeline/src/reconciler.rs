//! Merge extracted records into the tabular store
//!
//! Each application has one row, identified by its unique key. A record
//! whose key is new is appended. A record for a known key rewrites the
//! row when it brings a different status. An unknown status is treated
//! like any other absent field: the row keeps its value, and is rewritten
//! only if another field changes.
//!
//! The read-modify-write is not transactional. One run at a time is
//! assumed.

use serde::Serialize;
use statussync_domain::traits::TabularStore;
use statussync_domain::{ApplicationStatus, ApplicationStatusRecord, SheetRow, StoredRow, UniqueKey};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileOutcome {
    /// New row appended
    Added,
    /// Existing row rewritten
    Updated,
    /// Nothing written
    Unchanged,
}

impl ReconcileOutcome {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcileOutcome::Added => "added",
            ReconcileOutcome::Updated => "updated",
            ReconcileOutcome::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index rows by unique key; for duplicate keys the last row wins
pub fn index_rows(rows: Vec<StoredRow>) -> HashMap<UniqueKey, StoredRow> {
    rows.into_iter().map(|row| (row.unique_key(), row)).collect()
}

/// The row to write over `stored` for `record`
///
/// Each field comes from the record when known and from the stored row
/// otherwise; an unknown status keeps the stored one.
pub fn merge(stored: &SheetRow, record: &ApplicationStatusRecord) -> SheetRow {
    let pick = |incoming: &Option<String>, existing: &str| {
        incoming.clone().unwrap_or_else(|| existing.to_string())
    };
    let status = if record.status.is_known() {
        record.status.as_str().to_string()
    } else {
        stored.status.clone()
    };
    SheetRow {
        status,
        company: pick(&record.company_name, &stored.company),
        position: pick(&record.position_title, &stored.position),
        location: pick(&record.position_location, &stored.location),
        action_date: pick(&record.action_date, &stored.action_date),
    }
}

/// Upserts records into one sheet of a tabular store
pub struct Reconciler<S: TabularStore> {
    store: S,
    sheet: String,
}

impl<S: TabularStore> Reconciler<S> {
    /// Create a reconciler writing to `sheet`
    pub fn new(store: S, sheet: impl Into<String>) -> Self {
        Self {
            store,
            sheet: sheet.into(),
        }
    }

    /// Sheet written to
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the reconciler, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Merge one record into the sheet
    ///
    /// # Errors
    ///
    /// Returns the store's error when the sheet cannot be read or written.
    pub fn upsert(&mut self, record: &ApplicationStatusRecord) -> Result<ReconcileOutcome, S::Error> {
        let key = record.unique_key();
        let mut rows = index_rows(self.store.read_all(&self.sheet)?);

        let Some(stored) = rows.remove(&key) else {
            self.store.append_row(&self.sheet, &SheetRow::from_record(record))?;
            debug!(%key, status = %record.status, "Added application");
            return Ok(ReconcileOutcome::Added);
        };

        if ApplicationStatus::parse(&stored.row.status) == Some(record.status) {
            debug!(%key, row = stored.row_number, status = %record.status, "Status unchanged");
            return Ok(ReconcileOutcome::Unchanged);
        }

        let merged = merge(&stored.row, record);
        if merged == stored.row {
            debug!(%key, row = stored.row_number, "Nothing new for row");
            return Ok(ReconcileOutcome::Unchanged);
        }
        self.store.update_row(&self.sheet, stored.row_number, &merged)?;
        debug!(
            %key,
            row = stored.row_number,
            from = %stored.row.status,
            to = %merged.status,
            "Updated application"
        );
        Ok(ReconcileOutcome::Updated)
    }
}
