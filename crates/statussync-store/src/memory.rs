//! In-memory sheets
//!
//! Rows are kept per sheet in row order. Failures can be injected to drive
//! the pipeline's error paths.

use crate::StoreError;
use statussync_domain::traits::TabularStore;
use statussync_domain::{SheetRow, StoredRow, FIRST_DATA_ROW};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Unavailable,
    Authentication,
}

impl Failure {
    fn to_error(self, operation: &str) -> StoreError {
        match self {
            Failure::Unavailable => StoreError::Unavailable(format!("{} failed", operation)),
            Failure::Authentication => StoreError::Authentication(format!("{} rejected", operation)),
        }
    }
}

/// In-memory implementation of TabularStore
///
/// # Examples
///
/// ```
/// use statussync_domain::traits::TabularStore;
/// use statussync_domain::SheetRow;
/// use statussync_store::MemorySheetStore;
///
/// let mut store = MemorySheetStore::new();
/// store.append_row("Sheet1", &SheetRow::from_cells(&["applied", "Acme", "Engineer"])).unwrap();
/// assert_eq!(store.read_all("Sheet1").unwrap()[0].row_number, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySheetStore {
    sheets: HashMap<String, Vec<SheetRow>>,
    read_failure: Option<Failure>,
    write_failure: Option<(String, Failure)>,
    writes: usize,
}

impl MemorySheetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `rows` as the data rows of `sheet`
    pub fn with_rows(sheet: impl Into<String>, rows: Vec<SheetRow>) -> Self {
        let mut store = Self::new();
        store.sheets.insert(sheet.into(), rows);
        store
    }

    /// Make every read fail with an unavailable error
    pub fn fail_reads(&mut self) {
        self.read_failure = Some(Failure::Unavailable);
    }

    /// Make every read fail with an authentication error
    pub fn reject_reads(&mut self) {
        self.read_failure = Some(Failure::Authentication);
    }

    /// Make writes of rows whose company contains `fragment` fail
    pub fn fail_writes_for(&mut self, fragment: impl Into<String>) {
        self.write_failure = Some((fragment.into(), Failure::Unavailable));
    }

    /// Reject writes of rows whose company contains `fragment` as unauthenticated
    pub fn reject_writes_for(&mut self, fragment: impl Into<String>) {
        self.write_failure = Some((fragment.into(), Failure::Authentication));
    }

    /// Data rows of `sheet`, in row order
    pub fn rows(&self, sheet: &str) -> Vec<SheetRow> {
        self.sheets.get(sheet).cloned().unwrap_or_default()
    }

    /// Number of successful appends and updates
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn check_write(&self, row: &SheetRow) -> Result<(), StoreError> {
        match &self.write_failure {
            Some((fragment, failure)) if row.company.contains(fragment.as_str()) => {
                Err(failure.to_error("write"))
            }
            _ => Ok(()),
        }
    }
}

impl TabularStore for MemorySheetStore {
    type Error = StoreError;

    fn read_all(&self, sheet: &str) -> Result<Vec<StoredRow>, Self::Error> {
        if let Some(failure) = self.read_failure {
            return Err(failure.to_error("read"));
        }
        Ok(self
            .rows(sheet)
            .into_iter()
            .enumerate()
            .map(|(i, row)| StoredRow::new(FIRST_DATA_ROW + i, row))
            .collect())
    }

    fn append_row(&mut self, sheet: &str, row: &SheetRow) -> Result<(), Self::Error> {
        self.check_write(row)?;
        self.sheets.entry(sheet.to_string()).or_default().push(row.clone());
        self.writes += 1;
        Ok(())
    }

    fn update_row(&mut self, sheet: &str, row_number: usize, row: &SheetRow) -> Result<(), Self::Error> {
        self.check_write(row)?;
        let slot = row_number
            .checked_sub(FIRST_DATA_ROW)
            .and_then(|index| self.sheets.get_mut(sheet)?.get_mut(index))
            .ok_or_else(|| StoreError::RowOutOfRange {
                sheet: sheet.to_string(),
                row: row_number,
            })?;
        *slot = row.clone();
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statussync_domain::traits::CollaboratorError;

    fn row(company: &str) -> SheetRow {
        SheetRow::from_cells(&["applied", company, "Engineer"])
    }

    #[test]
    fn test_rows_are_numbered_from_two() {
        let store = MemorySheetStore::with_rows("Sheet1", vec![row("Acme"), row("Globex")]);
        let rows = store.read_all("Sheet1").unwrap();
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 3);
    }

    #[test]
    fn test_update_replaces_row() {
        let mut store = MemorySheetStore::with_rows("Sheet1", vec![row("Acme")]);
        store.update_row("Sheet1", 2, &row("Acme Corp")).unwrap();
        assert_eq!(store.rows("Sheet1")[0].company, "Acme Corp");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_update_outside_data_rows() {
        let mut store = MemorySheetStore::with_rows("Sheet1", vec![row("Acme")]);
        assert!(store.update_row("Sheet1", 1, &row("x")).is_err());
        assert!(store.update_row("Sheet1", 3, &row("x")).is_err());
        assert!(store.update_row("Other", 2, &row("x")).is_err());
    }

    #[test]
    fn test_injected_failures() {
        let mut store = MemorySheetStore::new();
        store.fail_writes_for("Broken");
        assert!(store.append_row("Sheet1", &row("Acme")).is_ok());
        let err = store.append_row("Sheet1", &row("Broken Co")).unwrap_err();
        assert!(!err.is_authentication());

        store.reject_reads();
        assert!(store.read_all("Sheet1").unwrap_err().is_authentication());
    }
}
