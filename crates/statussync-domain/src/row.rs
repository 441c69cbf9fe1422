//! Row module - the sheet representation of application records

use crate::key::UniqueKey;
use crate::record::ApplicationStatusRecord;

/// Column headers, in sheet order
pub const HEADER: [&str; 5] = ["Status", "Company", "Position", "Location", "Action Date"];

/// Row number of the header row
pub const HEADER_ROW: usize = 1;

/// Row number of the first data row
pub const FIRST_DATA_ROW: usize = 2;

/// One sheet row: `[Status, Company, Position, Location, Action Date]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetRow {
    /// Status column
    pub status: String,

    /// Company column
    pub company: String,

    /// Position column
    pub position: String,

    /// Location column
    pub location: String,

    /// Action Date column
    pub action_date: String,
}

impl SheetRow {
    /// Render a record for writing, with absent fields as `"unknown"`
    pub fn from_record(record: &ApplicationStatusRecord) -> Self {
        Self {
            status: record.status.as_str().to_string(),
            company: record.company().to_string(),
            position: record.position().to_string(),
            location: record.location().to_string(),
            action_date: record.date().to_string(),
        }
    }

    /// Build a row from raw cells, padding missing trailing cells with ""
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Self {
        let cell = |i: usize| {
            cells
                .get(i)
                .map(|c| c.as_ref().to_string())
                .unwrap_or_default()
        };
        Self {
            status: cell(0),
            company: cell(1),
            position: cell(2),
            location: cell(3),
            action_date: cell(4),
        }
    }

    /// Cells in column order
    pub fn to_cells(&self) -> [String; 5] {
        [
            self.status.clone(),
            self.company.clone(),
            self.position.clone(),
            self.location.clone(),
            self.action_date.clone(),
        ]
    }

    /// Key of the application this row tracks
    pub fn unique_key(&self) -> UniqueKey {
        UniqueKey::new(&self.company, &self.position)
    }
}

/// A row read back from a tabular store, with its position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// 1-based row number; data rows start at [`FIRST_DATA_ROW`]
    pub row_number: usize,

    /// Row contents
    pub row: SheetRow,
}

impl StoredRow {
    /// Create a stored row
    pub fn new(row_number: usize, row: SheetRow) -> Self {
        Self { row_number, row }
    }

    /// Key of the application this row tracks
    pub fn unique_key(&self) -> UniqueKey {
        self.row.unique_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ApplicationStatus;

    #[test]
    fn test_from_record_renders_sentinel() {
        let record = ApplicationStatusRecord::new("Acme", "Engineer", ApplicationStatus::Applied);
        let row = SheetRow::from_record(&record);
        assert_eq!(
            row.to_cells(),
            ["applied", "Acme", "Engineer", "unknown", "unknown"].map(String::from)
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let row = SheetRow::from_cells(&["rejected", "Acme", "Engineer"]);
        assert_eq!(row.location, "");
        assert_eq!(row.action_date, "");
        assert_eq!(row.unique_key().as_str(), "acme|engineer");
    }

    #[test]
    fn test_header_order() {
        assert_eq!(HEADER[0], "Status");
        assert_eq!(HEADER[4], "Action Date");
        assert!(FIRST_DATA_ROW > HEADER_ROW);
    }
}
