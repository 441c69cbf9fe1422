//! SQLite-backed sheets

use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use statussync_domain::traits::TabularStore;
use statussync_domain::{SheetRow, StoredRow, FIRST_DATA_ROW, HEADER, HEADER_ROW};
use std::path::Path;
use tracing::debug;

/// SQLite-based implementation of TabularStore
///
/// Each sheet is a set of numbered rows. Row 1 holds the header and is
/// written the first time a sheet receives data.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteSheetStore instance.
pub struct SqliteSheetStore {
    conn: Connection,
}

impl SqliteSheetStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a fresh in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Write the header row of `sheet` unless one exists
    pub fn ensure_header(&mut self, sheet: &str) -> Result<(), StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO sheet_rows (sheet, row_number, status, company, position, location, action_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                sheet,
                to_sql_row(sheet, HEADER_ROW)?,
                HEADER[0],
                HEADER[1],
                HEADER[2],
                HEADER[3],
                HEADER[4],
            ],
        )?;
        if inserted > 0 {
            debug!(sheet, "Wrote header row");
        }
        Ok(())
    }

    /// Header row of `sheet`, if the sheet exists
    pub fn header(&self, sheet: &str) -> Result<Option<SheetRow>, StoreError> {
        let header = self
            .conn
            .query_row(
                "SELECT status, company, position, location, action_date
                 FROM sheet_rows WHERE sheet = ?1 AND row_number = ?2",
                params![sheet, to_sql_row(sheet, HEADER_ROW)?],
                read_cells,
            )
            .optional()?;
        Ok(header)
    }

    /// Names of all sheets holding any rows
    pub fn sheets(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT sheet FROM sheet_rows ORDER BY sheet")?;
        let sheets = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(sheets)
    }

    fn last_row_number(&self, sheet: &str) -> Result<usize, StoreError> {
        let last: Option<i64> = self.conn.query_row(
            "SELECT MAX(row_number) FROM sheet_rows WHERE sheet = ?1",
            params![sheet],
            |row| row.get(0),
        )?;
        match last {
            Some(n) => from_sql_row(n),
            None => Ok(0),
        }
    }
}

fn read_cells(row: &rusqlite::Row<'_>) -> rusqlite::Result<SheetRow> {
    Ok(SheetRow {
        status: row.get(0)?,
        company: row.get(1)?,
        position: row.get(2)?,
        location: row.get(3)?,
        action_date: row.get(4)?,
    })
}

fn to_sql_row(sheet: &str, row: usize) -> Result<i64, StoreError> {
    i64::try_from(row).map_err(|_| StoreError::RowOutOfRange {
        sheet: sheet.to_string(),
        row,
    })
}

fn from_sql_row(value: i64) -> Result<usize, StoreError> {
    usize::try_from(value).map_err(|_| StoreError::InvalidData(format!("Negative row number: {}", value)))
}

impl TabularStore for SqliteSheetStore {
    type Error = StoreError;

    fn read_all(&self, sheet: &str) -> Result<Vec<StoredRow>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT row_number, status, company, position, location, action_date
             FROM sheet_rows WHERE sheet = ?1 AND row_number >= ?2
             ORDER BY row_number",
        )?;

        let raw = stmt
            .query_map(params![sheet, to_sql_row(sheet, FIRST_DATA_ROW)?], |row| {
                let number: i64 = row.get(0)?;
                let cells = SheetRow {
                    status: row.get(1)?,
                    company: row.get(2)?,
                    position: row.get(3)?,
                    location: row.get(4)?,
                    action_date: row.get(5)?,
                };
                Ok((number, cells))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(number, cells)| Ok(StoredRow::new(from_sql_row(number)?, cells)))
            .collect()
    }

    fn append_row(&mut self, sheet: &str, row: &SheetRow) -> Result<(), Self::Error> {
        self.ensure_header(sheet)?;
        let next = (self.last_row_number(sheet)? + 1).max(FIRST_DATA_ROW);

        self.conn.execute(
            "INSERT INTO sheet_rows (sheet, row_number, status, company, position, location, action_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                sheet,
                to_sql_row(sheet, next)?,
                &row.status,
                &row.company,
                &row.position,
                &row.location,
                &row.action_date,
            ],
        )?;

        debug!(sheet, row = next, "Appended row");
        Ok(())
    }

    fn update_row(&mut self, sheet: &str, row_number: usize, row: &SheetRow) -> Result<(), Self::Error> {
        if row_number < FIRST_DATA_ROW {
            return Err(StoreError::RowOutOfRange {
                sheet: sheet.to_string(),
                row: row_number,
            });
        }

        let changed = self.conn.execute(
            "UPDATE sheet_rows
             SET status = ?3, company = ?4, position = ?5, location = ?6, action_date = ?7
             WHERE sheet = ?1 AND row_number = ?2",
            params![
                sheet,
                to_sql_row(sheet, row_number)?,
                &row.status,
                &row.company,
                &row.position,
                &row.location,
                &row.action_date,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::RowOutOfRange {
                sheet: sheet.to_string(),
                row: row_number,
            });
        }

        debug!(sheet, row = row_number, "Updated row");
        Ok(())
    }
}
