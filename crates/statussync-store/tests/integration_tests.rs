//! Integration tests for statussync-store
//!
//! These tests verify persistence of sheet rows across store instances.

use statussync_domain::traits::TabularStore;
use statussync_domain::{SheetRow, FIRST_DATA_ROW};
use statussync_store::{SqliteSheetStore, StoreError};
use tempfile::TempDir;

fn row(status: &str, company: &str, position: &str) -> SheetRow {
    SheetRow::from_cells(&[status, company, position, "unknown", "unknown"])
}

#[test]
fn test_store_initialization() {
    let store = SqliteSheetStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_append_then_read_preserves_order() {
    let mut store = SqliteSheetStore::in_memory().unwrap();
    store.append_row("Sheet1", &row("applied", "Acme", "Engineer")).unwrap();
    store.append_row("Sheet1", &row("interview", "Globex", "Analyst")).unwrap();
    store.append_row("Sheet1", &row("rejected", "Initech", "Manager")).unwrap();

    let rows = store.read_all("Sheet1").unwrap();
    let companies: Vec<&str> = rows.iter().map(|r| r.row.company.as_str()).collect();
    assert_eq!(companies, vec!["Acme", "Globex", "Initech"]);
    let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
    assert_eq!(numbers, vec![FIRST_DATA_ROW, FIRST_DATA_ROW + 1, FIRST_DATA_ROW + 2]);
}

#[test]
fn test_update_in_place() {
    let mut store = SqliteSheetStore::in_memory().unwrap();
    store.append_row("Sheet1", &row("applied", "Acme", "Engineer")).unwrap();
    store.append_row("Sheet1", &row("applied", "Globex", "Analyst")).unwrap();

    store
        .update_row("Sheet1", 3, &row("offer", "Globex", "Analyst"))
        .unwrap();

    let rows = store.read_all("Sheet1").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row.status, "applied");
    assert_eq!(rows[1].row.status, "offer");
}

#[test]
fn test_update_missing_row_fails() {
    let mut store = SqliteSheetStore::in_memory().unwrap();
    let result = store.update_row("Sheet1", 7, &row("offer", "Acme", "Engineer"));
    assert!(matches!(result, Err(StoreError::RowOutOfRange { row: 7, .. })));
}

#[test]
fn test_rows_persist_across_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statussync.db");

    {
        let mut store = SqliteSheetStore::new(&path).unwrap();
        store.append_row("Sheet1", &row("applied", "Acme", "Engineer")).unwrap();
    }

    let mut store = SqliteSheetStore::new(&path).unwrap();
    store.append_row("Sheet1", &row("interview", "Globex", "Analyst")).unwrap();

    let rows = store.read_all("Sheet1").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].row_number, 3);
    assert!(store.header("Sheet1").unwrap().is_some());
}

#[test]
fn test_empty_cells_round_trip() {
    let mut store = SqliteSheetStore::in_memory().unwrap();
    store.append_row("Sheet1", &SheetRow::from_cells(&["applied", "Acme"])).unwrap();

    let rows = store.read_all("Sheet1").unwrap();
    assert_eq!(rows[0].row.position, "");
    assert_eq!(rows[0].row.action_date, "");
}
