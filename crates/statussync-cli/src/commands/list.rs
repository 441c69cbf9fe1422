//! List command implementation.

use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use statussync_domain::traits::TabularStore;
use statussync_store::SqliteSheetStore;

/// Execute the list command.
pub async fn execute_list(args: ListArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let sheet = args.sheet.unwrap_or_else(|| config.pipeline.sheet_name.clone());
    let rows = if config.store.path.exists() {
        let store = SqliteSheetStore::new(&config.store.path)?;
        store.read_all(&sheet)?
    } else {
        Vec::new()
    };

    println!("{}", formatter.format_rows(&rows)?);
    Ok(())
}
