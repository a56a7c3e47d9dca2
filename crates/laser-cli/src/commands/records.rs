use anyhow::{Context, Result};
use laser_core::{Config, JsonFileStore, RecordStore};

use crate::view::format_records_table;

/// Print the records table from the configured file
pub fn run(config: &Config) -> Result<()> {
    let store = JsonFileStore::new(&config.records.path);
    let book = store
        .load()
        .with_context(|| format!("failed to read records from {:?}", store.path()))?;

    println!("{}", format_records_table(&book));
    Ok(())
}
