//! Tables command: creation and drop order of the declared tables.

use super::read_ddl;
use anyhow::Result;
use sheet_migrate::schema::TableOrder;
use std::path::PathBuf;

pub fn run(file: PathBuf, json: bool) -> Result<()> {
    let ddl = read_ddl(&file)?;
    let order = TableOrder::from_ddl(&ddl);

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
        return Ok(());
    }

    if order.tables.is_empty() {
        eprintln!("No tables found.");
        return Ok(());
    }

    println!("Create order:");
    for (i, table) in order.tables.iter().enumerate() {
        println!("  {}. {}", i + 1, table);
    }
    println!("Drop order:");
    for (i, table) in order.drop_order.iter().enumerate() {
        println!("  {}. {}", i + 1, table);
    }

    Ok(())
}
