//! Relations command: flat foreign-key relationship summary.

use super::read_ddl;
use anyhow::Result;
use sheet_migrate::schema::{derive_relationships, parse_ddl};
use std::path::PathBuf;

pub fn run(file: PathBuf, json: bool) -> Result<()> {
    let ddl = read_ddl(&file)?;
    let relationships = derive_relationships(&parse_ddl(&ddl));

    if json {
        println!("{}", serde_json::to_string_pretty(&relationships)?);
        return Ok(());
    }

    if relationships.is_empty() {
        eprintln!("No relationships found.");
        return Ok(());
    }

    for rel in &relationships {
        println!(
            "{}.{} -> {}.{}",
            rel.from_table, rel.from_column, rel.to_table, rel.to_column
        );
    }
    eprintln!("\n{} relationships", relationships.len());

    Ok(())
}
