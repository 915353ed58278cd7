//! Schema command: JSON Schemas of the --json outputs.

use anyhow::{bail, Result};
use sheet_migrate::json_schema::{all_schemas, get_schema, schema_names};

pub fn run(command: Option<String>) -> Result<()> {
    let output = match command {
        Some(name) => match get_schema(&name) {
            Some(schema) => serde_json::to_string_pretty(&schema)?,
            None => bail!(
                "no schema for '{}'. Available: {}",
                name,
                schema_names().join(", ")
            ),
        },
        None => serde_json::to_string_pretty(&all_schemas())?,
    };

    println!("{}", output);
    Ok(())
}
