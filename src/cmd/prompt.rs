//! Prompt command: schema-inference prompt from CSV files.

use super::write_output;
use anyhow::Result;
use sheet_migrate::migrate::CsvSource;
use sheet_migrate::prompt::build_prompt;
use std::path::PathBuf;

pub fn run(files: Vec<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let sources = files
        .iter()
        .map(|f| CsvSource::from_path(f))
        .collect::<Result<Vec<_>>>()?;

    let prompt = build_prompt(&sources);
    write_output(output.as_deref(), &prompt)?;

    eprintln!("Prompt built from {} CSV files", sources.len());
    Ok(())
}
