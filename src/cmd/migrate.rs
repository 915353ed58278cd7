//! Migrate command: offline SQL script from DDL plus CSV data.

use super::{read_ddl, write_output};
use anyhow::{bail, Result};
use sheet_migrate::migrate::{CsvSource, MigrateConfig, MigrateYamlConfig, MigrationPlan};
use std::path::PathBuf;
use tracing::warn;

pub struct MigrateArgs {
    pub ddl: PathBuf,
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub database_name: Option<String>,
    pub no_drop: bool,
    pub no_transaction: bool,
    pub batch_size: Option<usize>,
    pub dry_run: bool,
    pub json: bool,
}

pub fn run(args: MigrateArgs) -> Result<()> {
    let yaml = args
        .config
        .as_deref()
        .map(MigrateYamlConfig::load)
        .transpose()?;
    let mut config = MigrateConfig::from_yaml(yaml);

    if let Some(name) = args.database_name {
        config.database_name = name;
    }
    if args.no_drop {
        config.drop_existing = false;
    }
    if args.no_transaction {
        config.transaction = false;
    }
    if let Some(size) = args.batch_size {
        config.batch_size = size.max(1);
    }

    // Unreadable files are reported, not fatal, as long as one file loads
    let mut sources = Vec::new();
    let mut load_errors = Vec::new();
    for file in &args.files {
        match CsvSource::from_path(file) {
            Ok(source) => sources.push(source),
            Err(e) => {
                warn!("{:#}", e);
                load_errors.push(format!("Failed to read file {}: {:#}", file.display(), e));
            }
        }
    }
    if sources.is_empty() {
        bail!("No files could be loaded");
    }

    let ddl = read_ddl(&args.ddl)?;
    if ddl.is_empty() {
        bail!("DDL file is empty: {}", args.ddl.display());
    }

    let mut plan = MigrationPlan::build(&ddl, &sources, config);
    for error in load_errors {
        plan.push_error(error);
    }

    // With --json and no output file, stdout carries only the report
    let write_script = !args.dry_run && (args.output.is_some() || !args.json);
    if write_script {
        write_output(args.output.as_deref(), &plan.render_script())?;
    }

    let report = plan.report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!(
            "\n{}Migration: {} tables, {} rows from {} files",
            if args.dry_run { "[dry run] " } else { "" },
            report.tables_created.len(),
            plan.total_rows(),
            plan.inserts.len()
        );
        for (source, rows) in &report.rows_inserted {
            eprintln!("  {}: {} rows", source, rows);
        }
        for error in &report.errors {
            eprintln!("  error: {}", error);
        }
    }

    Ok(())
}
