//! Offline migration planning: DDL plus CSV data to a runnable SQL script.
//!
//! The plan mirrors what a live migration does against Postgres (drop the
//! generated tables, run the DDL, insert every CSV row) but renders it as a
//! script instead of executing it.

mod config;
mod source;

pub use config::{MigrateConfig, MigrateYamlConfig, SourceOverride, DEFAULT_DATABASE_NAME};
pub use source::CsvSource;

use crate::schema::{drop_order, find_table, parse_ddl, ColumnType, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Trailing `.N` that CSV readers append to repeated header names
static DUPLICATE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\d+$").unwrap());

/// Cell values treated as missing and written as NULL
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Map CSV header names onto the target table's columns.
///
/// Equal counts map positionally. Otherwise each header is matched to the
/// first unused column equal (ignoring case) to the header with any `.N`
/// suffix removed, or to the raw header; unmatched headers become lowercase.
pub fn map_columns(csv_columns: &[String], db_columns: &[String]) -> Vec<String> {
    if csv_columns.len() == db_columns.len() {
        return db_columns.to_vec();
    }

    let mut used = vec![false; db_columns.len()];

    csv_columns
        .iter()
        .map(|csv_col| {
            let cleaned = DUPLICATE_SUFFIX_RE.replace(csv_col, "").trim().to_lowercase();
            let raw = csv_col.to_lowercase();

            let found = db_columns.iter().enumerate().find(|(i, db_col)| {
                let db_lower = db_col.to_lowercase();
                !used[*i] && (db_lower == cleaned || db_lower == raw)
            });

            match found {
                Some((i, db_col)) => {
                    used[i] = true;
                    db_col.clone()
                }
                None => {
                    debug!(column = %csv_col, "no matching table column, using lowercase name");
                    raw
                }
            }
        })
        .collect()
}

/// Render one CSV cell as a SQL literal for a column of the given type
pub fn render_value(value: &str, col_type: &ColumnType) -> String {
    if NA_VALUES.contains(&value) {
        return "NULL".to_string();
    }

    let trimmed = value.trim();
    if col_type.is_numeric() && trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
        return trimmed.to_string();
    }
    if *col_type == ColumnType::Bool {
        match trimmed.to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "1" => return "TRUE".to_string(),
            "false" | "f" | "no" | "n" | "0" => return "FALSE".to_string(),
            _ => {}
        }
    }

    format!("'{}'", value.replace('\'', "''"))
}

/// Double-quote an identifier so reserved words and mixed case survive
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Rows destined for one table
#[derive(Debug, Clone)]
pub struct InsertBatch {
    /// CSV source name
    pub source: String,
    /// Target table as declared in the DDL
    pub table: String,
    /// Target columns, one per CSV header
    pub columns: Vec<String>,
    /// Rendered SQL literals per row
    pub rows: Vec<Vec<String>>,
}

/// Outcome summary, serialized for `--json`
#[derive(Debug, Serialize, JsonSchema)]
pub struct MigrateReport {
    pub success: bool,
    pub tables_created: Vec<String>,
    pub rows_inserted: BTreeMap<String, usize>,
    pub ddl: String,
    pub errors: Vec<String>,
}

/// A complete migration: tables to drop and create plus data to insert
#[derive(Debug, Clone)]
pub struct MigrationPlan {
    pub config: MigrateConfig,
    pub ddl: String,
    pub tables: Vec<Table>,
    pub tables_created: Vec<String>,
    pub inserts: Vec<InsertBatch>,
    pub errors: Vec<String>,
}

impl MigrationPlan {
    /// Plan a migration of `sources` into the tables declared by `ddl`
    pub fn build(ddl: &str, sources: &[CsvSource], config: MigrateConfig) -> Self {
        let tables = parse_ddl(ddl);
        let tables_created: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();
        let mut inserts = Vec::new();
        let mut errors = Vec::new();

        for source in sources {
            if config.should_skip(&source.name) {
                debug!(source = %source.name, "skipped by config");
                continue;
            }

            match plan_inserts(source, &tables, &config) {
                Ok(batch) => inserts.push(batch),
                Err(e) => {
                    warn!(source = %source.name, "{:#}", e);
                    errors.push(format!("Failed to insert data for {}: {:#}", source.name, e));
                }
            }
        }

        Self {
            config,
            ddl: ddl.to_string(),
            tables,
            tables_created,
            inserts,
            errors,
        }
    }

    /// Record a failure that happened before planning (e.g. an unreadable file)
    pub fn push_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Total rows across all sources
    pub fn total_rows(&self) -> usize {
        self.inserts.iter().map(|b| b.rows.len()).sum()
    }

    /// Summary of what the script does
    pub fn report(&self) -> MigrateReport {
        MigrateReport {
            success: self.errors.is_empty(),
            tables_created: self.tables_created.clone(),
            rows_inserted: self
                .inserts
                .iter()
                .map(|b| (b.source.clone(), b.rows.len()))
                .collect(),
            ddl: self.ddl.clone(),
            errors: self.errors.clone(),
        }
    }

    /// Render the plan as a SQL script
    pub fn render_script(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "-- Migration for database: {}\n",
            self.config.database_name
        ));
        out.push_str(&format!(
            "-- Date: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("-- Tables: {}\n", self.tables_created.join(", ")));
        out.push_str(&format!("-- Rows: {}\n", self.total_rows()));
        out.push('\n');

        if self.config.transaction {
            out.push_str("BEGIN;\n\n");
        }

        if self.config.drop_existing && !self.tables_created.is_empty() {
            for table in drop_order(&self.tables_created) {
                out.push_str(&format!(
                    "DROP TABLE IF EXISTS {} CASCADE;\n",
                    quote_ident(&table)
                ));
            }
            out.push('\n');
        }

        let ddl = self.ddl.trim();
        if !ddl.is_empty() {
            out.push_str(ddl);
            if !ddl.ends_with(';') {
                out.push(';');
            }
            out.push_str("\n\n");
        }

        for batch in &self.inserts {
            render_batch(&mut out, batch, self.config.batch_size);
        }

        if self.config.transaction {
            out.push_str("COMMIT;\n");
        }

        out
    }
}

/// Resolve a source's table, map its columns and render its rows
fn plan_inserts(
    source: &CsvSource,
    tables: &[Table],
    config: &MigrateConfig,
) -> anyhow::Result<InsertBatch> {
    let target = config.target_table(&source.name);
    let table = find_table(tables, target)
        .ok_or_else(|| anyhow::anyhow!("no table named {} in the DDL", target))?;

    let headers = source.headers()?;
    let columns = map_columns(&headers, &table.column_names());
    let types: Vec<ColumnType> = columns
        .iter()
        .map(|c| {
            table
                .column(c)
                .map(|col| col.column_type())
                .unwrap_or_else(|| ColumnType::Other(String::new()))
        })
        .collect();

    let rows = source
        .records()?
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(&types)
                .map(|(value, col_type)| render_value(value, col_type))
                .collect()
        })
        .collect();

    debug!(source = %source.name, table = %table.name, "mapped columns: {:?}", columns);

    Ok(InsertBatch {
        source: source.name.clone(),
        table: table.name.clone(),
        columns,
        rows,
    })
}

fn render_batch(out: &mut String, batch: &InsertBatch, batch_size: usize) {
    if batch.rows.is_empty() {
        return;
    }

    let columns: Vec<String> = batch.columns.iter().map(|c| quote_ident(c)).collect();
    let prefix = format!(
        "INSERT INTO {} ({}) VALUES",
        quote_ident(&batch.table),
        columns.join(", ")
    );

    for chunk in batch.rows.chunks(batch_size.max(1)) {
        let values: Vec<String> = chunk
            .iter()
            .map(|row| format!("({})", row.join(", ")))
            .collect();
        out.push_str(&format!("{} {};\n", prefix, values.join(", ")));
    }
    out.push('\n');
}
