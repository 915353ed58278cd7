mod graph;
mod migrate;
mod prompt;
mod relations;
mod schema;
mod tables;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use sheet_migrate::prompt::clean_response;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheet-migrate")]
#[command(version)]
#[command(
    about = "Turn model-generated Postgres DDL into ER diagrams and offline migration scripts for spreadsheet data",
    long_about = None
)]
pub struct Cli {
    /// Verbose diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render an entity-relationship diagram from a DDL file
    Graph {
        /// DDL file (use - for stdin). Markdown code fences are stripped.
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: mermaid, dot, json, text (default: from output extension, else mermaid)
        #[arg(short, long)]
        format: Option<String>,

        /// Layout direction for DOT output: lr, tb
        #[arg(long)]
        layout: Option<String>,

        /// Only include tables matching these glob patterns (comma-separated)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude tables matching these glob patterns (comma-separated)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Focus on one table and its neighbours
        #[arg(long)]
        table: Option<String>,

        /// Relationship hops to include around --table
        #[arg(long, default_value = "1", requires = "table")]
        depth: usize,

        /// Output JSON (same as --format json)
        #[arg(long)]
        json: bool,
    },

    /// List foreign-key relationships declared in a DDL file
    Relations {
        /// DDL file (use - for stdin)
        file: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List tables a DDL file creates, with the order to drop them in
    Tables {
        /// DDL file (use - for stdin)
        file: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the schema-inference prompt for a set of CSV files
    Prompt {
        /// CSV files; each file stem becomes a table name
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a SQL script that recreates the DDL tables and loads CSV data
    Migrate {
        /// DDL file (use - for stdin)
        ddl: PathBuf,

        /// CSV files to load; each file stem names its target table
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output SQL file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML config file with script settings and per-source overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Database name written to the script header
        #[arg(long)]
        database_name: Option<String>,

        /// Do not drop existing tables before creating them
        #[arg(long)]
        no_drop: bool,

        /// Do not wrap the script in a transaction
        #[arg(long)]
        no_transaction: bool,

        /// Rows per INSERT statement
        #[arg(long)]
        batch_size: Option<usize>,

        /// Plan only: report what would be migrated without writing the script
        #[arg(long)]
        dry_run: bool,

        /// Output the migration report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for --json outputs
    Schema {
        /// Command name (graph, relations, tables, migrate); all when omitted
        command: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Graph {
            file,
            output,
            format,
            layout,
            tables,
            exclude,
            table,
            depth,
            json,
        } => graph::run(graph::GraphArgs {
            file,
            output,
            format,
            layout,
            tables,
            exclude,
            table,
            depth,
            json,
        }),
        Commands::Relations { file, json } => relations::run(file, json),
        Commands::Tables { file, json } => tables::run(file, json),
        Commands::Prompt { files, output } => prompt::run(files, output),
        Commands::Migrate {
            ddl,
            files,
            output,
            config,
            database_name,
            no_drop,
            no_transaction,
            batch_size,
            dry_run,
            json,
        } => migrate::run(migrate::MigrateArgs {
            ddl,
            files,
            output,
            config,
            database_name,
            no_drop,
            no_transaction,
            batch_size,
            dry_run,
            json,
        }),
        Commands::Schema { command } => schema::run(command),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "sheet-migrate",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

/// Read a DDL file (or stdin for `-`) and strip Markdown fences
pub(crate) fn read_ddl(path: &Path) -> anyhow::Result<String> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read DDL from stdin")?;
        buf
    } else {
        if !path.exists() {
            anyhow::bail!("input file does not exist: {}", path.display());
        }
        fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok(clean_response(&raw))
}

/// Write content to a file, or to stdout when no path is given
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(content.as_bytes())?;
            eprintln!("Written to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Split a comma-separated list of glob patterns, dropping invalid ones
pub(crate) fn parse_patterns(list: Option<&str>) -> Vec<glob::Pattern> {
    list.map(|l| {
        l.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, "ignoring invalid pattern: {}", e);
                    None
                }
            })
            .collect()
    })
    .unwrap_or_default()
}
