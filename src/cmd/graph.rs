//! Graph command implementation for ERD generation.

use super::{parse_patterns, read_ddl, write_output};
use anyhow::Result;
use sheet_migrate::graph::{render, GraphView, Layout, OutputFormat};
use sheet_migrate::schema::parse_ddl;
use std::path::PathBuf;
use tracing::debug;

pub struct GraphArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub layout: Option<String>,
    pub tables: Option<String>,
    pub exclude: Option<String>,
    pub table: Option<String>,
    pub depth: usize,
    pub json: bool,
}

/// Run the graph command
pub fn run(args: GraphArgs) -> Result<()> {
    let format = if args.json {
        OutputFormat::Json
    } else if let Some(ref f) = args.format {
        f.parse().map_err(|e| anyhow::anyhow!("{}", e))?
    } else if let Some(ref out) = args.output {
        out.extension()
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_extension)
            .unwrap_or_default()
    } else {
        OutputFormat::default()
    };

    let layout: Layout = args
        .layout
        .map(|l| l.parse())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}", e))?
        .unwrap_or_default();

    let ddl = read_ddl(&args.file)?;
    let tables = parse_ddl(&ddl);
    debug!(tables = tables.len(), "parsed DDL");

    let mut view = GraphView::from_tables(&tables);
    view.filter_tables(&parse_patterns(args.tables.as_deref()));
    view.exclude_tables(&parse_patterns(args.exclude.as_deref()));
    if let Some(ref table) = args.table {
        view.focus_table(table, args.depth);
    }

    if view.is_empty() && format != OutputFormat::Json {
        eprintln!("No schema to display.");
        return Ok(());
    }

    let content = render(&view, format, layout);
    write_output(args.output.as_deref(), &content)?;

    if format != OutputFormat::Json {
        eprintln!(
            "\nERD: {} tables, {} columns, {} relationships",
            view.table_count(),
            view.column_count(),
            view.edge_count()
        );
    }

    Ok(())
}
