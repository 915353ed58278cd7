//! Plain text listing of tables and the relationships summary.

use crate::graph::view::GraphView;

/// Generate a human-readable schema listing
pub fn to_text(view: &GraphView) -> String {
    if view.is_empty() {
        return "No schema to display\n".to_string();
    }

    let mut output = String::new();

    for table in &view.tables {
        output.push_str(&format!("{} ({} columns)\n", table.name, table.columns.len()));

        let name_width = table
            .columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0);

        for col in &table.columns {
            let mut markers = Vec::new();
            if col.is_primary_key {
                markers.push("PK".to_string());
            }
            if col.is_foreign_key {
                match &col.references {
                    Some(target) => markers.push(format!("FK -> {}", target)),
                    None => markers.push("FK".to_string()),
                }
            }

            let line = format!(
                "  {:<width$}  {}",
                col.name,
                col.col_type,
                width = name_width
            );
            if markers.is_empty() {
                output.push_str(&format!("{}\n", line));
            } else {
                output.push_str(&format!("{}  [{}]\n", line, markers.join(", ")));
            }
        }

        output.push('\n');
    }

    output.push_str(&format!("Relationships ({}):\n", view.edge_count()));
    if view.edges.is_empty() {
        output.push_str("  (none)\n");
    }
    for edge in &view.edges {
        output.push_str(&format!(
            "  {}.{} -> {}.{}\n",
            edge.from_table, edge.from_column, edge.to_table, edge.to_column
        ));
    }

    output
}
