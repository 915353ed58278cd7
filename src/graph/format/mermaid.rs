//! Mermaid erDiagram format output.

use crate::graph::view::{GraphView, MANY_TO_ONE};

/// Generate Mermaid erDiagram from a graph view
pub fn to_mermaid(view: &GraphView) -> String {
    let mut output = String::new();

    output.push_str("erDiagram\n");

    for table in &view.tables {
        let safe_name = escape_mermaid_id(&table.name);
        output.push_str(&format!("    {} {{\n", safe_name));

        for col in &table.columns {
            let key_marker = match (col.is_primary_key, col.is_foreign_key) {
                (true, true) => "PK, FK",
                (true, false) => "PK",
                (false, true) => "FK",
                (false, false) => "",
            };

            let col_type = escape_mermaid_type(&col.col_type);
            let col_name = escape_mermaid_id(&col.name);

            if key_marker.is_empty() {
                output.push_str(&format!("        {} {}\n", col_type, col_name));
            } else {
                output.push_str(&format!(
                    "        {} {} {}\n",
                    col_type, col_name, key_marker
                ));
            }
        }

        output.push_str("    }\n");
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    for edge in &view.edges {
        let from = escape_mermaid_id(&edge.from_table);
        let to = escape_mermaid_id(&edge.to_table);

        output.push_str(&format!(
            "    {} {} {} : \"{}\"\n",
            from,
            MANY_TO_ONE,
            to,
            edge.from_column.replace('"', "'")
        ));
    }

    output
}

/// Escape a string for use as a Mermaid entity or attribute name
fn escape_mermaid_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Escape a type string for Mermaid (no spaces, no parameters)
fn escape_mermaid_type(s: &str) -> String {
    let base = match s.find('(') {
        Some(paren_pos) => &s[..paren_pos],
        None => s,
    };
    base.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::view::tests::create_test_view;
    use crate::schema::parse_ddl;

    #[test]
    fn test_mermaid_er_diagram() {
        let view = create_test_view();
        let output = to_mermaid(&view);

        assert!(output.starts_with("erDiagram\n"));
        assert!(output.contains("users {"));
        assert!(output.contains("orders {"));
        assert!(output.find("users {").unwrap() < output.find("orders {").unwrap());
    }

    #[test]
    fn test_mermaid_columns() {
        let view = create_test_view();
        let output = to_mermaid(&view);

        assert!(output.contains("SERIAL id PK"));
        assert!(output.contains("INTEGER user_id FK"));
        assert!(output.contains("VARCHAR email\n"));
        assert!(output.contains("DECIMAL total\n"));
    }

    #[test]
    fn test_mermaid_relationships() {
        let view = create_test_view();
        let output = to_mermaid(&view);

        assert!(output.contains("orders }o--|| users : \"user_id\""));
    }

    #[test]
    fn test_mermaid_escapes_spaced_names() {
        let tables = parse_ddl(r#"CREATE TABLE "survey" ("PHQ TOTAL " INTEGER, "10/1 UCLA" DOUBLE PRECISION);"#);
        let output = to_mermaid(&GraphView::from_tables(&tables));

        assert!(output.contains("INTEGER PHQ_TOTAL_"));
        assert!(output.contains("DOUBLE_PRECISION 10_1_UCLA"));
    }
}
