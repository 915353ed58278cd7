//! Integration tests for the graph, relations and tables commands.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn get_binary_path() -> String {
    std::env::var("CARGO_BIN_EXE_sheet-migrate")
        .unwrap_or_else(|_| "target/debug/sheet-migrate".to_string())
}

fn create_test_ddl(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("schema.sql");
    fs::write(
        &path,
        r#"```sql
CREATE TABLE "customers" (
    "id" SERIAL PRIMARY KEY,
    "name" VARCHAR(255),
    "email" VARCHAR(255)
);

CREATE TABLE "orders" (
    "id" SERIAL PRIMARY KEY,
    "customer_id" INTEGER,
    "total" DECIMAL(10,2),
    FOREIGN KEY ("customer_id") REFERENCES "customers"("id")
);

CREATE TABLE "order_items" (
    "id" SERIAL PRIMARY KEY,
    "order_id" INTEGER,
    "product_id" INTEGER,
    FOREIGN KEY ("order_id") REFERENCES "orders"("id"),
    FOREIGN KEY ("product_id") REFERENCES "products"("id")
);

CREATE TABLE "audit_log" (
    "id" SERIAL PRIMARY KEY,
    "message" TEXT
);
```
"#,
    )
    .unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_graph_mermaid_to_stdout() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("erDiagram"));
    assert!(out.contains("    customers {"));
    assert!(out.contains("        SERIAL id PK"));
    assert!(out.contains("        INTEGER customer_id FK"));
    assert!(out.contains("        DECIMAL total"));
    assert!(out.contains("    orders }o--|| customers : \"customer_id\""));
    assert!(out.contains("    order_items }o--|| products : \"product_id\""));
    assert!(stderr(&output).contains("ERD: 4 tables, 11 columns, 3 relationships"));
}

#[test]
fn test_graph_format_from_output_extension() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);
    let out_path = dir.path().join("schema.dot");

    let output = run(&[
        "graph",
        ddl.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Written to:"));

    let content = fs::read_to_string(&out_path).unwrap();
    assert!(content.starts_with("digraph ERD {"));
    assert!(content.contains("rankdir=LR;"));
    assert!(content.contains("customers"));
}

#[test]
fn test_graph_dot_layout_tb() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap(), "-f", "dot", "--layout", "tb"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("rankdir=TB;"));
}

#[test]
fn test_graph_json_output() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["stats"]["table_count"], 4);
    assert_eq!(json["stats"]["relationship_count"], 3);
    assert_eq!(json["tables"][1]["name"], "orders");
    assert_eq!(json["tables"][1]["columns"][1]["references"], "customers");
    assert_eq!(json["relationships"][0]["to_column"], "id");
}

#[test]
fn test_graph_text_output() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap(), "-f", "text"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("orders (3 columns)"));
    assert!(out.contains("[FK -> customers]"));
    assert!(out.contains("Relationships (3):"));
    assert!(out.contains("  orders.customer_id -> customers.id"));
}

#[test]
fn test_graph_exclude_keeps_other_tables() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap(), "-e", "audit*", "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["stats"]["table_count"], 3);
    assert_eq!(json["stats"]["relationship_count"], 3);
}

#[test]
fn test_graph_filter_drops_edges_to_excluded_tables() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap(), "-t", "order*", "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["stats"]["table_count"], 2);
    // orders -> customers is gone, order_items -> orders and the dangling
    // order_items -> products remain
    assert_eq!(json["stats"]["relationship_count"], 2);
}

#[test]
fn test_graph_focus_table() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&[
        "graph",
        ddl.to_str().unwrap(),
        "--table",
        "customers",
        "--depth",
        "1",
        "--json",
    ]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let names: Vec<&str> = json["tables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["customers", "orders"]);
}

#[test]
fn test_graph_empty_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.sql");
    fs::write(&path, "I could not infer a schema.").unwrap();

    let output = run(&["graph", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("No schema to display."));
}

#[test]
fn test_graph_missing_file_fails() {
    let output = run(&["graph", "/nonexistent/schema.sql"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("input file does not exist"));
}

#[test]
fn test_graph_invalid_format_fails() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["graph", ddl.to_str().unwrap(), "-f", "png"]);
    assert!(!output.status.success());
}

#[test]
fn test_relations_text_output() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["relations", ddl.to_str().unwrap()]);
    assert!(output.status.success());

    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "orders.customer_id -> customers.id",
            "order_items.order_id -> orders.id",
            "order_items.product_id -> products.id",
        ]
    );
    assert!(stderr(&output).contains("3 relationships"));
}

#[test]
fn test_relations_json_output() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["relations", ddl.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let rels = json.as_array().unwrap();
    assert_eq!(rels.len(), 3);
    assert_eq!(rels[0]["from_table"], "orders");
    assert_eq!(rels[0]["from_column"], "customer_id");
    assert_eq!(rels[0]["to_table"], "customers");
    assert_eq!(rels[0]["to_column"], "id");
}

#[test]
fn test_relations_none_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flat.sql");
    fs::write(&path, "CREATE TABLE a (id INT PRIMARY KEY);").unwrap();

    let output = run(&["relations", path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("No relationships found."));
}

#[test]
fn test_tables_order_output() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["tables", ddl.to_str().unwrap()]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("Create order:\n  1. customers\n  2. orders"));
    assert!(out.contains("Drop order:\n  1. audit_log\n  2. order_items"));
}

#[test]
fn test_tables_json_output() {
    let dir = TempDir::new().unwrap();
    let ddl = create_test_ddl(&dir);

    let output = run(&["tables", ddl.to_str().unwrap(), "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json["tables"],
        serde_json::json!(["customers", "orders", "order_items", "audit_log"])
    );
    assert_eq!(
        json["drop_order"],
        serde_json::json!(["audit_log", "order_items", "orders", "customers"])
    );
}

#[test]
fn test_completions() {
    let output = run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("sheet-migrate"));
}
