//! JSON Schema generation for CLI output types.
//!
//! Schemas are generated with the schemars crate and exported via the
//! `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas for commands that support --json output.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // graph command
    schemas.insert("graph", schema_for!(crate::graph::format::ErdJson));

    // relations command
    schemas.insert(
        "relations",
        schema_for!(Vec<crate::schema::Relationship>),
    );

    // tables command
    schemas.insert("tables", schema_for!(crate::schema::TableOrder));

    // migrate command
    schemas.insert("migrate", schema_for!(crate::migrate::MigrateReport));

    schemas
}

/// Generate a single schema by command name.
pub fn get_schema(command: &str) -> Option<Schema> {
    all_schemas().remove(command)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
