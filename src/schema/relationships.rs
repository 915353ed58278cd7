//! Flat relationship list derived from foreign-key columns.

use super::Table;
use schemars::JsonSchema;
use serde::Serialize;

/// Column the relationship summary assumes every foreign key points at
pub const ASSUMED_TARGET_COLUMN: &str = "id";

/// A foreign-key edge between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Relationship {
    /// Table holding the foreign-key column
    pub from_table: String,
    /// Foreign-key column
    pub from_column: String,
    /// Referenced table (may not exist among the parsed tables)
    pub to_table: String,
    /// Referenced column, always [`ASSUMED_TARGET_COLUMN`]
    pub to_column: String,
}

/// Emit one relationship per foreign-key column with a non-empty target.
///
/// The referenced column is not tracked by the parser, so every edge points
/// at `id`. No deduplication and no check that the target exists.
pub fn derive_relationships(tables: &[Table]) -> Vec<Relationship> {
    tables
        .iter()
        .flat_map(|table| {
            table.columns.iter().filter_map(move |col| {
                let target = col.references.as_deref().filter(|t| !t.is_empty())?;
                if !col.is_foreign_key {
                    return None;
                }
                Some(Relationship {
                    from_table: table.name.clone(),
                    from_column: col.name.clone(),
                    to_table: target.to_string(),
                    to_column: ASSUMED_TARGET_COLUMN.to_string(),
                })
            })
        })
        .collect()
}
