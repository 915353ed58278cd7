//! Display-oriented schema model extracted from generated DDL.
//!
//! This module provides:
//! - Data models for tables and columns as they appear in the DDL text
//! - Regex-based `CREATE TABLE` parsing (best effort, never fails)
//! - Derivation of a flat foreign-key relationship list

mod ddl;
mod relationships;

pub use ddl::*;
pub use relationships::*;

use serde::Serialize;

/// SQL column type classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Integer types: INT, INTEGER, SMALLINT, SERIAL
    Int,
    /// Big integer types: BIGINT, BIGSERIAL
    BigInt,
    /// Text types: CHAR, VARCHAR, TEXT, etc.
    Text,
    /// UUID types
    Uuid,
    /// Decimal/numeric types
    Decimal,
    /// Date/time types
    DateTime,
    /// Boolean type
    Bool,
    /// Any other type
    Other(String),
}

impl ColumnType {
    /// Parse a SQL type string into a ColumnType
    pub fn from_sql_type(type_str: &str) -> Self {
        let type_lower = type_str.to_lowercase();
        let base_type = type_lower
            .split(|c: char| c == '(' || c == '[')
            .next()
            .unwrap_or(&type_lower)
            .trim();

        match base_type {
            "int" | "integer" | "smallint" | "int4" | "int2" | "serial" | "smallserial" => {
                ColumnType::Int
            }
            "bigint" | "int8" | "bigserial" => ColumnType::BigInt,
            "char" | "varchar" | "text" | "character" | "character varying" | "citext" => {
                ColumnType::Text
            }
            "decimal" | "numeric" | "float" | "double" | "double precision" | "real"
            | "float4" | "float8" | "money" => ColumnType::Decimal,
            "date" | "timestamp" | "time" | "timestamptz" | "timetz" | "interval" => {
                ColumnType::DateTime
            }
            "bool" | "boolean" => ColumnType::Bool,
            "uuid" => ColumnType::Uuid,
            _ if base_type.starts_with("timestamp") || base_type.starts_with("time ") => {
                ColumnType::DateTime
            }
            _ => ColumnType::Other(type_str.to_string()),
        }
    }

    /// Whether literal values of this type can be written without quotes
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Int | ColumnType::BigInt | ColumnType::Decimal
        )
    }
}

/// Column as declared in a `CREATE TABLE` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name, quoting stripped
    pub name: String,
    /// Declared type exactly as written (e.g. `VARCHAR(255)`)
    #[serde(rename = "type")]
    pub col_type: String,
    /// Set by an inline `PRIMARY KEY` or a table-level `PRIMARY KEY (...)`
    pub is_primary_key: bool,
    /// Set by an inline `REFERENCES` or a table-level `FOREIGN KEY (...)`
    pub is_foreign_key: bool,
    /// Referenced table name when this column is a foreign key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

impl Column {
    /// Create a plain column with no key flags
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            col_type: col_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            references: None,
        }
    }

    /// Classify the declared type
    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_sql_type(&self.col_type)
    }
}

/// Table parsed from one `CREATE TABLE` statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Table name as written, quoting and schema prefix stripped
    pub name: String,
    /// Columns in order of appearance
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Get a column by name (case-insensitive, first match)
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get a mutable column by name (case-insensitive, first match)
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Columns flagged as primary key, in declaration order
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// Columns flagged as foreign key, in declaration order
    pub fn foreign_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_foreign_key)
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Find a table by name (case-insensitive)
pub fn find_table<'a>(tables: &'a [Table], name: &str) -> Option<&'a Table> {
    tables.iter().find(|t| t.name == name).or_else(|| {
        tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    })
}
