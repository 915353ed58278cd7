pub mod graph;
pub mod json_schema;
pub mod migrate;
pub mod prompt;
pub mod schema;
