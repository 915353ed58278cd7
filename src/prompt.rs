//! Schema-inference prompt construction and response cleanup.
//!
//! The model itself is called elsewhere; this module only builds the
//! instruction text from CSV files and strips Markdown fences from the reply.

use crate::migrate::CsvSource;

/// Rules the model must follow when proposing DDL
const PROMPT_RULES: &str = "\
Based on this data, generate:
1. CREATE TABLE statements with appropriate data types
2. Primary keys for each table
3. Foreign key constraints where relationships exist between tables
4. Do NOT add NOT NULL constraints except for primary key columns - the sample data may not show all possible null values

Requirements:
- CRITICAL: Copy column names EXACTLY as they appear in the CSV header row. Do NOT modify, rename, or correct column names in any way.
- Wrap ALL column names in double quotes to preserve exact names (e.g., \"Code\", \"10/1 UCLA\", \"PHQ TOTAL \")
- Be CONSERVATIVE with types - if a column has ANY non-numeric values, use VARCHAR(255) or TEXT
- Only use INTEGER/DECIMAL if ALL values in the column are clearly numeric
- For money/prices, use DECIMAL(10,2)
- Use VARCHAR(255) as the default when uncertain
- Add foreign key constraints where you see obvious relationships
- Use the CSV filename (without extension) as the table name
- If there are duplicate column names, append a number like \"Column 2\", \"Column 3\" etc.

Output ONLY valid PostgreSQL DDL. No explanations, just SQL.";

/// Build the schema-inference prompt for a set of CSV files
pub fn build_prompt(sources: &[CsvSource]) -> String {
    let sections: Vec<String> = sources
        .iter()
        .map(|s| format!("=== {}.csv ===\n{}", s.name, s.content))
        .collect();

    format!(
        "You are a database architect. Analyze these CSV files and generate PostgreSQL DDL.\n\n{}\n\n{}",
        sections.join("\n\n"),
        PROMPT_RULES
    )
}

/// Strip Markdown code fences from a model reply.
///
/// Only replies that open with a fence are touched; then every line starting
/// with three backticks is dropped. The result is trimmed either way.
pub fn clean_response(reply: &str) -> String {
    if reply.starts_with("```") {
        reply
            .lines()
            .filter(|line| !line.starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    } else {
        reply.trim().to_string()
    }
}
