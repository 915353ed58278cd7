//! Regex-based parsing of `CREATE TABLE` statements.
//!
//! The parser is meant for display: it extracts tables, columns and key
//! markers from model-generated DDL and silently skips anything it does not
//! recognise. It does not validate SQL.

use super::{Column, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::debug;

/// One identifier: "double", `backtick`, [bracket] quoted, or bare
const IDENT: &str = r#"(?:"[^"]+"|`[^`]+`|\[[^\]]+\]|[\w$]+)"#;

/// Regex for a CREATE TABLE header up to the opening parenthesis of the body.
/// Schema qualifiers (`public.orders`) are matched and dropped.
static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bCREATE\s+(?:(?:GLOBAL|LOCAL)\s+)?(?:(?:TEMP|TEMPORARY|UNLOGGED)\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:{IDENT}\s*\.\s*)*({IDENT})\s*\("
    ))
    .unwrap()
});

/// Regex for a table-level constraint clause
static CONSTRAINT_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:PRIMARY\s+KEY|FOREIGN\s+KEY|UNIQUE|CHECK|CONSTRAINT)\b").unwrap()
});

/// Regex for a column definition: name followed by its type.
/// The type keeps parameters, multi-word forms and array suffixes.
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?is)^\s*({IDENT})\s+([A-Za-z_]\w*(?:\s+(?:VARYING|PRECISION))?(?:\s*\([^)]*\))?(?:\s+WITH(?:OUT)?\s+TIME\s+ZONE)?(?:\s*\[\s*\d*\s*\])*)"
    ))
    .unwrap()
});

/// Regex for table-level PRIMARY KEY (cols)
static PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PRIMARY\s+KEY\s*\(([^)]*)\)").unwrap());

/// Regex for table-level FOREIGN KEY (cols) REFERENCES target, referenced columns optional
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)FOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+(?:{IDENT}\s*\.\s*)*({IDENT})"
    ))
    .unwrap()
});

/// Regex for inline PRIMARY KEY on a column
static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// Regex for inline REFERENCES target on a column
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bREFERENCES\s+(?:{IDENT}\s*\.\s*)*({IDENT})"
    ))
    .unwrap()
});

/// Parse every `CREATE TABLE` statement in `ddl`, in source order.
///
/// Never fails: malformed statements are skipped and unrecognised clauses
/// are ignored, so empty or non-SQL input yields an empty vector.
pub fn parse_ddl(ddl: &str) -> Vec<Table> {
    let stripped = strip_comments(ddl);
    let ddl = stripped.as_str();
    let mut tables = Vec::new();
    let mut pos = 0;

    while let Some(caps) = CREATE_TABLE_RE.captures_at(ddl, pos) {
        let header = caps.get(0).map(|m| m.end()).unwrap_or(ddl.len());
        let name = caps.get(1).map(|m| unquote(m.as_str())).unwrap_or_default();

        let Some((body, body_end)) = extract_table_body(ddl, header) else {
            debug!(table = %name, "CREATE TABLE body is not closed, skipping");
            break;
        };

        let mut table = Table::new(name);
        parse_table_body(body, &mut table);
        tables.push(table);

        pos = body_end;
    }

    tables
}

/// Names of the tables `parse_ddl` yields, in source order
pub fn extract_table_names(ddl: &str) -> Vec<String> {
    parse_ddl(ddl).into_iter().map(|t| t.name).collect()
}

/// Order in which tables should be dropped so dependents go before parents
pub fn drop_order(table_names: &[String]) -> Vec<String> {
    table_names.iter().rev().cloned().collect()
}

/// Creation and drop order of the tables a DDL script declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TableOrder {
    /// Tables in creation order
    pub tables: Vec<String>,
    /// Tables in the order they should be dropped
    pub drop_order: Vec<String>,
}

impl TableOrder {
    pub fn from_ddl(ddl: &str) -> Self {
        let tables = extract_table_names(ddl);
        let drop_order = drop_order(&tables);
        Self { tables, drop_order }
    }
}

/// Return the body between the opening parenthesis at `start` and its match,
/// along with the byte offset just past the closing parenthesis.
fn extract_table_body(ddl: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = ddl.as_bytes();
    let mut depth = 1;
    let mut quote: Option<u8> = None;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        let i = start + offset;

        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'\'' | b'"' | b'`' => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&ddl[start..i], i + 1));
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse the body of a CREATE TABLE into columns and key markers
fn parse_table_body(body: &str, table: &mut Table) {
    for clause in split_clauses(body) {
        if clause.is_empty() {
            continue;
        }

        if CONSTRAINT_START_RE.is_match(&clause) {
            apply_table_constraint(&clause, table);
        } else if let Some(col) = parse_column_def(&clause) {
            table.columns.push(col);
        } else {
            debug!(table = %table.name, clause = %clause, "unrecognised clause skipped");
        }
    }
}

/// Remove `--` line comments and `/* */` block comments outside quotes.
/// Line breaks are kept so clause text stays on its own lines.
pub fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                out.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Split a table body on commas at parenthesis depth 0, outside quotes.
/// Comments are dropped first.
pub fn split_clauses(body: &str) -> Vec<String> {
    let body = strip_comments(body);
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    let mut quote: Option<char> = None;

    for ch in body.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Back-annotate previously parsed columns from a table-level constraint.
/// UNIQUE and CHECK constraints carry nothing the diagram shows.
fn apply_table_constraint(clause: &str, table: &mut Table) {
    if let Some(caps) = PRIMARY_KEY_RE.captures(clause) {
        for col_name in parse_column_list(caps.get(1).map_or("", |m| m.as_str())) {
            match table.column_mut(&col_name) {
                Some(col) => col.is_primary_key = true,
                None => debug!(table = %table.name, column = %col_name, "PRIMARY KEY names unknown column"),
            }
        }
    }

    for caps in FOREIGN_KEY_RE.captures_iter(clause) {
        let target = caps.get(2).map(|m| unquote(m.as_str())).unwrap_or_default();
        if target.is_empty() {
            continue;
        }

        for col_name in parse_column_list(caps.get(1).map_or("", |m| m.as_str())) {
            match table.column_mut(&col_name) {
                Some(col) => {
                    col.is_foreign_key = true;
                    col.references = Some(target.clone());
                }
                None => debug!(table = %table.name, column = %col_name, "FOREIGN KEY names unknown column"),
            }
        }
    }
}

/// Parse a column definition with its inline key modifiers
fn parse_column_def(clause: &str) -> Option<Column> {
    let caps = COLUMN_DEF_RE.captures(clause)?;
    let name = unquote(caps.get(1)?.as_str());
    let type_match = caps.get(2)?;

    let mut col = Column::new(name, type_match.as_str().trim());

    let modifiers = &clause[type_match.end()..];
    if INLINE_PRIMARY_KEY_RE.is_match(modifiers) {
        col.is_primary_key = true;
    }
    if let Some(target) = INLINE_REFERENCES_RE
        .captures(modifiers)
        .and_then(|c| c.get(1))
        .map(|m| unquote(m.as_str()))
    {
        col.is_foreign_key = true;
        col.references = Some(target);
    }

    Some(col)
}

/// Parse a comma-separated column list, stripping identifier quotes
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| unquote(c.trim()))
        .filter(|c| !c.is_empty())
        .collect()
}

/// Strip one level of identifier quoting ("x", `x`, [x])
pub fn unquote(ident: &str) -> String {
    let ident = ident.trim();
    let stripped = ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| ident.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .or_else(|| ident.strip_prefix('[').and_then(|s| s.strip_suffix(']')));
    stripped.unwrap_or(ident).to_string()
}
