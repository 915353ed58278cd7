//! CSV inputs for prompting and data loading.

use anyhow::Context;
use std::fs;
use std::path::Path;

/// A CSV file's name (file stem) and raw content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSource {
    pub name: String,
    pub content: String,
}

impl CsvSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a CSV file, naming the source after the file stem
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("no usable file name in {}", path.display()))?
            .to_string();
        Ok(Self { name, content })
    }

    fn reader(&self) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(self.content.as_bytes())
    }

    /// Header row, with pandas-style `.N` suffixes on repeated names
    pub fn headers(&self) -> anyhow::Result<Vec<String>> {
        let mut reader = self.reader();
        let raw = reader
            .headers()
            .with_context(|| format!("failed to read CSV header of {}", self.name))?;
        Ok(dedupe_headers(raw.iter()))
    }

    /// Data rows, padded or truncated to the header width
    pub fn records(&self) -> anyhow::Result<Vec<Vec<String>>> {
        let mut reader = self.reader();
        let width = reader
            .headers()
            .with_context(|| format!("failed to read CSV header of {}", self.name))?
            .len();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record =
                record.with_context(|| format!("{}: bad CSV record {}", self.name, i + 1))?;
            let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }
        Ok(rows)
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ... in order
fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: ahash::AHashMap<String, usize> = ahash::AHashMap::new();
    names
        .map(|name| {
            let count = seen.entry(name.to_string()).or_insert(0);
            let header = if *count == 0 {
                name.to_string()
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            header
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_and_records() {
        let source = CsvSource::new("people", "id,name,name\n1,\"Ada, L\",x\n2,Bob\n");

        assert_eq!(source.headers().unwrap(), vec!["id", "name", "name.1"]);
        assert_eq!(
            source.records().unwrap(),
            vec![
                vec!["1".to_string(), "Ada, L".to_string(), "x".to_string()],
                vec!["2".to_string(), "Bob".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn test_header_only_file_has_no_records() {
        let source = CsvSource::new("empty", "a,b\n");
        assert!(source.records().unwrap().is_empty());
    }
}
