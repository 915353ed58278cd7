//! Graph view with filtering and focus capabilities for ERD generation.

use crate::schema::{derive_relationships, Relationship, Table};
use ahash::{AHashMap, AHashSet};
use glob::Pattern;
use std::collections::VecDeque;

/// Mermaid notation for the only cardinality the parser can infer:
/// the child holds the FK, the parent is referenced once.
pub const MANY_TO_ONE: &str = "}o--||";

/// A filtered view of parsed tables for ERD visualization
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Tables included in this view, in source order
    pub tables: Vec<Table>,
    /// Foreign-key edges between tables
    pub edges: Vec<Relationship>,
}

impl GraphView {
    /// Create a full view from parsed tables (all tables and edges)
    pub fn from_tables(tables: &[Table]) -> Self {
        Self {
            tables: tables.to_vec(),
            edges: derive_relationships(tables),
        }
    }

    /// Filter to include only tables matching the given patterns
    pub fn filter_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }

        let matching: AHashSet<String> = self
            .tables
            .iter()
            .map(|t| &t.name)
            .filter(|name| patterns.iter().any(|p| p.matches(name)))
            .cloned()
            .collect();

        self.apply_node_filter(&matching);
    }

    /// Exclude tables matching the given patterns
    pub fn exclude_tables(&mut self, patterns: &[Pattern]) {
        if patterns.is_empty() {
            return;
        }

        let remaining: AHashSet<String> = self
            .tables
            .iter()
            .map(|t| &t.name)
            .filter(|name| !patterns.iter().any(|p| p.matches(name)))
            .cloned()
            .collect();

        self.apply_node_filter(&remaining);
    }

    /// Focus on a table and everything within `max_depth` FK hops of it,
    /// following edges in both directions. An unknown table empties the view.
    pub fn focus_table(&mut self, table: &str, max_depth: usize) {
        let Some(start) = self.get_table(table).map(|t| t.name.clone()) else {
            self.tables.clear();
            self.edges.clear();
            return;
        };

        let adjacency = self.build_adjacency_map();

        let mut result_nodes = AHashSet::new();
        result_nodes.insert(start.clone());

        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            if let Some(neighbors) = adjacency.get(&current) {
                for neighbor in neighbors {
                    if result_nodes.insert(neighbor.clone()) {
                        queue.push_back((neighbor.clone(), depth + 1));
                    }
                }
            }
        }

        self.apply_node_filter(&result_nodes);
    }

    /// Get the number of tables in the view
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Get the number of edges in the view
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get the total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Check if the view is empty
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Get table by name (exact first, then case-insensitive)
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        crate::schema::find_table(&self.tables, name)
    }

    // Private helper methods

    /// Keep only the given tables. Edges survive when their source is kept and
    /// their target is either kept or was never a parsed table (dangling).
    fn apply_node_filter(&mut self, keep: &AHashSet<String>) {
        let known: AHashSet<String> = self.tables.iter().map(|t| t.name.clone()).collect();

        self.tables.retain(|t| keep.contains(&t.name));
        self.edges.retain(|e| {
            keep.contains(&e.from_table)
                && (keep.contains(&e.to_table) || !known.contains(&e.to_table))
        });
    }

    fn build_adjacency_map(&self) -> AHashMap<String, Vec<String>> {
        let mut adjacency: AHashMap<String, Vec<String>> = AHashMap::new();

        for edge in &self.edges {
            adjacency
                .entry(edge.from_table.clone())
                .or_default()
                .push(edge.to_table.clone());
            adjacency
                .entry(edge.to_table.clone())
                .or_default()
                .push(edge.from_table.clone());
        }

        adjacency
    }
}
