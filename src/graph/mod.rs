//! ERD (Entity-Relationship Diagram) generation module.
//!
//! This module provides:
//! - A filterable view over parsed tables and their FK relationships
//! - Multiple output formats: Mermaid, DOT (Graphviz), JSON, plain text

pub mod format;
pub mod view;

pub use format::{to_dot, to_json, to_mermaid, to_text, Layout, OutputFormat};
pub use view::GraphView;

/// Render a view in the requested format
pub fn render(view: &GraphView, format: OutputFormat, layout: Layout) -> String {
    match format {
        OutputFormat::Mermaid => to_mermaid(view),
        OutputFormat::Dot => to_dot(view, layout),
        OutputFormat::Json => to_json(view),
        OutputFormat::Text => to_text(view),
    }
}
