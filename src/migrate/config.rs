//! YAML configuration for the migrate command.
//!
//! Supports script-level settings and per-source table overrides.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default database name used in script headers
pub const DEFAULT_DATABASE_NAME: &str = "migrated_data";

/// Per-source configuration override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOverride {
    /// Table to load this CSV into (defaults to the file stem)
    pub target: Option<String>,
    /// Skip this source entirely
    pub skip: bool,
}

/// Complete YAML configuration for migrate command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateYamlConfig {
    /// Target database name (informational, written to the script header)
    pub database_name: Option<String>,
    /// Drop existing tables before creating them
    pub drop_existing: Option<bool>,
    /// Wrap the script in BEGIN/COMMIT
    pub transaction: Option<bool>,
    /// Rows per INSERT statement
    pub batch_size: Option<usize>,
    /// Per-source overrides, keyed by CSV name
    #[serde(default)]
    pub tables: HashMap<String, SourceOverride>,
}

impl MigrateYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: MigrateYamlConfig = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }
}

/// Effective migration settings after merging YAML and CLI flags
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub database_name: String,
    pub drop_existing: bool,
    pub transaction: bool,
    pub batch_size: usize,
    pub tables: HashMap<String, SourceOverride>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            drop_existing: true,
            transaction: true,
            batch_size: 1,
            tables: HashMap::new(),
        }
    }
}

impl MigrateConfig {
    /// Build settings from an optional YAML config, falling back to defaults
    pub fn from_yaml(yaml: Option<MigrateYamlConfig>) -> Self {
        let defaults = Self::default();
        let Some(yaml) = yaml else {
            return defaults;
        };

        Self {
            database_name: yaml.database_name.unwrap_or(defaults.database_name),
            drop_existing: yaml.drop_existing.unwrap_or(defaults.drop_existing),
            transaction: yaml.transaction.unwrap_or(defaults.transaction),
            batch_size: yaml.batch_size.unwrap_or(defaults.batch_size).max(1),
            tables: yaml.tables,
        }
    }

    /// Get override for a specific source (case-insensitive)
    pub fn get_override(&self, source_name: &str) -> Option<&SourceOverride> {
        self.tables.get(source_name).or_else(|| {
            self.tables
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(source_name))
                .map(|(_, v)| v)
        })
    }

    /// Check if a source should be skipped
    pub fn should_skip(&self, source_name: &str) -> bool {
        self.get_override(source_name)
            .map(|o| o.skip)
            .unwrap_or(false)
    }

    /// Table name a source should be loaded into
    pub fn target_table<'a>(&'a self, source_name: &'a str) -> &'a str {
        self.get_override(source_name)
            .and_then(|o| o.target.as_deref())
            .unwrap_or(source_name)
    }
}
