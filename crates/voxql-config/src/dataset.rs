//! Dataset configuration: the CSV source, the `DuckDB` file, and the schema
//! description handed to the LLM.

use serde::{Deserialize, Serialize};

fn default_source_path() -> String {
    String::from("employees.csv")
}

fn default_table() -> String {
    String::from("employees")
}

fn default_schema_description() -> String {
    String::from(
        "TABLE employees (id INTEGER, name VARCHAR, position VARCHAR, salary INTEGER);",
    )
}

/// When the executor rebuilds the table from the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadPolicy {
    /// Drop and recreate the table before every query.
    #[default]
    Always,
    /// Recreate only when the source file's size or modification time changed.
    OnChange,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// Header-having, comma-separated source file.
    #[serde(default = "default_source_path")]
    pub source_path: String,

    /// `DuckDB` database file. Empty means in-memory.
    #[serde(default)]
    pub database_path: String,

    /// Name of the queryable table.
    #[serde(default = "default_table")]
    pub table: String,

    /// Schema text included in every prompt. Must match the CSV columns.
    #[serde(default = "default_schema_description")]
    pub schema_description: String,

    #[serde(default)]
    pub reload: ReloadPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            database_path: String::new(),
            table: default_table(),
            schema_description: default_schema_description(),
            reload: ReloadPolicy::default(),
        }
    }
}

impl DatasetConfig {
    #[must_use]
    pub const fn is_in_memory(&self) -> bool {
        self.database_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_employee_dataset() {
        let config = DatasetConfig::default();
        assert_eq!(config.source_path, "employees.csv");
        assert_eq!(config.table, "employees");
        assert!(config.is_in_memory());
        assert_eq!(config.reload, ReloadPolicy::Always);
        assert!(config.schema_description.starts_with("TABLE employees"));
    }
}
