//! Query results as ordered, column-keyed rows.
//!
//! A [`ResultSet`] pairs the cursor's column list with one [`Row`] per result
//! row. Every row holds exactly one value per column, keyed by column name, in
//! column order. Serializing a result set yields a JSON array of row objects,
//! which is the shape the HTTP `results` field exposes.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use crate::CoreError;

/// One result row: column name to scalar value, in column order.
pub type Row = Map<String, Value>;

/// Fully materialized query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create an empty result with the given columns.
    ///
    /// Repeated column names get a numeric suffix (`name`, `name_1`, ...) so
    /// every row can carry one key per declared column.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: disambiguate(columns),
            rows: Vec::new(),
        }
    }

    /// Build a result from positional rows.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RowWidthMismatch`] if any row's width differs from
    /// the column count.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, CoreError> {
        let mut result = Self::new(columns);
        for values in rows {
            result.push_row(values)?;
        }
        Ok(result)
    }

    /// Append a positional row, zipping it with the column names.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RowWidthMismatch`] if `values.len()` differs from
    /// the column count.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<(), CoreError> {
        if values.len() != self.columns.len() {
            return Err(CoreError::RowWidthMismatch {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }

        let row: Row = self.columns.iter().cloned().zip(values).collect();
        self.rows.push(row);
        Ok(())
    }

    /// Column names in cursor order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in result order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the result, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

fn disambiguate(columns: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(columns.len());
    for name in columns {
        if !out.contains(&name) {
            out.push(name);
            continue;
        }
        let mut suffix = 1;
        let unique = loop {
            let candidate = format!("{name}_{suffix}");
            if !out.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        out.push(unique);
    }
    out
}
