//! Introspection of the loaded table.

use std::fmt;

use duckdb::Connection;
use serde::Serialize;

use crate::LakeError;

/// One column as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

/// Column layout of the queryable table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
    /// Render in the same shape as the prompt's schema description:
    /// `TABLE employees (id BIGINT, name VARCHAR);`
    #[must_use]
    pub fn description(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.data_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("TABLE {} ({columns});", self.table)
    }
}

impl fmt::Display for TableSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

pub(crate) fn describe(conn: &Connection, table: &str) -> Result<TableSchema, LakeError> {
    let mut stmt = conn.prepare(
        "SELECT column_name, data_type FROM information_schema.columns \
         WHERE table_name = ? ORDER BY ordinal_position",
    )?;
    let columns = stmt
        .query_map([table], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                data_type: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TableSchema {
        table: table.to_string(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn describes_columns_in_declaration_order() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE staff (id INTEGER, name VARCHAR, salary BIGINT)")
            .unwrap();

        let schema = describe(&conn, "staff").unwrap();
        let names: Vec<_> = schema.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "salary"]);
        assert_eq!(
            schema.description(),
            "TABLE staff (id INTEGER, name VARCHAR, salary BIGINT);"
        );
    }

    #[test]
    fn unknown_table_has_no_columns() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = describe(&conn, "missing").unwrap();
        assert!(schema.columns.is_empty());
    }
}
