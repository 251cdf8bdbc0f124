//! Table materialization from the CSV source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::SystemTime;

use duckdb::Connection;

use crate::LakeError;

/// Size and modification time of the source file at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceFingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub(crate) fn of(path: &Path) -> Result<Self, LakeError> {
        let metadata = std::fs::metadata(path).map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                LakeError::SourceMissing {
                    path: path.to_path_buf(),
                }
            } else {
                LakeError::Io(error)
            }
        })?;
        Ok(Self {
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Quote an identifier for `DuckDB` (`"` doubled).
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for `DuckDB` (`'` doubled).
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Drop the table, then rebuild it from the CSV with header-aware,
/// comma-separated parsing and inferred column types.
///
/// The source must be UTF-8 text with a header row, and the loaded columns
/// must match that header; anything else is a [`LakeError::TableLoad`] and
/// leaves no table behind.
pub(crate) fn recreate_table(conn: &Connection, table: &str, source: &Path) -> Result<(), LakeError> {
    let ident = quote_ident(table);
    let load_error = |message: String| LakeError::TableLoad {
        table: table.to_string(),
        path: source.to_path_buf(),
        message,
    };

    conn.execute_batch(&format!("DROP TABLE IF EXISTS {ident}"))
        .map_err(|error| load_error(error.to_string()))?;

    if !source.is_file() {
        return Err(LakeError::SourceMissing {
            path: source.to_path_buf(),
        });
    }
    let header = read_header(source).map_err(load_error)?;

    let source_literal = quote_literal(&source.to_string_lossy());
    conn.execute_batch(&format!(
        "CREATE TABLE {ident} AS
         SELECT * FROM read_csv_auto({source_literal}, header = true, sep = ',')"
    ))
    .map_err(|error| load_error(error.to_string()))?;

    let loaded: Vec<String> = crate::schema::describe(conn, table)
        .map_err(|error| load_error(error.to_string()))?
        .columns
        .into_iter()
        .map(|column| column.name.trim().to_string())
        .collect();
    if loaded != header {
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {ident}"))
            .map_err(|error| load_error(error.to_string()))?;
        return Err(load_error(format!(
            "header has columns {header:?} but the engine loaded {loaded:?}"
        )));
    }

    Ok(())
}

/// Header fields of `source`, after checking every line is UTF-8.
fn read_header(source: &Path) -> Result<Vec<String>, String> {
    let file = File::open(source).map_err(|error| error.to_string())?;
    let mut lines = BufReader::new(file).lines();

    let header = match lines.next() {
        Some(line) => line.map_err(|error| format!("line 1: {error}"))?,
        None => return Err("source file is empty".to_string()),
    };
    for (index, line) in lines.enumerate() {
        line.map_err(|error| format!("line {}: {error}", index + 2))?;
    }

    let header = header.trim_start_matches('\u{feff}').trim_end_matches('\r');
    if header.trim().is_empty() {
        return Err("missing header row".to_string());
    }
    Ok(split_header(header))
}

/// Split one CSV header line on commas outside double quotes.
fn split_header(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
