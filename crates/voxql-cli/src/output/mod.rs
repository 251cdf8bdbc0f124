//! Output rendering: pretty JSON, compact JSON, or aligned tables.

use serde::Serialize;
use serde_json::Value;
use voxql_core::ResultSet;

use crate::cli::OutputFormat;

pub mod table;

/// Render a serializable response in the requested format.
///
/// In table mode, objects become key/value tables; any `results` array inside
/// them is rendered as its own table below, with columns in result order.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Render a result set as a table, keeping the executor's column order.
#[must_use]
pub fn result_table(results: &ResultSet) -> String {
    if results.columns().is_empty() {
        return String::from("(no columns)");
    }
    let headers: Vec<&str> = results.columns().iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = results
        .rows()
        .iter()
        .map(|row| row.values().map(value_to_cell).collect())
        .collect();

    let mut out = table::render(&headers, &rows, terminal_width());
    out.push_str(&format!("\n({} row{})", rows.len(), if rows.len() == 1 { "" } else { "s" }));
    out
}

fn render_table(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Array(items) => Ok(render_array_table(items)),
        Value::Object(map) => {
            let mut rows = Vec::with_capacity(map.len());
            let mut nested = None;
            for (key, value) in map {
                match value {
                    Value::Array(items) if key == "results" => nested = Some(items),
                    Value::Array(_) | Value::Object(_) => {
                        rows.push(vec![key.clone(), serde_json::to_string(value)?]);
                    }
                    scalar => rows.push(vec![key.clone(), value_to_cell(scalar)]),
                }
            }
            let mut out = table::render(&["key", "value"], &rows, terminal_width());
            if let Some(items) = nested {
                out.push_str("\n\n");
                out.push_str(&render_array_table(items));
            }
            Ok(out)
        }
        scalar => Ok(value_to_cell(scalar)),
    }
}

/// Arrays of objects become one row per object; headers are the union of keys
/// in first-seen order.
fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows: Vec<Vec<String>> = items.iter().map(|v| vec![value_to_cell(v)]).collect();
        return table::render(&["value"], &rows, terminal_width());
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(String::new, value_to_cell))
                .collect()
        })
        .collect();
    table::render(&header_refs, &rows, terminal_width())
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("NULL"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.parse().ok())
        .filter(|&cols: &usize| cols > 0)
}
