//! Statement execution and `DuckDB` value conversion.

use chrono::{DateTime, NaiveTime};
use duckdb::Connection;
use duckdb::types::{TimeUnit, Value};
use serde_json::{Number, Value as JsonValue};
use voxql_core::ResultSet;

use crate::LakeError;

/// Run `sql` and materialize the full result.
///
/// Column names come from the executed statement, so they are known even when
/// the result has no rows.
pub(crate) fn execute(conn: &Connection, sql: &str) -> Result<ResultSet, LakeError> {
    let query_error = |error: duckdb::Error| LakeError::QueryExecution(error.to_string());

    let mut stmt = conn.prepare(sql).map_err(query_error)?;
    let mut rows = stmt.query([]).map_err(query_error)?;

    let columns = rows
        .as_ref()
        .map(duckdb::Statement::column_names)
        .unwrap_or_default();
    let width = columns.len();
    let mut result = ResultSet::new(columns);

    while let Some(row) = rows.next().map_err(query_error)? {
        let mut values = Vec::with_capacity(width);
        for index in 0..width {
            let value: Value = row.get(index).map_err(query_error)?;
            values.push(to_json(value));
        }
        result
            .push_row(values)
            .map_err(|error| LakeError::QueryExecution(error.to_string()))?;
    }

    Ok(result)
}

/// Convert one `DuckDB` value to a JSON scalar (or array for list types).
pub(crate) fn to_json(value: Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(b),
        Value::TinyInt(i) => JsonValue::from(i),
        Value::SmallInt(i) => JsonValue::from(i),
        Value::Int(i) => JsonValue::from(i),
        Value::BigInt(i) => JsonValue::from(i),
        Value::HugeInt(i) => i64::try_from(i).map_or_else(
            |_| JsonValue::String(i.to_string()),
            JsonValue::from,
        ),
        Value::UTinyInt(i) => JsonValue::from(i),
        Value::USmallInt(i) => JsonValue::from(i),
        Value::UInt(i) => JsonValue::from(i),
        Value::UBigInt(i) => JsonValue::from(i),
        Value::Float(f) => float(f64::from(f)),
        Value::Double(f) => float(f),
        Value::Decimal(d) => JsonValue::String(d.to_string()),
        Value::Text(s) | Value::Enum(s) => JsonValue::String(s),
        Value::Blob(bytes) => JsonValue::Array(bytes.into_iter().map(JsonValue::from).collect()),
        Value::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0).map_or(
            JsonValue::Null,
            |dt| JsonValue::String(dt.date_naive().to_string()),
        ),
        Value::Timestamp(unit, raw) => DateTime::from_timestamp_micros(to_micros(unit, raw))
            .map_or(JsonValue::Null, |dt| {
                JsonValue::String(dt.naive_utc().to_string())
            }),
        Value::Time64(unit, raw) => {
            let micros = to_micros(unit, raw);
            let secs = u32::try_from(micros.div_euclid(1_000_000)).unwrap_or(0);
            let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).unwrap_or(0);
            NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
                .map_or(JsonValue::Null, |t| JsonValue::String(t.to_string()))
        }
        Value::List(items) | Value::Array(items) => {
            JsonValue::Array(items.into_iter().map(to_json).collect())
        }
        Value::Union(inner) => to_json(*inner),
        other => JsonValue::String(format!("{other:?}")),
    }
}

fn float(f: f64) -> JsonValue {
    Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

const fn to_micros(unit: TimeUnit, raw: i64) -> i64 {
    match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    }
}
