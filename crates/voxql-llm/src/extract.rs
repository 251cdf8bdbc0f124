//! Pull the SQL statement out of free-form LLM text.

use std::sync::LazyLock;

use regex::Regex;

use crate::ExtractionError;

static FENCED_SQL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```sql(.*?)```").expect("fenced sql pattern compiles"));

/// Every ```` ```sql ```` segment in order of appearance, untrimmed.
pub fn extract_all_sql(llm_text: &str) -> Vec<&str> {
    FENCED_SQL
        .captures_iter(llm_text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// The trimmed body of the **last** ```` ```sql ```` segment.
///
/// The language tag is case-sensitive. No SQL validation happens here.
///
/// # Errors
///
/// [`ExtractionError::NoFencedSql`] when there is no segment,
/// [`ExtractionError::EmptyStatement`] when the last one is blank.
pub fn extract_sql(llm_text: &str) -> Result<String, ExtractionError> {
    let segments = extract_all_sql(llm_text);
    let last = segments.last().ok_or(ExtractionError::NoFencedSql)?;
    if segments.len() > 1 {
        tracing::debug!(discarded = segments.len() - 1, "multiple sql blocks; using the last");
    }

    let sql = last.trim();
    if sql.is_empty() {
        return Err(ExtractionError::EmptyStatement);
    }
    Ok(sql.to_string())
}
