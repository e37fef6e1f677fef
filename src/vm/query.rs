use crate::error::UnifiedDbError;
use crate::values::SqlValue;

/// Convert an engine value back to a unified value.
pub(crate) fn from_engine_value(value: turso::Value) -> SqlValue {
    match value {
        turso::Value::Null => SqlValue::Null,
        turso::Value::Integer(i) => SqlValue::Int(i),
        turso::Value::Real(f) => SqlValue::Float(f),
        turso::Value::Text(s) => SqlValue::Text(s),
        turso::Value::Blob(b) => SqlValue::Blob(b),
    }
}

/// Advance the cursor one row and materialize its values, or None when the
/// cursor is exhausted.
pub(crate) async fn next_row_values(
    rows: &mut turso::Rows,
) -> Result<Option<Vec<SqlValue>>, UnifiedDbError> {
    let Some(row) = rows.next().await.map_err(UnifiedDbError::Vm)? else {
        return Ok(None);
    };
    let mut values = Vec::with_capacity(row.column_count());
    for idx in 0..row.column_count() {
        let value = row.get_value(idx).map_err(UnifiedDbError::Vm)?;
        values.push(from_engine_value(value));
    }
    Ok(Some(values))
}
