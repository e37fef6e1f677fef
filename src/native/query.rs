use std::sync::Arc;

use rusqlite::{Statement, ToSql};

use crate::error::UnifiedDbError;
use crate::results::{Row, RowSet};
use crate::values::SqlValue;

use super::params::NativeParams;

/// Extract one unified value from an engine row.
pub(crate) fn extract_value(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> Result<SqlValue, UnifiedDbError> {
    let value: rusqlite::types::Value = row.get(idx).map_err(UnifiedDbError::Sqlite)?;
    Ok(match value {
        rusqlite::types::Value::Null => SqlValue::Null,
        rusqlite::types::Value::Integer(i) => SqlValue::Int(i),
        rusqlite::types::Value::Real(f) => SqlValue::Float(f),
        rusqlite::types::Value::Text(s) => SqlValue::Text(s),
        rusqlite::types::Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Run the statement as a query and materialize at most `limit` rows.
pub(crate) fn build_row_set(
    stmt: &mut Statement<'_>,
    params: &NativeParams,
    limit: Option<usize>,
) -> Result<RowSet, UnifiedDbError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = RowSet::with_capacity(limit.unwrap_or(10));
    result_set.set_column_names(Arc::new(column_names));

    let mut rows_iter = query_with(stmt, params)?;
    while limit.is_none_or(|max| result_set.rows.len() < max) {
        let Some(row) = rows_iter.next().map_err(UnifiedDbError::Sqlite)? else {
            break;
        };
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Run the statement as a query and materialize only its first row.
pub(crate) fn build_first_row(
    stmt: &mut Statement<'_>,
    params: &NativeParams,
) -> Result<Option<Row>, UnifiedDbError> {
    Ok(build_row_set(stmt, params, Some(1))?.into_first_row())
}

/// Execute the statement for its side effect and report rows affected.
pub(crate) fn execute(
    stmt: &mut Statement<'_>,
    params: &NativeParams,
) -> Result<usize, UnifiedDbError> {
    let affected = match params {
        NativeParams::None => stmt.execute([]),
        NativeParams::Positional(values) => {
            let refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
            stmt.execute(&refs[..])
        }
        NativeParams::Named(pairs) => {
            let refs: Vec<(&str, &dyn ToSql)> = pairs
                .iter()
                .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
                .collect();
            stmt.execute(&refs[..])
        }
    }
    .map_err(UnifiedDbError::Sqlite)?;
    Ok(affected)
}

fn query_with<'s>(
    stmt: &'s mut Statement<'_>,
    params: &NativeParams,
) -> Result<rusqlite::Rows<'s>, UnifiedDbError> {
    match params {
        NativeParams::None => stmt.query([]),
        NativeParams::Positional(values) => {
            let refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
            stmt.query(&refs[..])
        }
        NativeParams::Named(pairs) => {
            let refs: Vec<(&str, &dyn ToSql)> = pairs
                .iter()
                .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
                .collect();
            stmt.query(&refs[..])
        }
    }
    .map_err(UnifiedDbError::Sqlite)
}
