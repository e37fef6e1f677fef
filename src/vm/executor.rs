use std::sync::Arc;

use crate::error::UnifiedDbError;
use crate::normalize::normalize_params;
use crate::results::RowSet;
use crate::values::ParamSet;

use super::connect::VmConnection;
use super::params::to_engine_params;
use super::query::next_row_values;

/// Execute a batch of SQL statements in one shot.
///
/// # Errors
///
/// Returns [`UnifiedDbError`] when the engine rejects any statement in the
/// batch.
pub async fn execute_batch(conn: &VmConnection, sql: &str) -> Result<(), UnifiedDbError> {
    conn.execute_batch(sql).await
}

/// Execute an ad-hoc SELECT and materialize the rows.
///
/// # Errors
///
/// Returns [`UnifiedDbError`] when preparing, running, or decoding the query
/// fails.
pub async fn execute_select(
    conn: &VmConnection,
    sql: &str,
    params: &ParamSet,
) -> Result<RowSet, UnifiedDbError> {
    let converted = to_engine_params(&normalize_params(params));

    let mut stmt = conn.conn.prepare(sql).await.map_err(UnifiedDbError::Vm)?;
    let columns: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();

    let mut rows = stmt.query(converted).await.map_err(UnifiedDbError::Vm)?;
    let mut result_set = RowSet::with_capacity(16);
    result_set.set_column_names(Arc::new(columns));
    while let Some(values) = next_row_values(&mut rows).await? {
        result_set.add_row_values(values);
    }
    Ok(result_set)
}

/// Execute an ad-hoc DML statement and report rows affected.
///
/// # Errors
///
/// Returns [`UnifiedDbError`] when executing the statement fails or the
/// affected-row count does not fit a `usize`.
pub async fn execute_dml(
    conn: &VmConnection,
    sql: &str,
    params: &ParamSet,
) -> Result<usize, UnifiedDbError> {
    let converted = to_engine_params(&normalize_params(params));
    let affected = conn
        .conn
        .execute(sql, converted)
        .await
        .map_err(UnifiedDbError::Vm)?;
    usize::try_from(affected).map_err(|e| {
        UnifiedDbError::Execution(format!("vm affected rows conversion error: {e}"))
    })
}
