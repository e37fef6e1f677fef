use crate::error::UnifiedDbError;
use crate::normalize::normalize_params;
use crate::results::RowSet;
use crate::values::ParamSet;

use super::connect::{NativeConnection, run_blocking};
use super::params::NativeParams;
use super::query;

/// Execute a batch of SQL statements in one shot.
///
/// # Errors
///
/// Returns [`UnifiedDbError`] when the engine rejects any statement in the
/// batch.
pub async fn execute_batch(conn: &NativeConnection, sql: &str) -> Result<(), UnifiedDbError> {
    conn.execute_batch(sql).await
}

/// Execute an ad-hoc SELECT and materialize the rows.
///
/// # Errors
///
/// Returns [`UnifiedDbError`] when preparing or running the query fails.
pub async fn execute_select(
    conn: &NativeConnection,
    sql: &str,
    params: &ParamSet,
) -> Result<RowSet, UnifiedDbError> {
    let converted = NativeParams::from_set(&normalize_params(params));
    let sql_owned = sql.to_owned();
    run_blocking(conn.handle(), move |guard| {
        let mut stmt = guard
            .prepare(&sql_owned)
            .map_err(UnifiedDbError::Sqlite)?;
        query::build_row_set(&mut stmt, &converted, None)
    })
    .await
}

/// Execute an ad-hoc DML statement and report rows affected.
///
/// # Errors
///
/// Returns [`UnifiedDbError`] when preparing or executing the statement
/// fails.
pub async fn execute_dml(
    conn: &NativeConnection,
    sql: &str,
    params: &ParamSet,
) -> Result<usize, UnifiedDbError> {
    let converted = NativeParams::from_set(&normalize_params(params));
    let sql_owned = sql.to_owned();
    run_blocking(conn.handle(), move |guard| {
        let mut stmt = guard
            .prepare(&sql_owned)
            .map_err(UnifiedDbError::Sqlite)?;
        query::execute(&mut stmt, &converted)
    })
    .await
}
