use std::sync::Arc;

use crate::error::UnifiedDbError;
use crate::results::{Row, RowSet};

use super::connect::{NativeConnection, SharedNativeConnection, run_blocking};
use super::params::NativeParams;
use super::query;

/// Call-based prepared statement.
///
/// The handle is the (connection, SQL) pair; the engine's internal
/// `prepare_cached` mechanism keeps the compiled statement alive between
/// calls, so no self-referential statement borrow is ever held here.
#[derive(Clone)]
pub struct NativeStatement {
    conn: SharedNativeConnection,
    sql: Arc<String>,
}

impl NativeStatement {
    pub(crate) async fn prepare(
        conn: &NativeConnection,
        sql: Arc<String>,
    ) -> Result<Self, UnifiedDbError> {
        // Compile now so a bad statement fails at prepare time, not first use.
        conn.warm_statement(Arc::clone(&sql)).await?;
        Ok(Self {
            conn: conn.handle(),
            sql,
        })
    }

    pub(crate) async fn execute(&self, params: NativeParams) -> Result<usize, UnifiedDbError> {
        let sql = Arc::clone(&self.sql);
        run_blocking(Arc::clone(&self.conn), move |guard| {
            let mut stmt = guard
                .prepare_cached(sql.as_ref())
                .map_err(UnifiedDbError::Sqlite)?;
            query::execute(&mut stmt, &params)
        })
        .await
    }

    pub(crate) async fn query_first(
        &self,
        params: NativeParams,
    ) -> Result<Option<Row>, UnifiedDbError> {
        let sql = Arc::clone(&self.sql);
        run_blocking(Arc::clone(&self.conn), move |guard| {
            let mut stmt = guard
                .prepare_cached(sql.as_ref())
                .map_err(UnifiedDbError::Sqlite)?;
            query::build_first_row(&mut stmt, &params)
        })
        .await
    }

    pub(crate) async fn query_all(&self, params: NativeParams) -> Result<RowSet, UnifiedDbError> {
        let sql = Arc::clone(&self.sql);
        run_blocking(Arc::clone(&self.conn), move |guard| {
            let mut stmt = guard
                .prepare_cached(sql.as_ref())
                .map_err(UnifiedDbError::Sqlite)?;
            query::build_row_set(&mut stmt, &params, None)
        })
        .await
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        self.sql.as_str()
    }
}

impl std::fmt::Debug for NativeStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeStatement")
            .field("sql", &self.sql)
            .finish()
    }
}
