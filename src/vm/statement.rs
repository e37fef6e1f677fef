use std::sync::Arc;

use tokio::sync::Mutex;

use crate::diagnostics::{Diagnostics, attempt};
use crate::error::UnifiedDbError;
use crate::results::{Row, RowSet};

use super::connect::VmConnection;
use super::query::next_row_values;

struct VmStatementState {
    /// None once the statement has been finalized.
    stmt: Option<turso::Statement>,
    /// Parameters staged by an eager bind, consumed when a cursor starts.
    staged: Option<turso::params::Params>,
    /// Open step() cursor, if any.
    cursor: Option<turso::Rows>,
}

/// Step-based prepared statement with an explicit bind/step/reset/finalize
/// lifecycle.
///
/// The compiled engine statement is shared behind an async mutex so the
/// handle can be cloned across awaited calls, matching how the call-based
/// backend shares its connection.
#[derive(Clone)]
pub struct VmStatement {
    state: Arc<Mutex<VmStatementState>>,
    columns: Arc<Vec<String>>,
    sql: Arc<String>,
    diags: Diagnostics,
}

impl VmStatement {
    pub(crate) async fn prepare(
        conn: &VmConnection,
        sql: Arc<String>,
        diags: Diagnostics,
    ) -> Result<Self, UnifiedDbError> {
        let stmt = conn
            .conn
            .prepare(sql.as_str())
            .await
            .map_err(UnifiedDbError::Vm)?;
        let columns: Vec<String> = stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        Ok(Self {
            state: Arc::new(Mutex::new(VmStatementState {
                stmt: Some(stmt),
                staged: None,
                cursor: None,
            })),
            columns: Arc::new(columns),
            sql,
            diags,
        })
    }

    /// Eagerly stage parameters for the next cursor start.
    pub(crate) async fn stage(&self, params: turso::params::Params) {
        let mut state = self.state.lock().await;
        state.staged = Some(params);
    }

    /// Execute for side effect only, then return the statement to its
    /// prepared state so the next caller starts clean.
    pub(crate) async fn execute(
        &self,
        params: turso::params::Params,
    ) -> Result<usize, UnifiedDbError> {
        let mut state = self.state.lock().await;
        state.cursor = None;
        state.staged = None;
        let Some(stmt) = state.stmt.as_mut() else {
            return Err(finalized_error());
        };
        let affected = stmt.execute(params).await.map_err(UnifiedDbError::Vm)?;
        stmt.reset().map_err(UnifiedDbError::Vm)?;
        usize::try_from(affected).map_err(|e| {
            UnifiedDbError::Execution(format!("vm affected rows conversion error: {e}"))
        })
    }

    pub(crate) async fn query_first(
        &self,
        params: turso::params::Params,
    ) -> Result<Option<Row>, UnifiedDbError> {
        // Exactly one cursor advance, then the mandatory reset inside
        // query_rows keeps state from leaking to the next caller.
        Ok(self.query_rows(params, Some(1)).await?.into_first_row())
    }

    pub(crate) async fn query_all(
        &self,
        params: turso::params::Params,
    ) -> Result<RowSet, UnifiedDbError> {
        self.query_rows(params, None).await
    }

    /// Advance the step cursor, starting it on first use with any staged
    /// parameters. Returns false once the result set is exhausted.
    pub(crate) async fn step(&self) -> Result<bool, UnifiedDbError> {
        let mut state = self.state.lock().await;
        if state.cursor.is_none() {
            let params = state
                .staged
                .take()
                .unwrap_or(turso::params::Params::Positional(Vec::new()));
            let rows = match state.stmt.as_mut() {
                Some(stmt) => stmt.query(params).await.map_err(UnifiedDbError::Vm)?,
                None => return Err(finalized_error()),
            };
            state.cursor = Some(rows);
        }
        let advanced = match state.cursor.as_mut() {
            Some(cursor) => cursor.next().await.map_err(UnifiedDbError::Vm)?.is_some(),
            None => false,
        };
        if !advanced {
            state.cursor = None;
            if let Some(stmt) = state.stmt.as_ref() {
                attempt(&self.diags, "step", stmt.reset());
            }
        }
        Ok(advanced)
    }

    /// Return the statement to a re-executable state. Never fails.
    pub(crate) async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.cursor = None;
        state.staged = None;
        if let Some(stmt) = state.stmt.as_ref() {
            attempt(&self.diags, "reset", stmt.reset());
        }
    }

    /// Release the engine statement. A second finalize is a no-op.
    pub(crate) async fn finalize(&self) -> Result<(), UnifiedDbError> {
        let mut state = self.state.lock().await;
        state.cursor = None;
        state.staged = None;
        match state.stmt.take() {
            Some(stmt) => {
                // The engine reports teardown trouble through the final
                // reset; the drop itself cannot fail.
                stmt.reset()
                    .map_err(|e| UnifiedDbError::Finalize(format!("vm statement teardown: {e}")))?;
                drop(stmt);
                Ok(())
            }
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        self.sql.as_str()
    }

    async fn query_rows(
        &self,
        params: turso::params::Params,
        limit: Option<usize>,
    ) -> Result<RowSet, UnifiedDbError> {
        let mut state = self.state.lock().await;
        state.cursor = None;
        let Some(stmt) = state.stmt.as_mut() else {
            return Err(finalized_error());
        };
        let mut rows = stmt.query(params).await.map_err(UnifiedDbError::Vm)?;

        let mut result_set = RowSet::with_capacity(limit.unwrap_or(16));
        result_set.set_column_names(Arc::clone(&self.columns));
        while limit.is_none_or(|max| result_set.rows.len() < max) {
            match next_row_values(&mut rows).await? {
                Some(values) => result_set.add_row_values(values),
                None => break,
            }
        }
        drop(rows);
        stmt.reset().map_err(UnifiedDbError::Vm)?;
        Ok(result_set)
    }
}

impl std::fmt::Debug for VmStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmStatement")
            .field("columns", &self.columns)
            .field("sql", &self.sql)
            .finish()
    }
}

fn finalized_error() -> UnifiedDbError {
    UnifiedDbError::Execution("vm statement already finalized".to_owned())
}
