use std::sync::Arc;

use tokio::task::spawn_blocking;

use crate::diagnostics::{Diagnostics, attempt};
use crate::error::UnifiedDbError;

pub(crate) type SharedNativeConnection = Arc<tokio::sync::Mutex<rusqlite::Connection>>;

/// Call-based backend connection: one exclusively-owned synchronous engine
/// handle, driven to completion on the blocking pool.
#[derive(Clone)]
pub struct NativeConnection {
    conn: SharedNativeConnection,
}

impl NativeConnection {
    /// Open a file-backed or in-memory database and apply the durability
    /// pragmas. Pragma failures are swallowed; in-memory databases reject
    /// WAL and that must not block the open.
    pub(crate) async fn open(db_path: &str, diags: &Diagnostics) -> Result<Self, UnifiedDbError> {
        let path_owned = db_path.to_owned();
        let conn = spawn_blocking(move || {
            if path_owned == ":memory:" {
                rusqlite::Connection::open_in_memory()
            } else {
                rusqlite::Connection::open(&path_owned)
            }
        })
        .await
        .map_err(join_error)?
        .map_err(UnifiedDbError::Sqlite)?;

        let shared: SharedNativeConnection = Arc::new(tokio::sync::Mutex::new(conn));
        let pragmas = run_blocking(Arc::clone(&shared), |guard| {
            guard
                .execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
                .map_err(UnifiedDbError::Sqlite)
        })
        .await;
        attempt(diags, "pragma", pragmas);

        Ok(Self { conn: shared })
    }

    /// Execute a batch of statements in one shot.
    pub(crate) async fn execute_batch(&self, sql: &str) -> Result<(), UnifiedDbError> {
        let sql_owned = sql.to_owned();
        run_blocking(self.handle(), move |guard| {
            guard
                .execute_batch(&sql_owned)
                .map_err(UnifiedDbError::Sqlite)
        })
        .await
    }

    /// Validate SQL up front by warming the engine's internal
    /// prepared-statement cache; repeated executions reuse that entry.
    pub(crate) async fn warm_statement(&self, sql: Arc<String>) -> Result<(), UnifiedDbError> {
        run_blocking(self.handle(), move |guard| {
            let _ = guard
                .prepare_cached(sql.as_ref())
                .map_err(UnifiedDbError::Sqlite)?;
            Ok(())
        })
        .await
    }

    pub(crate) fn handle(&self) -> SharedNativeConnection {
        Arc::clone(&self.conn)
    }
}

impl std::fmt::Debug for NativeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeConnection").finish()
    }
}

/// Run synchronous engine logic on the blocking pool against the shared
/// connection handle.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedNativeConnection,
    func: F,
) -> Result<R, UnifiedDbError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, UnifiedDbError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(join_error)?
}

fn join_error(err: tokio::task::JoinError) -> UnifiedDbError {
    UnifiedDbError::Execution(format!("sqlite blocking task join error: {err}"))
}
