use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostics, attempt};
use crate::error::UnifiedDbError;

/// Step-based backend connection: the in-process VM engine, optionally with
/// directory-scoped durable storage.
pub struct VmConnection {
    pub(crate) conn: turso::Connection,
    // Keeps the database alive for the connection's lifetime.
    _db: turso::Database,
    pub(crate) db_file: Option<PathBuf>,
}

impl VmConnection {
    /// Open the engine. When `storage_dir` is given, the database lives at
    /// `<dir>/db.sqlite` (the directory is created as needed); otherwise
    /// `db_path` is used directly, with `:memory:` staying ephemeral.
    pub(crate) async fn open(
        db_path: &str,
        storage_dir: Option<&Path>,
        diags: &Diagnostics,
    ) -> Result<Self, UnifiedDbError> {
        let (resolved, db_file) = match storage_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| {
                    UnifiedDbError::Connection(format!(
                        "failed to create storage directory {}: {e}",
                        dir.display()
                    ))
                })?;
                let file = dir.join("db.sqlite");
                (file.to_string_lossy().into_owned(), Some(file))
            }
            None if db_path == ":memory:" => (db_path.to_owned(), None),
            None => (db_path.to_owned(), Some(PathBuf::from(db_path))),
        };

        let db = turso::Builder::new_local(&resolved)
            .build()
            .await
            .map_err(|e| {
                UnifiedDbError::Connection(format!("failed to create vm database: {e}"))
            })?;
        let conn = db.connect().map_err(|e| {
            UnifiedDbError::Connection(format!("failed to connect vm database: {e}"))
        })?;

        // Best-effort pragmas; in-memory and unsupported modes reject them.
        attempt(diags, "pragma", conn.execute("PRAGMA journal_mode = WAL", ()).await);
        attempt(diags, "pragma", conn.execute("PRAGMA foreign_keys = ON", ()).await);

        Ok(Self {
            conn,
            _db: db,
            db_file,
        })
    }

    /// Execute a batch of SQL statements in one shot.
    pub(crate) async fn execute_batch(&self, sql: &str) -> Result<(), UnifiedDbError> {
        self.conn
            .execute_batch(sql)
            .await
            .map_err(UnifiedDbError::Vm)
    }
}

impl std::fmt::Debug for VmConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmConnection")
            .field("db_file", &self.db_file)
            .finish()
    }
}
