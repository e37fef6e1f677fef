use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;

use crate::classify::classify;
use crate::diagnostics::{Diagnostics, attempt};
use crate::error::UnifiedDbError;
use crate::results::RowSet;
use crate::statement::{BackendStatement, UnifiedStatement};
use crate::values::ParamSet;

#[cfg(feature = "native")]
use crate::extension::{find_local_prebuilt, load_vec_extension};
#[cfg(feature = "native")]
use crate::native::{self, NativeConnection, NativeStatement};
#[cfg(feature = "vm")]
use crate::vm::{self, VmConnection, VmStatement};

/// Whether the façade currently owns a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Open,
    Closed,
}

/// The execution engine behind a database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum BackendKind {
    /// Call-based synchronous engine (in-process native binding).
    #[cfg(feature = "native")]
    Native,
    /// Step-based cursor engine (portable VM build).
    #[cfg(feature = "vm")]
    Vm,
}

impl BackendKind {
    fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "native")]
            BackendKind::Native => "native",
            #[cfg(feature = "vm")]
            BackendKind::Vm => "vm",
        }
    }
}

/// How the façade treats the sqlite-vec extension at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPolicy {
    /// Probe the search directory and load the best match when one exists.
    Auto,
    /// Never load an extension.
    Disabled,
    /// Load exactly this binary, bypassing the locator.
    Explicit(PathBuf),
}

/// Options for one unified database.
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub backend: BackendKind,
    pub db_path: String,
    /// Directory-scoped durable storage for the VM backend; the database
    /// file lives at `<dir>/db.sqlite`.
    pub storage_dir: Option<PathBuf>,
    pub extension: ExtensionPolicy,
    /// Search directory for the extension locator under `Auto`.
    pub extension_dir: PathBuf,
    pub debug: bool,
}

impl DatabaseOptions {
    /// Defaults for the given backend and path. The process environment is
    /// consulted exactly once, here: `SQLITE3_VEC_EXTENSION` overrides the
    /// locator with an explicit binary and `SQLITE3_VEC_DEBUG=1` turns on
    /// diagnostics.
    #[must_use]
    pub fn new(backend: BackendKind, db_path: impl Into<String>) -> Self {
        let extension = match std::env::var_os("SQLITE3_VEC_EXTENSION") {
            Some(path) if !path.is_empty() => ExtensionPolicy::Explicit(PathBuf::from(path)),
            _ => ExtensionPolicy::Auto,
        };
        let debug = std::env::var("SQLITE3_VEC_DEBUG").is_ok_and(|v| v == "1");
        Self {
            backend,
            db_path: db_path.into(),
            storage_dir: None,
            extension,
            extension_dir: PathBuf::from("dist/native"),
            debug,
        }
    }
}

/// Fluent builder for database options.
#[derive(Debug, Clone)]
pub struct DatabaseOptionsBuilder {
    opts: DatabaseOptions,
}

impl DatabaseOptionsBuilder {
    #[must_use]
    pub fn new(backend: BackendKind, db_path: impl Into<String>) -> Self {
        Self {
            opts: DatabaseOptions::new(backend, db_path),
        }
    }

    #[must_use]
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.storage_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn extension(mut self, policy: ExtensionPolicy) -> Self {
        self.opts.extension = policy;
        self
    }

    #[must_use]
    pub fn extension_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.opts.extension_dir = dir.into();
        self
    }

    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.opts.debug = enabled;
        self
    }

    #[must_use]
    pub fn finish(self) -> DatabaseOptions {
        self.opts
    }

    /// Build the façade. No engine work happens until `open` (or the first
    /// `prepare`/`exec`, which open implicitly).
    #[must_use]
    pub fn build(self) -> UnifiedDatabase {
        UnifiedDatabase::new(self.finish())
    }
}

/// One open engine connection, selected at open time.
pub enum BackendConnection {
    #[cfg(feature = "native")]
    Native(NativeConnection),
    #[cfg(feature = "vm")]
    Vm(VmConnection),
}

/// Connection-level one-shot execution surface shared by both engines.
#[async_trait]
pub trait UnifiedExecutor {
    /// Executes a batch of SQL statements (no parameters) in one shot.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), UnifiedDbError>;

    /// Executes a single SELECT statement and materializes the rows.
    async fn execute_select(
        &mut self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<RowSet, UnifiedDbError>;

    /// Executes a single DML statement and reports rows affected.
    async fn execute_dml(&mut self, sql: &str, params: &ParamSet)
    -> Result<usize, UnifiedDbError>;
}

#[async_trait]
impl UnifiedExecutor for BackendConnection {
    async fn execute_batch(&mut self, sql: &str) -> Result<(), UnifiedDbError> {
        match self {
            #[cfg(feature = "native")]
            BackendConnection::Native(conn) => native::execute_batch(conn, sql).await,
            #[cfg(feature = "vm")]
            BackendConnection::Vm(conn) => vm::execute_batch(conn, sql).await,
        }
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<RowSet, UnifiedDbError> {
        match self {
            #[cfg(feature = "native")]
            BackendConnection::Native(conn) => native::execute_select(conn, sql, params).await,
            #[cfg(feature = "vm")]
            BackendConnection::Vm(conn) => vm::execute_select(conn, sql, params).await,
        }
    }

    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<usize, UnifiedDbError> {
        match self {
            #[cfg(feature = "native")]
            BackendConnection::Native(conn) => native::execute_dml(conn, sql, params).await,
            #[cfg(feature = "vm")]
            BackendConnection::Vm(conn) => vm::execute_dml(conn, sql, params).await,
        }
    }
}

/// Ad-hoc one-shot execution through the façade, opening implicitly and
/// bypassing the statement cache.
#[async_trait]
impl UnifiedExecutor for UnifiedDatabase {
    async fn execute_batch(&mut self, sql: &str) -> Result<(), UnifiedDbError> {
        self.exec(sql).await
    }

    async fn execute_select(
        &mut self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<RowSet, UnifiedDbError> {
        self.open().await?;
        let conn = self.connection.as_mut().ok_or_else(closed_error)?;
        conn.execute_select(sql, params).await
    }

    async fn execute_dml(
        &mut self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<usize, UnifiedDbError> {
        self.open().await?;
        let conn = self.connection.as_mut().ok_or_else(closed_error)?;
        conn.execute_dml(sql, params).await
    }
}

/// Engine version report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineVersion {
    pub lib_version: String,
    /// Present when the sqlite-vec extension answers `vec_version()`.
    pub vec_version: Option<String>,
}

/// The per-connection façade: owns the engine connection lifecycle and the
/// statement cache, and hands out [`UnifiedStatement`] adapters.
///
/// Methods take `&mut self`; callers sharing a façade (or a cached statement
/// id) across tasks must serialize access themselves.
pub struct UnifiedDatabase {
    options: DatabaseOptions,
    diags: Diagnostics,
    connection: Option<BackendConnection>,
    statements: HashMap<String, Arc<UnifiedStatement>>,
}

impl UnifiedDatabase {
    #[must_use]
    pub fn new(options: DatabaseOptions) -> Self {
        let diags = Diagnostics::new(options.debug);
        Self {
            options,
            diags,
            connection: None,
            statements: HashMap::new(),
        }
    }

    /// Builder for a call-based (native engine) database.
    #[cfg(feature = "native")]
    #[must_use]
    pub fn native_builder(db_path: impl Into<String>) -> DatabaseOptionsBuilder {
        DatabaseOptionsBuilder::new(BackendKind::Native, db_path)
    }

    /// Builder for a step-based (VM engine) database.
    #[cfg(feature = "vm")]
    #[must_use]
    pub fn vm_builder(db_path: impl Into<String>) -> DatabaseOptionsBuilder {
        DatabaseOptionsBuilder::new(BackendKind::Vm, db_path)
    }

    /// Establish the engine connection. Idempotent: an already-open façade
    /// returns immediately.
    ///
    /// # Errors
    ///
    /// Returns [`UnifiedDbError`] when the engine cannot be opened, or when
    /// extension loading is requested and fails
    /// ([`UnifiedDbError::ExtensionLoad`] /
    /// [`UnifiedDbError::ExtensionUnsupported`]).
    pub async fn open(&mut self) -> Result<(), UnifiedDbError> {
        if self.connection.is_some() {
            return Ok(());
        }
        let conn = match self.options.backend {
            #[cfg(feature = "native")]
            BackendKind::Native => {
                let conn = NativeConnection::open(&self.options.db_path, &self.diags).await?;
                self.autoload_extension(&conn).await?;
                BackendConnection::Native(conn)
            }
            #[cfg(feature = "vm")]
            BackendKind::Vm => {
                if let ExtensionPolicy::Explicit(path) = &self.options.extension {
                    self.diags.note(
                        "open",
                        format_args!("cannot load {} on the vm backend", path.display()),
                    );
                    return Err(UnifiedDbError::ExtensionUnsupported("vm"));
                }
                let conn = VmConnection::open(
                    &self.options.db_path,
                    self.options.storage_dir.as_deref(),
                    &self.diags,
                )
                .await?;
                BackendConnection::Vm(conn)
            }
        };
        self.connection = Some(conn);
        self.diags.note(
            "open",
            format_args!("{} backend ready", self.options.backend.name()),
        );
        Ok(())
    }

    #[cfg(feature = "native")]
    async fn autoload_extension(&self, conn: &NativeConnection) -> Result<(), UnifiedDbError> {
        let path = match &self.options.extension {
            ExtensionPolicy::Disabled => None,
            ExtensionPolicy::Explicit(path) => Some(path.clone()),
            ExtensionPolicy::Auto => find_local_prebuilt(&self.options.extension_dir),
        };
        let Some(path) = path else {
            self.diags
                .note("open", format_args!("no extension asset to load"));
            return Ok(());
        };
        load_vec_extension(conn, &path, &self.diags).await
    }

    /// Finalize every cached statement, clear the cache, and release the
    /// connection. Safe to call when already closed.
    pub async fn close(&mut self) {
        let cached: Vec<Arc<UnifiedStatement>> =
            self.statements.drain().map(|(_, stmt)| stmt).collect();
        for stmt in cached {
            // Teardown trouble must not keep the connection alive.
            attempt(&self.diags, "close", stmt.finalize().await);
        }
        self.connection = None;
    }

    /// Close, then best-effort delete the backing storage of a file-backed
    /// database.
    pub async fn destroy(&mut self) {
        let storage = self.storage_file();
        self.close().await;
        if let Some(path) = storage {
            attempt(&self.diags, "destroy", std::fs::remove_file(&path));
        }
    }

    fn storage_file(&self) -> Option<PathBuf> {
        // An open VM connection knows its resolved file; otherwise derive
        // the location from the options.
        #[cfg(feature = "vm")]
        if let Some(BackendConnection::Vm(vm_conn)) = &self.connection {
            return vm_conn.db_file.clone();
        }
        match self.options.backend {
            #[cfg(feature = "native")]
            BackendKind::Native => (self.options.db_path != ":memory:")
                .then(|| PathBuf::from(&self.options.db_path)),
            #[cfg(feature = "vm")]
            BackendKind::Vm => self
                .options
                .storage_dir
                .as_ref()
                .map(|dir| dir.join("db.sqlite"))
                .or_else(|| {
                    (self.options.db_path != ":memory:")
                        .then(|| PathBuf::from(&self.options.db_path))
                }),
        }
    }

    /// One-shot execution bypassing the statement cache, for DDL and ad-hoc
    /// statements the caller will not re-invoke. Opens implicitly.
    ///
    /// # Errors
    ///
    /// Returns [`UnifiedDbError`] when opening or execution fails.
    pub async fn exec(&mut self, sql: &str) -> Result<(), UnifiedDbError> {
        self.open().await?;
        let conn = self.connection.as_mut().ok_or_else(closed_error)?;
        conn.execute_batch(sql).await
    }

    /// Prepare `sql`, caching the adapter under `id` when one is given.
    ///
    /// A cache hit returns the same adapter instance after resetting its
    /// bound state; it never creates a second engine statement for the same
    /// id. Statements prepared without an id are not cached and their
    /// finalization is the caller's business.
    ///
    /// # Errors
    ///
    /// Returns [`UnifiedDbError`] when opening or engine preparation fails.
    /// A failed prepare never leaves a cache entry behind.
    pub async fn prepare(
        &mut self,
        sql: &str,
        id: Option<&str>,
    ) -> Result<Arc<UnifiedStatement>, UnifiedDbError> {
        self.open().await?;

        if let Some(id) = id {
            if let Some(existing) = self.statements.get(id) {
                let existing = Arc::clone(existing);
                existing.reset().await;
                self.diags
                    .note("prepare", format_args!("cache hit for id {id}"));
                return Ok(existing);
            }
        }

        let meta = classify(sql);
        if meta.mixed {
            tracing::warn!(
                target: "sqlite_vec_unified",
                "SQL mixes named and positional placeholders; the named interpretation wins: {}",
                sql
            );
        }
        self.diags.note(
            "prepare",
            format_args!("{:?} style, {} positional slots", meta.style, meta.param_count),
        );

        let sql_arc = Arc::new(sql.to_owned());
        let conn = self.connection.as_ref().ok_or_else(closed_error)?;
        let backend = match conn {
            #[cfg(feature = "native")]
            BackendConnection::Native(native_conn) => BackendStatement::Native(
                NativeStatement::prepare(native_conn, Arc::clone(&sql_arc)).await?,
            ),
            #[cfg(feature = "vm")]
            BackendConnection::Vm(vm_conn) => BackendStatement::Vm(
                VmStatement::prepare(vm_conn, Arc::clone(&sql_arc), self.diags).await?,
            ),
        };

        let stmt = Arc::new(UnifiedStatement::new(meta, sql_arc, backend, self.diags));
        if let Some(id) = id {
            self.statements.insert(id.to_owned(), Arc::clone(&stmt));
        }
        Ok(stmt)
    }

    /// Engine version, plus the extension version when `vec_version()`
    /// answers (best-effort).
    ///
    /// # Errors
    ///
    /// Returns [`UnifiedDbError`] when opening or the base version query
    /// fails.
    pub async fn version(&mut self) -> Result<EngineVersion, UnifiedDbError> {
        self.open().await?;
        let diags = self.diags;
        let conn = self.connection.as_mut().ok_or_else(closed_error)?;

        let lib = conn
            .execute_select("SELECT sqlite_version() AS v", &ParamSet::Empty)
            .await?;
        let lib_version = first_text(&lib).unwrap_or_default();

        let vec_version = attempt(
            &diags,
            "version",
            conn.execute_select("SELECT vec_version() AS v", &ParamSet::Empty)
                .await,
        )
        .and_then(|rows| first_text(&rows));

        Ok(EngineVersion {
            lib_version,
            vec_version,
        })
    }

    #[must_use]
    pub fn status(&self) -> Status {
        if self.connection.is_some() {
            Status::Open
        } else {
            Status::Closed
        }
    }

    /// Number of live entries in the statement cache.
    #[must_use]
    pub fn cached_statement_count(&self) -> usize {
        self.statements.len()
    }
}

impl std::fmt::Debug for UnifiedDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedDatabase")
            .field("backend", &self.options.backend)
            .field("db_path", &self.options.db_path)
            .field("status", &self.status())
            .field("cached_statements", &self.statements.len())
            .finish()
    }
}

fn closed_error() -> UnifiedDbError {
    UnifiedDbError::Connection("database is closed".to_owned())
}

fn first_text(rows: &RowSet) -> Option<String> {
    rows.rows
        .first()
        .and_then(|row| row.get("v"))
        .and_then(|value| value.as_text().map(str::to_owned))
}
