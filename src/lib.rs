//! Unified async prepared-statement interface over two SQLite execution
//! engines: a call-based synchronous native binding and a step-based
//! in-process VM engine, with sqlite-vec loadable-extension discovery for
//! the native side.
//!
//! The façade owns one exclusive connection and a statement cache keyed by
//! caller-supplied ids; adapters expose one binding/execution contract
//! (`bind`/`run`/`get`/`all`/`reset`/`finalize`/`step`) whichever engine is
//! behind them:
//!
//! ```rust,no_run
//! use sqlite_vec_unified::prelude::*;
//!
//! # async fn demo() -> Result<(), UnifiedDbError> {
//! let mut db = UnifiedDatabase::native_builder(":memory:").build();
//! db.exec("CREATE TABLE t (a, b)").await?;
//! let insert = db.prepare("INSERT INTO t VALUES (?1, ?2)", Some("ins")).await?;
//! insert
//!     .run(Some(vec![SqlValue::Int(1), SqlValue::Int(2)].into()))
//!     .await?;
//! let rows = db.prepare("SELECT a, b FROM t", None).await?.all(None).await?;
//! assert_eq!(rows.rows.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod database;
pub mod diagnostics;
pub mod error;
pub mod extension;
#[cfg(feature = "native")]
pub mod native;
pub mod normalize;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod values;
#[cfg(feature = "vm")]
pub mod vm;

pub use database::{
    BackendKind, DatabaseOptions, DatabaseOptionsBuilder, EngineVersion, ExtensionPolicy, Status,
    UnifiedDatabase, UnifiedExecutor,
};
pub use error::UnifiedDbError;
pub use statement::UnifiedStatement;
