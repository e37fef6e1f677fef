use thiserror::Error;

#[cfg(feature = "native")]
use std::path::PathBuf;

#[cfg(feature = "native")]
use rusqlite;
#[cfg(feature = "vm")]
use turso;

#[derive(Debug, Error)]
pub enum UnifiedDbError {
    #[cfg(feature = "native")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "vm")]
    #[error(transparent)]
    Vm(#[from] turso::Error),

    /// The active backend exposes no extension-loading primitive.
    #[error("extension loading is not supported by the {0} backend")]
    ExtensionUnsupported(&'static str),

    /// Every entry-point attempt failed; carries the last underlying error.
    #[cfg(feature = "native")]
    #[error("failed to load sqlite-vec extension from {}", .path.display())]
    ExtensionLoad {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("statement finalize failed: {0}")]
    Finalize(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parameter error: {0}")]
    Parameter(String),

    #[error("execution error: {0}")]
    Execution(String),
}
