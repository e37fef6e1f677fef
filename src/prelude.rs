//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::classify::{PlaceholderStyle, SqlMeta, classify};
pub use crate::database::{
    BackendKind, DatabaseOptions, DatabaseOptionsBuilder, EngineVersion, ExtensionPolicy, Status,
    UnifiedDatabase, UnifiedExecutor,
};
pub use crate::diagnostics::Diagnostics;
pub use crate::error::UnifiedDbError;
pub use crate::extension::{find_local_prebuilt, lib_extension, platform_triple};
pub use crate::normalize::{normalize_params, normalize_value, to_positional_param_object};
pub use crate::results::{Row, RowSet};
pub use crate::statement::UnifiedStatement;
pub use crate::values::{ParamSet, SqlValue};

#[cfg(feature = "native")]
pub use crate::extension::{ENTRY_POINTS, load_vec_extension};
#[cfg(feature = "native")]
pub use crate::native::NativeConnection;
#[cfg(feature = "vm")]
pub use crate::vm::VmConnection;
