//! Entry-point resolution for sqlite-vec loadable extensions.
//!
//! rusqlite's extension API is unsafe; the whole surface is kept in this
//! module so the rest of the crate stays free of unsafe code.
#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::error::UnifiedDbError;
use crate::native::connect::{NativeConnection, run_blocking};

/// Well-known initialization symbols, tried in order before letting the
/// engine derive the entry point from the file name.
pub const ENTRY_POINTS: [&str; 3] = [
    "sqlite3_extension_init",
    "sqlite3_sqlitevec_init",
    "sqlite3_vec_init",
];

/// Load the loadable extension at `path` into the native connection.
///
/// On success the connection has the extension's SQL functions and virtual
/// table modules registered. Loading twice is the engine's business; no
/// retry or dedup happens here.
///
/// # Errors
///
/// Returns [`UnifiedDbError::ExtensionLoad`] carrying the last underlying
/// engine error when every entry-point attempt fails, or the engine error
/// directly if extension loading cannot be enabled at all.
pub async fn load_vec_extension(
    conn: &NativeConnection,
    path: &Path,
    diags: &Diagnostics,
) -> Result<(), UnifiedDbError> {
    let owned: PathBuf = path.to_path_buf();
    let diags = *diags;
    run_blocking(conn.handle(), move |guard| {
        load_sync(guard, &owned, &diags)
    })
    .await
}

fn load_sync(
    conn: &mut rusqlite::Connection,
    path: &Path,
    diags: &Diagnostics,
) -> Result<(), UnifiedDbError> {
    // SAFETY: loading is enabled only around the attempts below and disabled
    // again before returning, whatever the outcome.
    unsafe { conn.load_extension_enable() }.map_err(UnifiedDbError::Sqlite)?;
    let outcome = try_entry_points(conn, path, diags);
    let _ = conn.load_extension_disable();
    outcome
}

fn try_entry_points(
    conn: &rusqlite::Connection,
    path: &Path,
    diags: &Diagnostics,
) -> Result<(), UnifiedDbError> {
    let mut last_err: Option<rusqlite::Error> = None;
    for entry_point in ENTRY_POINTS {
        // SAFETY: the file at `path` is expected to be a SQLite loadable
        // extension exposing `entry_point` as an initialization symbol.
        match unsafe { conn.load_extension(path, Some(entry_point)) } {
            Ok(()) => {
                diags.note(
                    "load-extension",
                    format_args!("loaded {} via {entry_point}", path.display()),
                );
                return Ok(());
            }
            Err(err) => last_err = Some(err),
        }
    }
    // SAFETY: same contract, with the engine deriving the entry point from
    // the file name.
    match unsafe { conn.load_extension(path, None) } {
        Ok(()) => {
            diags.note(
                "load-extension",
                format_args!(
                    "loaded {} via filename-derived entry point",
                    path.display()
                ),
            );
            Ok(())
        }
        Err(fallback_err) => Err(UnifiedDbError::ExtensionLoad {
            path: path.to_path_buf(),
            source: last_err.unwrap_or(fallback_err),
        }),
    }
}
