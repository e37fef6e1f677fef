use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use super::platform::{lib_extension, platform_triple};

lazy_static! {
    static ref COMPATIBLE_ASSET: Regex = Regex::new(r"(?i)^sqlite-vec.*\.(so|dylib|dll)$").unwrap();
}

/// Find the best loadable-extension candidate in `search_dir`.
///
/// Prefers the exact `sqlite-vec-<triple>.<ext>` asset for the running
/// platform, then falls back to the first entry shaped like any sqlite-vec
/// library. Returns None when the directory is missing or holds no
/// candidate. Entries are sorted by name so the scan does not depend on OS
/// listing order; subdirectories are not searched.
#[must_use]
pub fn find_local_prebuilt(search_dir: &Path) -> Option<PathBuf> {
    let preferred = format!("sqlite-vec-{}.{}", platform_triple(), lib_extension());
    let mut entries: Vec<String> = std::fs::read_dir(search_dir)
        .ok()?
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    entries.sort();

    if entries.iter().any(|name| name == &preferred) {
        return Some(search_dir.join(preferred));
    }
    entries
        .iter()
        .find(|name| COMPATIBLE_ASSET.is_match(name))
        .map(|name| search_dir.join(name))
}
