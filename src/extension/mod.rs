// Extension module - discovery and loading of prebuilt sqlite-vec assets
//
// - platform: platform/arch/libc triple and library file extension
// - locate: best-match scan of a search directory
// - loader: entry-point resolution against a native connection

pub mod locate;
#[cfg(feature = "native")]
pub mod loader;
pub mod platform;

pub use locate::find_local_prebuilt;
#[cfg(feature = "native")]
pub use loader::{ENTRY_POINTS, load_vec_extension};
pub use platform::{lib_extension, platform_triple};
