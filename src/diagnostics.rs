use std::fmt;

/// Sink for structured diagnostic events.
///
/// The toggle is captured once at construction and threaded through the
/// façade and adapters, so deep helpers never consult ambient process state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn note(&self, operation: &str, detail: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::debug!(target: "sqlite_vec_unified", "{}: {}", operation, detail);
        }
    }
}

/// Run a best-effort operation, logging and swallowing its failure.
///
/// Every swallow-and-continue site in the crate (pragmas, storage cleanup,
/// defensive resets, close-time finalizes) goes through here so the policy
/// is declared rather than hidden in empty error arms.
pub(crate) fn attempt<T, E: fmt::Display>(
    diags: &Diagnostics,
    what: &str,
    result: Result<T, E>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            diags.note(what, format_args!("ignored failure: {err}"));
            None
        }
    }
}
