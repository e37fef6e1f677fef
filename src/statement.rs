use std::sync::{Arc, Mutex, MutexGuard};

use crate::classify::{PlaceholderStyle, SqlMeta};
use crate::diagnostics::Diagnostics;
use crate::error::UnifiedDbError;
use crate::normalize::{normalize_params, to_positional_param_object};
use crate::results::{Row, RowSet};
use crate::values::ParamSet;

#[cfg(feature = "native")]
use crate::native::{NativeStatement, params::NativeParams};
#[cfg(feature = "vm")]
use crate::vm::{VmStatement, params as vm_params};

/// The engine-native statement behind one adapter, chosen once at prepare
/// time.
pub(crate) enum BackendStatement {
    #[cfg(feature = "native")]
    Native(NativeStatement),
    #[cfg(feature = "vm")]
    Vm(VmStatement),
}

/// One prepared statement behind the unified binding/execution contract.
///
/// The adapter pairs the statement's placeholder metadata (computed once)
/// with a deferred parameter slot: `bind` stores values, the next execution
/// call resolves them, and `run` clears them afterwards. Instances are
/// handed out as `Arc`s by the façade's cache, so a cache hit returns the
/// same adapter identity.
pub struct UnifiedStatement {
    meta: SqlMeta,
    sql: Arc<String>,
    pending: Mutex<Option<ParamSet>>,
    backend: BackendStatement,
    diags: Diagnostics,
}

impl UnifiedStatement {
    pub(crate) fn new(
        meta: SqlMeta,
        sql: Arc<String>,
        backend: BackendStatement,
        diags: Diagnostics,
    ) -> Self {
        Self {
            meta,
            sql,
            pending: Mutex::new(None),
            backend,
            diags,
        }
    }

    /// Placeholder metadata derived from the SQL text at prepare time.
    #[must_use]
    pub fn meta(&self) -> SqlMeta {
        self.meta
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        self.sql.as_str()
    }

    /// Store parameters for the next execution call; returns the adapter for
    /// chaining. On the step-based backend the values are also staged
    /// eagerly for a following `step`.
    pub async fn bind(&self, params: impl Into<ParamSet>) -> &Self {
        let set = params.into();
        #[cfg(feature = "vm")]
        if let BackendStatement::Vm(stmt) = &self.backend {
            let shaped = self.shape_params(set.clone());
            stmt.stage(vm_params::to_engine_params(&shaped)).await;
        }
        *self.pending_guard() = Some(set);
        self
    }

    /// Execute for side effect, reporting rows affected. The argument
    /// overrides any bound set; either way the stored binding is single-shot
    /// and cleared afterwards.
    pub async fn run(&self, params: Option<ParamSet>) -> Result<usize, UnifiedDbError> {
        let shaped = self.shape_params(self.take_effective(params));
        let affected = match &self.backend {
            #[cfg(feature = "native")]
            BackendStatement::Native(stmt) => {
                stmt.execute(NativeParams::from_set(&shaped)).await?
            }
            #[cfg(feature = "vm")]
            BackendStatement::Vm(stmt) => {
                stmt.execute(vm_params::to_engine_params(&shaped)).await?
            }
        };
        self.diags
            .note("run", format_args!("{affected} rows affected"));
        Ok(affected)
    }

    /// Execute and return at most one row, or None for an empty result set.
    /// Bound values persist across `get` calls until the next `run`.
    pub async fn get(&self, params: Option<ParamSet>) -> Result<Option<Row>, UnifiedDbError> {
        let shaped = self.shape_params(self.peek_effective(params));
        match &self.backend {
            #[cfg(feature = "native")]
            BackendStatement::Native(stmt) => {
                stmt.query_first(NativeParams::from_set(&shaped)).await
            }
            #[cfg(feature = "vm")]
            BackendStatement::Vm(stmt) => {
                stmt.query_first(vm_params::to_engine_params(&shaped)).await
            }
        }
    }

    /// Execute and materialize every result row in cursor order.
    pub async fn all(&self, params: Option<ParamSet>) -> Result<RowSet, UnifiedDbError> {
        let shaped = self.shape_params(self.peek_effective(params));
        match &self.backend {
            #[cfg(feature = "native")]
            BackendStatement::Native(stmt) => {
                stmt.query_all(NativeParams::from_set(&shaped)).await
            }
            #[cfg(feature = "vm")]
            BackendStatement::Vm(stmt) => {
                stmt.query_all(vm_params::to_engine_params(&shaped)).await
            }
        }
    }

    /// Return the statement to a re-executable state, dropping any bound
    /// values. Never fails; the cache reuses statements through here.
    pub async fn reset(&self) {
        self.pending_guard().take();
        match &self.backend {
            #[cfg(feature = "native")]
            BackendStatement::Native(_) => {
                // The call-based engine rebinds per call; nothing to clear.
            }
            #[cfg(feature = "vm")]
            BackendStatement::Vm(stmt) => stmt.reset().await,
        }
    }

    /// Release engine resources. Reserved for non-cached statements; the
    /// façade finalizes cached entries itself on close.
    ///
    /// # Errors
    ///
    /// Returns [`UnifiedDbError::Finalize`] when the engine reports a
    /// failing teardown status.
    pub async fn finalize(&self) -> Result<(), UnifiedDbError> {
        match &self.backend {
            #[cfg(feature = "native")]
            BackendStatement::Native(_) => Ok(()),
            #[cfg(feature = "vm")]
            BackendStatement::Vm(stmt) => stmt.finalize().await,
        }
    }

    /// Advance the step cursor on the step-based backend. On the call-based
    /// backend this is a no-op returning false; row iteration goes through
    /// `get`/`all` there.
    pub async fn step(&self) -> Result<bool, UnifiedDbError> {
        match &self.backend {
            #[cfg(feature = "native")]
            BackendStatement::Native(_) => Ok(false),
            #[cfg(feature = "vm")]
            BackendStatement::Vm(stmt) => stmt.step().await,
        }
    }

    /// Normalize a caller set for this statement's placeholder style:
    /// positional oversupply is clamped to the slot count, and a sequence
    /// handed to a named statement is exposed through the 1-based mapping
    /// form so the engine arbitrates the bind.
    fn shape_params(&self, set: ParamSet) -> ParamSet {
        let normalized = normalize_params(&set);
        match (self.meta.style, normalized) {
            (
                PlaceholderStyle::Numeric | PlaceholderStyle::Anonymous,
                ParamSet::Positional(mut values),
            ) => {
                if values.len() > self.meta.param_count {
                    self.diags.note(
                        "bind",
                        format_args!(
                            "clamping {} supplied values to {} placeholder slots",
                            values.len(),
                            self.meta.param_count
                        ),
                    );
                    values.truncate(self.meta.param_count);
                }
                ParamSet::Positional(values)
            }
            (PlaceholderStyle::Named, ParamSet::Positional(values)) => {
                ParamSet::Named(to_positional_param_object(&values))
            }
            (_, other) => other,
        }
    }

    /// Argument overrides the bound set; the bound set is consumed.
    fn take_effective(&self, params: Option<ParamSet>) -> ParamSet {
        let stored = self.pending_guard().take();
        params.or(stored).unwrap_or_default()
    }

    /// Argument overrides the bound set; the bound set is kept for reuse.
    fn peek_effective(&self, params: Option<ParamSet>) -> ParamSet {
        match params {
            Some(set) => set,
            None => self.pending_guard().clone().unwrap_or_default(),
        }
    }

    fn pending_guard(&self) -> MutexGuard<'_, Option<ParamSet>> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for UnifiedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedStatement")
            .field("meta", &self.meta)
            .field("sql", &self.sql)
            .finish()
    }
}
