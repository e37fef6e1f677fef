// Native module - the call-based backend over the synchronous engine
//
// - connect: exclusive connection handle and blocking-pool dispatch
// - executor: one-shot batch/select/dml execution
// - params: parameter conversion between unified and engine types
// - query: result extraction and row materialization
// - statement: prepared-statement handle

pub mod connect;
pub mod executor;
pub mod params;
pub mod query;
pub mod statement;

pub use connect::NativeConnection;
pub use executor::{execute_batch, execute_dml, execute_select};
pub use statement::NativeStatement;
