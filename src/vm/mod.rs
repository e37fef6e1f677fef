// Vm module - the step-based backend over the in-process VM engine
//
// - connect: connection and durable-storage setup
// - executor: one-shot batch/select/dml execution
// - params: parameter conversion between unified and engine types
// - query: cursor advancement and value extraction
// - statement: prepared-statement handle with the step lifecycle

pub mod connect;
pub mod executor;
pub mod params;
pub mod query;
pub mod statement;

pub use connect::VmConnection;
pub use executor::{execute_batch, execute_dml, execute_select};
pub use statement::VmStatement;
