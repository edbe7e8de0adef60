//! Use cases - the engine's orchestrated operations.

pub mod acquire_plan;
pub mod execute_plan;
pub mod run_ensemble;
pub mod run_request;

pub(crate) mod shared;
