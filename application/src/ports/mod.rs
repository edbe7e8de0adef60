//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! The reasoning oracle, the planner, the classifier, the plan cache store,
//! and the sandboxed code runner are all external collaborators the engine
//! only talks to through these narrow interfaces.

pub mod classifier;
pub mod code_runner;
pub mod oracle;
pub mod plan_cache;
pub mod planner;
