//! Application layer for tactician
//!
//! Use cases and ports for the strategy orchestration engine. This layer
//! owns the control flow — routing, plan acquisition and execution,
//! ensemble voting — and depends on the domain layer for the entities it
//! orchestrates. External services (the reasoning oracle, the planner, the
//! plan cache, the classifier, the code sandbox) are reached only through
//! the port traits defined here; their adapters live in the infrastructure
//! layer.

pub mod ports;
pub mod strategy;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use ports::{
    classifier::{ClassifierError, ClassifierPort},
    code_runner::{CodeRunError, CodeRunnerPort},
    oracle::{OracleError, ReasoningOracle},
    plan_cache::{PlanCacheError, PlanCacheStore},
    planner::{PlannerError, PlannerPort},
};
pub use strategy::{
    Strategy, StrategyDeps, StrategyError, StrategyFactory,
    decompose::{DecomposeStrategy, MAX_DECOMPOSE_DEPTH},
    direct::DirectStrategy,
    program::ProgramStrategy,
    registry::{RegistryError, StrategyRegistry},
    router::Router,
};
pub use use_cases::{
    acquire_plan::{AcquirePlanUseCase, MAX_PLAN_ROUNDS, PlanAcquisitionError},
    execute_plan::{ExecutePlanError, ExecutePlanUseCase},
    run_ensemble::{EnsembleError, RunEnsembleUseCase},
    run_request::{RunRequestError, RunRequestInput, RunRequestOutput, RunRequestUseCase},
};
