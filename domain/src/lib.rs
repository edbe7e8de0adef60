//! Domain layer for tactician
//!
//! This crate contains the core business logic, entities, and value objects
//! of the strategy orchestration engine. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Plan
//!
//! A compound strategy asks an external planner for a list of steps with
//! data dependencies. The plan graph builder validates the list (acyclic,
//! every consumed key produced by a preceding step) and freezes a
//! topological execution order.
//!
//! ## Symbol
//!
//! Each completed step binds a typed, described value in the run's symbol
//! table; later steps consume those values by key.
//!
//! ## Ensemble
//!
//! Several strategies (or repeated runs of one) vote on the answer. Votes
//! are normalized, weighted, and tallied; once a key has mathematically
//! secured the majority, sampling can stop early.

pub mod context;
pub mod core;
pub mod ensemble;
pub mod plan;
pub mod routing;
pub mod symbol;

// Re-export commonly used types
pub use context::RunContext;
pub use core::{
    error::DomainError,
    query::{Query, QueryId, RunId},
};
pub use ensemble::{
    EnsembleConfig, EnsembleEntry, PostProcessing, VoteKey, VoteOutcome, VoteTally, VotingKind,
    normalize,
};
pub use plan::{
    DependentRef, Plan, PlanValidationError, StepDescriptor, StepRecord, StepValidationIssue,
    parse_step_list, parse_step_list_json,
};
pub use routing::{Complexity, ProblemProfile};
pub use symbol::{Symbol, SymbolTable};
