//! Infrastructure layer for tactician
//!
//! Adapters implementing the application layer's ports: a filesystem plan
//! cache, an in-memory plan cache, a planner that drives the reasoning
//! oracle, and a keyword-heuristic classifier usable when no external
//! classifier service is wired in.

pub mod cache;
pub mod classify;
pub mod planner;

// Re-export commonly used types
pub use cache::{fs_store::FsPlanCacheStore, memory::InMemoryPlanCacheStore};
pub use classify::keyword::KeywordClassifier;
pub use planner::oracle_planner::OraclePlanner;
