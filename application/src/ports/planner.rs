//! Planner port
//!
//! Asks the external planner (an oracle call behind the scenes) for a raw
//! step list. Validation of the proposed list is the engine's job, not the
//! planner's; the retry loop feeds validation errors back through the
//! `feedback` argument so the next draft can correct them.

use super::oracle::OracleError;
use async_trait::async_trait;
use tactician_domain::{Query, StepRecord};
use thiserror::Error;

/// Errors that can occur while drafting a plan
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Planner response contained no step list: {0}")]
    Unparseable(String),
}

/// External planner that proposes step lists for compound strategies
#[async_trait]
pub trait PlannerPort: Send + Sync {
    /// Draft a step list for `query`.
    ///
    /// `feedback` carries the accumulated error text from the previous
    /// generate/validate round, if any.
    async fn draft_plan(
        &self,
        query: &Query,
        feedback: Option<&str>,
    ) -> Result<Vec<StepRecord>, PlannerError>;
}
