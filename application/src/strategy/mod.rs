//! Strategy surface: the polymorphic unit of work, its dependency bundle,
//! and the registry/router that pick one for a request.
//!
//! A strategy turns a problem (or a single plan step) into an answer,
//! usually by calling the reasoning oracle. Strategies are built from
//! factories held by the [`StrategyRegistry`]; the factories receive an
//! explicit [`StrategyDeps`] bundle instead of reaching for ambient global
//! state, which keeps the engine testable in isolation.

pub mod decompose;
pub mod direct;
pub mod program;
pub mod registry;
pub mod router;

use crate::ports::code_runner::{CodeRunError, CodeRunnerPort};
use crate::ports::classifier::ClassifierPort;
use crate::ports::oracle::{OracleError, ReasoningOracle};
use crate::ports::plan_cache::PlanCacheStore;
use crate::ports::planner::PlannerPort;
use crate::use_cases::acquire_plan::PlanAcquisitionError;
use crate::use_cases::execute_plan::ExecutePlanError;
use async_trait::async_trait;
use registry::StrategyRegistry;
use std::sync::Arc;
use tactician_domain::RunContext;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a strategy can raise while executing
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Code execution error: {0}")]
    CodeRun(#[from] CodeRunError),

    #[error("Plan acquisition failed: {0}")]
    PlanAcquisition(#[from] PlanAcquisitionError),

    #[error("Plan execution failed: {0}")]
    PlanExecution(Box<ExecutePlanError>),

    #[error("Compound strategy nested too deep ({depth} >= {limit})")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("Malformed oracle response: {0}")]
    MalformedResponse(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<ExecutePlanError> for StrategyError {
    fn from(error: ExecutePlanError) -> Self {
        StrategyError::PlanExecution(Box::new(error))
    }
}

/// A pluggable unit that turns a problem (or sub-step) into an answer.
///
/// When `ctx.current_step` is set, the strategy is solving one plan step
/// and should draw its inputs from the step's dependent refs via the symbol
/// table; otherwise it solves `ctx.query` directly.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Registered name of this strategy.
    fn name(&self) -> &'static str;

    /// Produce an answer, mutating the run context as work proceeds.
    async fn execute(&self, ctx: &mut RunContext) -> Result<String, StrategyError>;
}

/// Factory producing a strategy instance bound to the given dependencies.
pub type StrategyFactory = Arc<dyn Fn(&StrategyDeps) -> Arc<dyn Strategy> + Send + Sync>;

/// Everything a strategy may need, bundled explicitly.
///
/// Passed into factories at instantiation time; the registry itself is part
/// of the bundle so compound strategies can route their sub-steps
/// recursively without any global lookup.
#[derive(Clone)]
pub struct StrategyDeps {
    pub oracle: Arc<dyn ReasoningOracle>,
    pub planner: Arc<dyn PlannerPort>,
    pub plan_cache: Arc<dyn PlanCacheStore>,
    pub classifier: Arc<dyn ClassifierPort>,
    pub code_runner: Arc<dyn CodeRunnerPort>,
    pub registry: Arc<StrategyRegistry>,
    pub cancellation_token: Option<CancellationToken>,
}

impl StrategyDeps {
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }
}

/// Assemble the problem text a leaf strategy should work on.
///
/// For a plan step this is the step instruction plus the values of its
/// dependent refs pulled from the symbol table; for a top-level request it
/// is the query plus any accumulated context.
pub(crate) fn problem_text(ctx: &RunContext) -> String {
    if let Some(step) = &ctx.current_step {
        let mut text = step.full_instruction();
        for dependent in &step.dependent_refs {
            if let Some(symbol) = ctx.symbols.get(&dependent.dependent_key) {
                text.push_str(&format!(
                    "\n\n{} ({}): {}",
                    dependent.dependent_key,
                    symbol.declared_type,
                    symbol.value_text()
                ));
            }
        }
        return text;
    }

    let mut text = ctx.query.content().to_string();
    if !ctx.long_context.is_empty() {
        text.push_str("\n\nContext:\n");
        text.push_str(&ctx.long_context);
    }
    if !ctx.short_context.is_empty() {
        text.push_str("\n\nNotes:\n");
        text.push_str(&ctx.short_context);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactician_domain::{DependentRef, StepDescriptor, Symbol};

    #[test]
    fn test_problem_text_for_top_level_request() {
        let ctx = RunContext::new("How many moons does Mars have?")
            .with_long_context("An astronomy quiz.");
        let text = problem_text(&ctx);
        assert!(text.starts_with("How many moons does Mars have?"));
        assert!(text.contains("An astronomy quiz."));
    }

    #[test]
    fn test_problem_text_for_step_includes_dependents() {
        let mut ctx = RunContext::new("original query");
        ctx.symbols
            .bind("factors", Symbol::new(serde_json::json!([2, 3]), "list[int]", ""));
        ctx.current_step = Some(
            StepDescriptor::new("2", "Sum the factors")
                .with_dependent_ref(DependentRef::new("factors", "list[int]")),
        );

        let text = problem_text(&ctx);
        assert!(text.starts_with("Sum the factors"));
        assert!(text.contains("factors (list[int]): [2,3]"));
        assert!(!text.contains("original query"));
    }
}
