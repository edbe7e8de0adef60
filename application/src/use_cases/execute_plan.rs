//! Plan execution - run a validated plan's steps in their frozen order.
//!
//! Steps run strictly sequentially. Each step is routed to a strategy via
//! its hint, executed against a context whose `current_step` is set, and its
//! result is bound into the symbol table under the step's output key so
//! later steps can consume it. The final step's result is the plan's answer.

use crate::strategy::router::Router;
use crate::strategy::registry::RegistryError;
use crate::strategy::{StrategyDeps, StrategyError};
use crate::use_cases::shared::cancellation_requested;
use thiserror::Error;
use tactician_domain::{Plan, RunContext, Symbol};
use tracing::{debug, info, warn};

/// Errors raised while executing a plan
#[derive(Error, Debug)]
pub enum ExecutePlanError {
    #[error("Could not route step '{step_id}': {source}")]
    Routing {
        step_id: String,
        #[source]
        source: RegistryError,
    },

    #[error("Step '{step_id}' failed: {source}")]
    StepFailed {
        step_id: String,
        #[source]
        source: Box<StrategyError>,
    },

    #[error("Plan produced no result")]
    NoResult,

    #[error("Operation cancelled")]
    Cancelled,
}

/// Runs a validated plan to completion, one step at a time.
pub struct ExecutePlanUseCase {
    deps: StrategyDeps,
    router: Router,
}

impl ExecutePlanUseCase {
    pub fn new(deps: StrategyDeps) -> Self {
        let router = Router::new(deps.registry.clone(), deps.classifier.clone());
        Self { deps, router }
    }

    /// Execute every step of `plan` in order, mutating `ctx` as results are
    /// bound. Returns the final step's result.
    pub async fn execute(
        &self,
        plan: &mut Plan,
        ctx: &mut RunContext,
    ) -> Result<String, ExecutePlanError> {
        let ordered: Vec<String> = plan.ordered_ids().iter().map(|s| s.to_string()).collect();

        for step_id in &ordered {
            if cancellation_requested(&self.deps.cancellation_token) {
                return Err(ExecutePlanError::Cancelled);
            }

            // ids come from the plan's own order, so the lookup cannot miss
            let Some(step) = plan.step(step_id).cloned() else {
                continue;
            };

            let strategy_name =
                self.router
                    .route_step(&step)
                    .map_err(|e| ExecutePlanError::Routing {
                        step_id: step_id.clone(),
                        source: e,
                    })?;
            let strategy = self
                .deps
                .registry
                .instantiate(&strategy_name, &self.deps)
                .map_err(|e| ExecutePlanError::Routing {
                    step_id: step_id.clone(),
                    source: e,
                })?;

            info!(
                run_id = %ctx.run_id,
                step_id = %step_id,
                strategy = %strategy_name,
                "executing plan step"
            );
            ctx.current_step = Some(step.clone());
            let result = strategy.execute(ctx).await;
            ctx.current_step = None;

            let result = result.map_err(|e| ExecutePlanError::StepFailed {
                step_id: step_id.clone(),
                source: Box::new(e),
            })?;

            if !step.output_key.is_empty() {
                let symbol = Symbol::new(
                    serde_json::Value::String(result.clone()),
                    &step.output_type,
                    &step.output_description,
                );
                if ctx.symbols.bind(&step.output_key, symbol).is_some() {
                    warn!(
                        "step '{}' overwrote existing symbol '{}'",
                        step_id, step.output_key
                    );
                }
            }

            plan.record_answer(step_id, result);
            debug!(step_id = %step_id, "step complete");
        }

        plan.final_step()
            .answer
            .clone()
            .ok_or(ExecutePlanError::NoResult)
    }
}
