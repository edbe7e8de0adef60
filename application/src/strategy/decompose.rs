//! Decompose strategy - plan the problem as a step graph, then execute it.
//!
//! The compound strategy: a plan is acquired (from cache or by iterating
//! with the planner), validated, and executed step by step, each step routed
//! to a leaf strategy through the shared registry. Because steps may
//! themselves route back here, a depth guard caps the nesting, and a nested
//! invocation decomposes its own step's instruction on an isolated context
//! rather than re-planning the outer problem.

use super::{Strategy, StrategyDeps, StrategyError, problem_text};
use crate::use_cases::acquire_plan::AcquirePlanUseCase;
use crate::use_cases::execute_plan::ExecutePlanUseCase;
use async_trait::async_trait;
use std::sync::Arc;
use tactician_domain::{Query, RunContext};
use tracing::{debug, info};

/// Maximum nesting of compound strategies before a run is refused.
pub const MAX_DECOMPOSE_DEPTH: usize = 3;

pub struct DecomposeStrategy {
    deps: StrategyDeps,
}

impl DecomposeStrategy {
    pub fn new(deps: StrategyDeps) -> Self {
        Self { deps }
    }

    pub fn factory() -> super::StrategyFactory {
        Arc::new(|deps: &StrategyDeps| Arc::new(DecomposeStrategy::new(deps.clone())))
    }
}

#[async_trait]
impl Strategy for DecomposeStrategy {
    fn name(&self) -> &'static str {
        "decompose"
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<String, StrategyError> {
        if ctx.depth >= MAX_DECOMPOSE_DEPTH {
            return Err(StrategyError::DepthExceeded {
                depth: ctx.depth,
                limit: MAX_DECOMPOSE_DEPTH,
            });
        }

        let answer = if ctx.current_step.is_some() {
            // Nested invocation: the problem to decompose is this step, not
            // the outer query. Run on a fork so the inner plan's symbols
            // (and any outer plan cache key) stay out of the outer run; the
            // executor binds this step's result into the outer table.
            let mut inner = ctx.fork();
            inner.query = Query::new(problem_text(ctx));
            self.plan_and_execute(&mut inner).await?
        } else {
            self.plan_and_execute(ctx).await?
        };

        debug!(run_id = %ctx.run_id, "plan execution complete");
        ctx.finish(answer.clone());
        Ok(answer)
    }
}

impl DecomposeStrategy {
    async fn plan_and_execute(&self, ctx: &mut RunContext) -> Result<String, StrategyError> {
        let acquire = AcquirePlanUseCase::new(
            self.deps.planner.clone(),
            self.deps.plan_cache.clone(),
        );
        let mut plan = acquire
            .execute(
                &ctx.query,
                ctx.plan_cache_key.as_deref(),
                &self.deps.cancellation_token,
            )
            .await?;
        info!(
            run_id = %ctx.run_id,
            steps = plan.len(),
            "plan acquired; executing"
        );

        ctx.depth += 1;
        let execute = ExecutePlanUseCase::new(self.deps.clone());
        let result = execute.execute(&mut plan, ctx).await;
        ctx.depth -= 1;

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::direct::DirectStrategy;
    use crate::strategy::registry::StrategyRegistry;
    use crate::test_support::{
        MapCache, ScriptedCodeRunner, ScriptedOracle, ScriptedPlanner, StaticClassifier,
        records_1_then_2, test_deps,
    };
    use crate::use_cases::execute_plan::ExecutePlanError;
    use tactician_domain::{DependentRef, ProblemProfile, StepRecord};

    fn record(
        id: &str,
        deps: &[&str],
        instruction: &str,
        hint: &str,
        output_key: &str,
        consumes: &[&str],
    ) -> StepRecord {
        StepRecord {
            task_id: id.into(),
            dependent_task_ids: deps.iter().map(|d| d.to_string()).collect(),
            instruction: instruction.into(),
            task_type: hint.into(),
            output_key: output_key.into(),
            output_type: "str".into(),
            output_description: String::new(),
            dependent: consumes
                .iter()
                .map(|key| DependentRef::new(*key, "str"))
                .collect(),
            hint: None,
        }
    }

    /// Outer plan whose second step is itself routed to the compound
    /// strategy.
    fn nesting_records() -> Vec<StepRecord> {
        vec![
            record("1", &[], "List the prime factors of 12", "direct", "factors", &[]),
            record("2", &["1"], "Sum the factors", "decompose", "total", &["factors"]),
        ]
    }

    fn deps(oracle: Arc<ScriptedOracle>, planner: Arc<ScriptedPlanner>) -> StrategyDeps {
        let mut registry = StrategyRegistry::new("direct");
        registry.register("direct", DirectStrategy::factory());
        registry.register("decompose", DecomposeStrategy::factory());
        StrategyDeps {
            oracle,
            planner,
            plan_cache: Arc::new(MapCache::new()),
            classifier: Arc::new(StaticClassifier::new(ProblemProfile::default())),
            code_runner: Arc::new(ScriptedCodeRunner::new("")),
            registry: Arc::new(registry),
            cancellation_token: None,
        }
    }

    #[tokio::test]
    async fn test_depth_guard_refuses_deep_nesting() {
        let strategy = DecomposeStrategy::new(test_deps());
        let mut ctx = RunContext::new("q");
        ctx.depth = MAX_DECOMPOSE_DEPTH;

        let err = strategy.execute(&mut ctx).await.unwrap_err();
        assert!(matches!(
            err,
            StrategyError::DepthExceeded { depth: 3, limit: 3 }
        ));
    }

    #[tokio::test]
    async fn test_decompose_plans_then_executes_steps_in_order() {
        let oracle = Arc::new(ScriptedOracle::new(vec!["6", "36"]));
        let strategy = DecomposeStrategy::new(deps(
            oracle,
            Arc::new(ScriptedPlanner::always(records_1_then_2())),
        ));
        let mut ctx = RunContext::new("Pick a number and square it");

        let answer = strategy.execute(&mut ctx).await.unwrap();
        assert_eq!(answer, "36");
        assert_eq!(strategy.name(), "decompose");
        assert_eq!(ctx.answer.as_deref(), Some("36"));
        assert_eq!(ctx.depth, 0);
        assert_eq!(
            ctx.symbols.get("y").map(|s| s.value_text()),
            Some("36".into())
        );
    }

    #[tokio::test]
    async fn test_nested_invocation_decomposes_its_own_step() {
        let inner_records = vec![record("1", &[], "Add the listed numbers", "direct", "sum", &[])];
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Ok(nesting_records()),
            Ok(inner_records),
        ]));
        let oracle = Arc::new(ScriptedOracle::new(vec!["2 2 3", "7"]));
        let strategy = DecomposeStrategy::new(deps(oracle, planner.clone()));

        let mut ctx =
            RunContext::new("Factor 12 and add the factors").with_plan_cache_key("outer-plan");
        let answer = strategy.execute(&mut ctx).await.unwrap();
        assert_eq!(answer, "7");
        assert_eq!(ctx.depth, 0);

        // The nested acquisition planned the step's instruction (with its
        // dependent values), not the outer query, and did not reuse the
        // outer plan's cache entry.
        assert_eq!(planner.calls(), 2);
        let queries = planner.queries();
        assert_eq!(queries[0], "Factor 12 and add the factors");
        assert!(queries[1].contains("Sum the factors"));
        assert!(queries[1].contains("2 2 3"));
        assert!(!queries[1].contains("Factor 12"));

        // Inner plan symbols stay scoped to the nested run; the step's
        // result lands under the step's own output key.
        assert_eq!(
            ctx.symbols.get("total").map(|s| s.value_text()),
            Some("7".into())
        );
        assert!(ctx.symbols.contains("factors"));
        assert!(!ctx.symbols.contains("sum"));
    }

    #[tokio::test]
    async fn test_nesting_counts_against_the_depth_cap() {
        let planner = Arc::new(ScriptedPlanner::new(vec![Ok(nesting_records())]));
        let oracle = Arc::new(ScriptedOracle::new(vec!["2 2 3"]));
        let strategy = DecomposeStrategy::new(deps(oracle, planner));

        // One level below the cap: the outer plan runs, but its nested step
        // would exceed it.
        let mut ctx = RunContext::new("Factor 12 and add the factors");
        ctx.depth = MAX_DECOMPOSE_DEPTH - 1;

        let err = strategy.execute(&mut ctx).await.unwrap_err();
        let StrategyError::PlanExecution(plan_err) = err else {
            panic!("expected PlanExecution, got {err:?}");
        };
        let ExecutePlanError::StepFailed { step_id, source } = *plan_err else {
            panic!("expected StepFailed, got {plan_err:?}");
        };
        assert_eq!(step_id, "2");
        assert!(matches!(*source, StrategyError::DepthExceeded { .. }));
        assert_eq!(ctx.depth, MAX_DECOMPOSE_DEPTH - 1);
    }

    #[tokio::test]
    async fn test_plan_acquisition_failure_surfaces() {
        let oracle = Arc::new(ScriptedOracle::new(Vec::<String>::new()));
        // planner never produces a usable draft
        let strategy =
            DecomposeStrategy::new(deps(oracle, Arc::new(ScriptedPlanner::new(vec![]))));
        let mut ctx = RunContext::new("q");

        let err = strategy.execute(&mut ctx).await.unwrap_err();
        assert!(matches!(err, StrategyError::PlanAcquisition(_)));
    }
}
