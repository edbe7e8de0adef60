//! Direct strategy - a single oracle round trip.

use super::{Strategy, StrategyDeps, StrategyError, problem_text};
use crate::ports::oracle::ReasoningOracle;
use async_trait::async_trait;
use std::sync::Arc;
use tactician_domain::RunContext;
use tracing::debug;

/// Answers the problem with one oracle invocation, no tooling.
///
/// This is the default strategy: cheap, always applicable, and the fallback
/// when routing cannot justify anything more elaborate.
pub struct DirectStrategy {
    oracle: Arc<dyn ReasoningOracle>,
}

impl DirectStrategy {
    pub fn new(oracle: Arc<dyn ReasoningOracle>) -> Self {
        Self { oracle }
    }

    pub fn factory() -> super::StrategyFactory {
        Arc::new(|deps: &StrategyDeps| Arc::new(DirectStrategy::new(deps.oracle.clone())))
    }
}

#[async_trait]
impl Strategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<String, StrategyError> {
        let problem = problem_text(ctx);
        debug!(run_id = %ctx.run_id, "direct strategy invoking oracle");
        let answer = self.oracle.invoke(&problem).await?;
        let answer = answer.trim().to_string();
        ctx.finish(answer.clone());
        Ok(answer)
    }
}
