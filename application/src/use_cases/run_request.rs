//! Run request - the engine's front door.
//!
//! Validates the incoming request, builds the run context, and dispatches:
//! a request carrying an ensemble configuration is answered by the voting
//! aggregator, anything else is routed to a single strategy.

use crate::strategy::registry::RegistryError;
use crate::strategy::router::Router;
use crate::strategy::{StrategyDeps, StrategyError};
use crate::use_cases::run_ensemble::{EnsembleError, RunEnsembleUseCase};
use thiserror::Error;
use tactician_domain::{DomainError, EnsembleConfig, Query, RunContext, RunId};
use tracing::{debug, info};

/// Errors raised while handling a request
#[derive(Error, Debug)]
pub enum RunRequestError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Routing failed: {0}")]
    Routing(#[from] RegistryError),

    #[error("Strategy failed: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Ensemble failed: {0}")]
    Ensemble(#[from] EnsembleError),
}

/// One incoming request to the engine.
#[derive(Debug, Clone)]
pub struct RunRequestInput {
    pub query: Query,
    /// Explicit strategy choice; overrides classification-based routing.
    pub route_override: Option<String>,
    /// When set, the request is answered by an ensemble vote.
    pub ensemble: Option<EnsembleConfig>,
    /// Cache key under which a compound strategy may reuse a stored plan.
    pub plan_cache_key: Option<String>,
    pub long_context: String,
    pub short_context: String,
}

impl RunRequestInput {
    pub fn new(query: impl Into<Query>) -> Self {
        Self {
            query: query.into(),
            route_override: None,
            ensemble: None,
            plan_cache_key: None,
            long_context: String::new(),
            short_context: String::new(),
        }
    }

    pub fn with_route(mut self, strategy: impl Into<String>) -> Self {
        self.route_override = Some(strategy.into());
        self
    }

    pub fn with_ensemble(mut self, config: EnsembleConfig) -> Self {
        self.ensemble = Some(config);
        self
    }

    pub fn with_plan_cache_key(mut self, key: impl Into<String>) -> Self {
        self.plan_cache_key = Some(key.into());
        self
    }

    pub fn with_long_context(mut self, context: impl Into<String>) -> Self {
        self.long_context = context.into();
        self
    }

    pub fn with_short_context(mut self, context: impl Into<String>) -> Self {
        self.short_context = context.into();
        self
    }
}

/// The engine's answer to one request.
#[derive(Debug, Clone)]
pub struct RunRequestOutput {
    pub answer: String,
    /// Strategy that produced the answer ("ensemble" for votes).
    pub strategy: String,
    /// For ensemble requests, whether the winner reached the threshold.
    pub majority_reached: Option<bool>,
    pub run_id: RunId,
}

/// Entry point: answer one query.
pub struct RunRequestUseCase {
    deps: StrategyDeps,
    router: Router,
}

impl RunRequestUseCase {
    pub fn new(deps: StrategyDeps) -> Self {
        let router = Router::new(deps.registry.clone(), deps.classifier.clone());
        Self { deps, router }
    }

    pub async fn execute(
        &self,
        input: RunRequestInput,
    ) -> Result<RunRequestOutput, RunRequestError> {
        if input.query.is_blank() {
            return Err(DomainError::EmptyQuery.into());
        }

        let mut ctx = RunContext::new(input.query.clone())
            .with_long_context(input.long_context.clone())
            .with_short_context(input.short_context.clone());
        if let Some(key) = &input.plan_cache_key {
            ctx = ctx.with_plan_cache_key(key.clone());
        }
        info!(run_id = %ctx.run_id, query_id = %ctx.query_id, "handling request");

        if let Some(config) = &input.ensemble {
            let ctx = ctx.with_ensemble(config.clone());
            let ensemble = RunEnsembleUseCase::new(self.deps.clone());
            let outcome = ensemble.execute(config, &ctx).await?;
            info!(
                run_id = %ctx.run_id,
                winner = %outcome.winner,
                majority_reached = outcome.majority_reached,
                "request answered by ensemble vote"
            );
            return Ok(RunRequestOutput {
                answer: outcome.winner.as_answer().to_string(),
                strategy: "ensemble".to_string(),
                majority_reached: Some(outcome.majority_reached),
                run_id: ctx.run_id,
            });
        }

        let strategy_name = self
            .router
            .route_request(&ctx.query, input.route_override.as_deref())
            .await?;
        let strategy = self.deps.registry.instantiate(&strategy_name, &self.deps)?;
        debug!(run_id = %ctx.run_id, strategy = %strategy_name, "routed request");

        let answer = strategy.execute(&mut ctx).await?;
        info!(run_id = %ctx.run_id, strategy = %strategy_name, "request answered");
        Ok(RunRequestOutput {
            answer,
            strategy: strategy_name,
            majority_reached: None,
            run_id: ctx.run_id,
        })
    }
}
