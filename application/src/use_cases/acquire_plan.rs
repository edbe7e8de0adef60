//! Plan acquisition - cache fast-path plus a bounded generate/validate loop.
//!
//! A compound strategy needs a validated plan before it can execute
//! anything. This use case first consults the plan cache (when the caller
//! supplied a key), and otherwise iterates with the external planner:
//! draft, validate, and on failure feed the aggregated validation errors
//! back as feedback for the next draft. The loop is hard-capped so a
//! planner that never converges cannot stall a request forever.

use crate::ports::plan_cache::PlanCacheStore;
use crate::ports::planner::PlannerPort;
use crate::use_cases::shared::cancellation_requested;
use std::sync::Arc;
use thiserror::Error;
use tactician_domain::{Plan, Query};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Maximum generate/validate rounds before acquisition gives up.
pub const MAX_PLAN_ROUNDS: usize = 5;

/// Errors raised while acquiring a plan
#[derive(Error, Debug)]
pub enum PlanAcquisitionError {
    #[error("No valid plan after {rounds} round(s); last error: {last_error}")]
    Exhausted { rounds: usize, last_error: String },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Produces a validated [`Plan`] for a query, from cache or the planner.
pub struct AcquirePlanUseCase {
    planner: Arc<dyn PlannerPort>,
    cache: Arc<dyn PlanCacheStore>,
}

impl AcquirePlanUseCase {
    pub fn new(planner: Arc<dyn PlannerPort>, cache: Arc<dyn PlanCacheStore>) -> Self {
        Self { planner, cache }
    }

    /// Acquire a plan for `query`.
    ///
    /// On a cache hit the planner is never consulted; the cached records
    /// still go through full validation, and a cached plan that no longer
    /// validates falls through to generation without consuming a round.
    pub async fn execute(
        &self,
        query: &Query,
        cache_key: Option<&str>,
        cancellation: &Option<CancellationToken>,
    ) -> Result<Plan, PlanAcquisitionError> {
        if let Some(key) = cache_key {
            if let Some(plan) = self.try_cache(key).await {
                return Ok(plan);
            }
        }

        let mut feedback: Option<String> = None;
        let mut last_error = String::from("planner was never consulted");

        for round in 1..=MAX_PLAN_ROUNDS {
            if cancellation_requested(cancellation) {
                return Err(PlanAcquisitionError::Cancelled);
            }

            debug!(round, "drafting plan");
            let records = match self.planner.draft_plan(query, feedback.as_deref()).await {
                Ok(records) => records,
                Err(e) => {
                    warn!(round, "planner draft failed: {}", e);
                    last_error = e.to_string();
                    feedback = Some(last_error.clone());
                    continue;
                }
            };

            match Plan::from_records(records) {
                Ok(plan) => {
                    info!(round, steps = plan.len(), "plan validated");
                    if let Some(key) = cache_key {
                        // Persisting is best effort; a cache fault must not
                        // fail a run that already has a valid plan.
                        if let Err(e) = self.cache.save(key, &plan.to_records()).await {
                            warn!("failed to cache plan under '{}': {}", key, e);
                        }
                    }
                    return Ok(plan);
                }
                Err(e) => {
                    debug!(round, "plan rejected: {}", e);
                    last_error = e.to_string();
                    feedback = Some(last_error.clone());
                }
            }
        }

        Err(PlanAcquisitionError::Exhausted {
            rounds: MAX_PLAN_ROUNDS,
            last_error,
        })
    }

    /// Load and validate a cached plan; any failure is a quiet miss.
    async fn try_cache(&self, key: &str) -> Option<Plan> {
        let records = match self.cache.load(key).await {
            Ok(records) => records,
            Err(e) if e.is_miss() => {
                debug!("plan cache miss for '{}'", key);
                return None;
            }
            Err(e) => {
                warn!("plan cache load failed for '{}': {}", key, e);
                return None;
            }
        };

        match Plan::from_records(records) {
            Ok(plan) => {
                info!(steps = plan.len(), "reusing cached plan '{}'", key);
                Some(plan)
            }
            Err(e) => {
                warn!("cached plan '{}' no longer validates ({}); regenerating", key, e);
                None
            }
        }
    }
}
