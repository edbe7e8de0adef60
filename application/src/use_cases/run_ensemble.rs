//! Ensemble voting - invoke strategies per the configuration and tally.
//!
//! Entries are invoked sequentially in configured order, each invocation on
//! an independent fork of the request context. Raw results are normalized
//! per the entry's post-processing rule and cast into the weighted tally; a
//! failed invocation is logged and tallied under the unresolved key so the
//! vote arithmetic stays honest. With short-circuiting on, sampling stops
//! as soon as a key has mathematically secured the configured threshold.

use crate::strategy::{StrategyDeps, StrategyError};
use crate::strategy::registry::RegistryError;
use crate::use_cases::shared::cancellation_requested;
use thiserror::Error;
use tactician_domain::{EnsembleConfig, RunContext, VoteKey, VoteOutcome, VoteTally, normalize};
use tracing::{debug, info, warn};

/// Errors raised by the ensemble aggregator
#[derive(Error, Debug)]
pub enum EnsembleError {
    #[error(transparent)]
    InvalidConfig(#[from] tactician_domain::DomainError),

    #[error("Could not resolve ensemble strategy '{name}': {source}")]
    Resolution {
        name: String,
        #[source]
        source: RegistryError,
    },

    #[error("No votes were cast")]
    NoVotes,

    #[error("Operation cancelled")]
    Cancelled,
}

/// Runs an ensemble vote over one request.
pub struct RunEnsembleUseCase {
    deps: StrategyDeps,
}

impl RunEnsembleUseCase {
    pub fn new(deps: StrategyDeps) -> Self {
        Self { deps }
    }

    /// Invoke the configured strategies against forks of `ctx`, tally their
    /// normalized votes, and return the outcome.
    pub async fn execute(
        &self,
        config: &EnsembleConfig,
        ctx: &RunContext,
    ) -> Result<VoteOutcome, EnsembleError> {
        config.validate()?;

        let threshold = config.majority_threshold();
        let mut tally = VoteTally::new(threshold);
        info!(
            run_id = %ctx.run_id,
            total_weight = config.total_weight(),
            threshold,
            "starting ensemble vote"
        );

        'entries: for entry in &config.entries {
            // Resolve once per entry; every invocation uses the same strategy
            let strategy = self
                .deps
                .registry
                .instantiate(&entry.strategy, &self.deps)
                .map_err(|e| EnsembleError::Resolution {
                    name: entry.strategy.clone(),
                    source: e,
                })?;

            for invocation in 0..entry.count {
                if cancellation_requested(&self.deps.cancellation_token) {
                    return Err(EnsembleError::Cancelled);
                }

                let mut fork = ctx.fork();
                let key = match strategy.execute(&mut fork).await {
                    Ok(raw) => normalize(&raw, entry.post_processing),
                    Err(StrategyError::Cancelled) => return Err(EnsembleError::Cancelled),
                    Err(e) => {
                        // A failed voter still spends its weight
                        warn!(
                            strategy = %entry.strategy,
                            invocation,
                            "ensemble invocation failed: {}; counting as unresolved",
                            e
                        );
                        VoteKey::Unresolved
                    }
                };

                let accumulated = tally.cast(key.clone(), entry.weight as u64);
                debug!(
                    strategy = %entry.strategy,
                    vote = %key,
                    accumulated,
                    "vote cast"
                );

                if config.short_circuit {
                    if let Some(winner) = tally.secured() {
                        info!(
                            winner = %winner,
                            votes_cast = tally.votes_cast(),
                            "vote secured; short-circuiting remaining invocations"
                        );
                        break 'entries;
                    }
                }
            }
        }

        let outcome = tally.into_outcome().ok_or(EnsembleError::NoVotes)?;
        if !outcome.majority_reached {
            warn!(
                winner = %outcome.winner,
                winner_weight = outcome.winner_weight,
                threshold,
                "no key reached the vote threshold; using highest accumulated weight"
            );
        }
        Ok(outcome)
    }
}
