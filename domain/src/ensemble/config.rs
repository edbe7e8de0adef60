//! Ensemble configuration - which strategies vote, how often, and with
//! what weight.

use serde::{Deserialize, Serialize};

/// How raw strategy results are normalized into comparable vote keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostProcessing {
    /// Use the trimmed raw result as-is.
    #[default]
    None,
    /// Extract a single number from the result; ambiguous or absent numbers
    /// become the unresolved key.
    NumericExtraction,
}

/// How the vote threshold is derived from the total weight.
///
/// - `Majority`: more than half of the total weight (default)
/// - `Unanimous`: the entire total weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VotingKind {
    #[default]
    Majority,
    Unanimous,
}

impl VotingKind {
    /// Minimum accumulated weight a single vote key needs to win outright.
    pub fn threshold(&self, total_weight: u64) -> u64 {
        match self {
            VotingKind::Majority => total_weight / 2 + 1,
            VotingKind::Unanimous => total_weight,
        }
    }
}

impl std::str::FromStr for VotingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(VotingKind::Majority),
            "unanimous" => Ok(VotingKind::Unanimous),
            _ => Err(format!("Unknown voting kind: {}. Valid: majority, unanimous", s)),
        }
    }
}

/// One strategy entry in an ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleEntry {
    /// Registered name of the strategy to invoke.
    pub strategy: String,
    /// How many independent invocations this entry contributes.
    pub count: u32,
    /// Weight each invocation's vote carries.
    pub weight: u32,
    /// Normalization applied to each raw result before tallying.
    pub post_processing: PostProcessing,
}

impl EnsembleEntry {
    pub fn new(strategy: impl Into<String>, count: u32, weight: u32) -> Self {
        Self {
            strategy: strategy.into(),
            count,
            weight,
            post_processing: PostProcessing::None,
        }
    }

    pub fn with_post_processing(mut self, post_processing: PostProcessing) -> Self {
        self.post_processing = post_processing;
        self
    }

    /// Total weight this entry can contribute across all its invocations.
    pub fn total_weight(&self) -> u64 {
        self.count as u64 * self.weight as u64
    }
}

/// Immutable input to the ensemble voting aggregator for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Entries, invoked in configured order.
    pub entries: Vec<EnsembleEntry>,
    /// Threshold rule for an outright win.
    pub voting: VotingKind,
    /// Stop sampling once a key has mathematically secured the vote.
    pub short_circuit: bool,
}

impl EnsembleConfig {
    pub fn new(entries: Vec<EnsembleEntry>) -> Self {
        Self {
            entries,
            voting: VotingKind::Majority,
            short_circuit: true,
        }
    }

    pub fn with_voting(mut self, voting: VotingKind) -> Self {
        self.voting = voting;
        self
    }

    pub fn without_short_circuit(mut self) -> Self {
        self.short_circuit = false;
        self
    }

    /// Sum of `count * weight` over all entries.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.total_weight()).sum()
    }

    /// Weight a key must accumulate to win outright.
    ///
    /// For majority voting this is `floor(total / 2) + 1`.
    pub fn majority_threshold(&self) -> u64 {
        self.voting.threshold(self.total_weight())
    }

    /// Reject configurations whose vote arithmetic would be degenerate.
    pub fn validate(&self) -> Result<(), crate::core::error::DomainError> {
        use crate::core::error::DomainError;

        if self.entries.is_empty() {
            return Err(DomainError::InvalidEnsemble("no entries".to_string()));
        }
        for entry in &self.entries {
            if entry.strategy.trim().is_empty() {
                return Err(DomainError::InvalidEnsemble(
                    "entry with blank strategy name".to_string(),
                ));
            }
            if entry.count == 0 || entry.weight == 0 {
                return Err(DomainError::InvalidEnsemble(format!(
                    "entry '{}' has zero count or weight",
                    entry.strategy
                )));
            }
        }
        Ok(())
    }
}
