//! Weighted vote tally.
//!
//! Accumulates normalized votes and decides the winner. The tally is pure
//! bookkeeping — strategy invocation, ordering, and short-circuit policy
//! live in the application layer; this type only answers "who is winning
//! and have they already won".

use super::normalize::VoteKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of an ensemble vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// The winning vote key.
    pub winner: VoteKey,
    /// Weight the winner accumulated.
    pub winner_weight: u64,
    /// Whether the winner reached the configured threshold.
    ///
    /// `false` means the aggregator fell back to the highest accumulated
    /// weight — a best-effort decision, surfaced as a warning upstream, not
    /// an error.
    pub majority_reached: bool,
    /// Number of individual votes tallied before the decision.
    pub votes_cast: usize,
    /// Final accumulated weight per key (unordered).
    pub weights: Vec<(VoteKey, u64)>,
}

/// Running weighted tally over normalized vote keys.
///
/// Tie-break rule: the leader only changes when a key's accumulated weight
/// *strictly exceeds* the current leader's, so with equal final weights the
/// first key to reach the maximum in cast order wins.
#[derive(Debug, Clone)]
pub struct VoteTally {
    threshold: u64,
    weights: HashMap<VoteKey, u64>,
    leader: Option<(VoteKey, u64)>,
    votes_cast: usize,
}

impl VoteTally {
    /// Create a tally that declares an outright winner at `threshold`.
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            weights: HashMap::new(),
            leader: None,
            votes_cast: 0,
        }
    }

    /// Record one vote of `weight` for `key`.
    ///
    /// Returns the key's new accumulated weight.
    pub fn cast(&mut self, key: VoteKey, weight: u64) -> u64 {
        self.votes_cast += 1;
        let accumulated = self.weights.entry(key.clone()).or_insert(0);
        *accumulated += weight;
        let accumulated = *accumulated;

        let leads = match &self.leader {
            Some((_, leader_weight)) => accumulated > *leader_weight,
            None => true,
        };
        if leads {
            self.leader = Some((key, accumulated));
        }

        accumulated
    }

    /// The key that has secured the threshold, if any.
    pub fn secured(&self) -> Option<&VoteKey> {
        match &self.leader {
            Some((key, weight)) if *weight >= self.threshold => Some(key),
            _ => None,
        }
    }

    /// Current leader and its weight.
    pub fn leader(&self) -> Option<(&VoteKey, u64)> {
        self.leader.as_ref().map(|(k, w)| (k, *w))
    }

    pub fn votes_cast(&self) -> usize {
        self.votes_cast
    }

    /// Close the tally and produce the outcome.
    ///
    /// Returns `None` only if no vote was ever cast.
    pub fn into_outcome(self) -> Option<VoteOutcome> {
        let (winner, winner_weight) = self.leader?;
        Some(VoteOutcome {
            majority_reached: winner_weight >= self.threshold,
            winner,
            winner_weight,
            votes_cast: self.votes_cast,
            weights: self.weights.into_iter().collect(),
        })
    }
}
