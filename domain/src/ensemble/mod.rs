//! Ensemble voting: configuration, vote normalization, and the weighted
//! tally with its threshold arithmetic.

pub mod config;
pub mod normalize;
pub mod tally;

pub use config::{EnsembleConfig, EnsembleEntry, PostProcessing, VotingKind};
pub use normalize::{VoteKey, normalize};
pub use tally::{VoteOutcome, VoteTally};
