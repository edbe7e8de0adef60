//! Plan cache store port
//!
//! Persists raw step lists between runs so a previously validated plan can
//! be reused without consulting the planner again. The record shape is the
//! wire format defined by [`StepRecord`].

use async_trait::async_trait;
use tactician_domain::StepRecord;
use thiserror::Error;

/// Errors that can occur during plan cache operations
#[derive(Error, Debug)]
pub enum PlanCacheError {
    #[error("No cached plan under key '{0}'")]
    NotFound(String),

    #[error("Cached plan under key '{key}' could not be decoded: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl PlanCacheError {
    /// A miss is expected and handled quietly; everything else is logged.
    pub fn is_miss(&self) -> bool {
        matches!(self, PlanCacheError::NotFound(_))
    }
}

/// Store for cached step lists
#[async_trait]
pub trait PlanCacheStore: Send + Sync {
    /// Load the step list cached under `key`.
    async fn load(&self, key: &str) -> Result<Vec<StepRecord>, PlanCacheError>;

    /// Persist `records` under `key`, replacing any previous entry.
    async fn save(&self, key: &str, records: &[StepRecord]) -> Result<(), PlanCacheError>;
}
