//! Classifier port
//!
//! The external classifier that judges an incoming query's complexity and
//! domain before routing. The router degrades gracefully when it fails.

use async_trait::async_trait;
use tactician_domain::{ProblemProfile, Query};
use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classification failed: {0}")]
    Failed(String),

    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}

/// External problem classifier
#[async_trait]
pub trait ClassifierPort: Send + Sync {
    /// Produce problem metadata for `query`.
    async fn classify(&self, query: &Query) -> Result<ProblemProfile, ClassifierError>;
}
