//! Reasoning oracle port
//!
//! The external language-model service that performs the actual inference.
//! Latency and failure characteristics are opaque; the engine treats any
//! error from this call as a strategy-level failure.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during an oracle invocation
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// The reasoning oracle
///
/// Implementations (provider adapters, transport clients) live outside the
/// engine; strategies and the planner only see this surface.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Send a prompt context and get the oracle's text back.
    async fn invoke(&self, prompt: &str) -> Result<String, OracleError>;
}
