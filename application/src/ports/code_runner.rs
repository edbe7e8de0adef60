//! Code runner port
//!
//! Sandboxed execution backend used by the code-executing strategy. The
//! sandbox itself (process isolation, interpreter choice, resource limits)
//! is an opaque service behind this interface.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while running generated code
#[derive(Error, Debug)]
pub enum CodeRunError {
    #[error("Program failed: {0}")]
    ProgramFailed(String),

    #[error("Sandbox error: {0}")]
    Sandbox(String),

    #[error("Timeout")]
    Timeout,
}

/// Sandboxed code execution backend
#[async_trait]
pub trait CodeRunnerPort: Send + Sync {
    /// Run `source` and return its standard output.
    async fn run(&self, source: &str) -> Result<String, CodeRunError>;
}
