//! Program strategy - the oracle writes code, the sandbox runs it.
//!
//! Suited to arithmetic and algorithmic problems where computing the answer
//! is more reliable than recalling it. The oracle is prompted to emit a
//! standalone program whose standard output is the answer; the program is
//! extracted from the response's fenced code block and handed to the code
//! runner port.

use super::{Strategy, StrategyDeps, StrategyError, problem_text};
use crate::ports::code_runner::CodeRunnerPort;
use crate::ports::oracle::ReasoningOracle;
use async_trait::async_trait;
use std::sync::Arc;
use tactician_domain::RunContext;
use tracing::debug;

pub struct ProgramStrategy {
    oracle: Arc<dyn ReasoningOracle>,
    code_runner: Arc<dyn CodeRunnerPort>,
}

impl ProgramStrategy {
    pub fn new(oracle: Arc<dyn ReasoningOracle>, code_runner: Arc<dyn CodeRunnerPort>) -> Self {
        Self {
            oracle,
            code_runner,
        }
    }

    pub fn factory() -> super::StrategyFactory {
        Arc::new(|deps: &StrategyDeps| {
            Arc::new(ProgramStrategy::new(
                deps.oracle.clone(),
                deps.code_runner.clone(),
            ))
        })
    }

    fn prompt(problem: &str) -> String {
        format!(
            "Write a standalone program that solves the problem below and \
             prints only the final answer to standard output. Reply with a \
             single fenced code block.\n\nProblem:\n{}",
            problem
        )
    }
}

#[async_trait]
impl Strategy for ProgramStrategy {
    fn name(&self) -> &'static str {
        "program"
    }

    async fn execute(&self, ctx: &mut RunContext) -> Result<String, StrategyError> {
        let problem = problem_text(ctx);
        debug!(run_id = %ctx.run_id, "program strategy drafting code");

        let response = self.oracle.invoke(&Self::prompt(&problem)).await?;
        let source = extract_code_block(&response).ok_or_else(|| {
            StrategyError::MalformedResponse("no fenced code block in oracle response".to_string())
        })?;

        let stdout = self.code_runner.run(&source).await?;
        let answer = stdout.trim().to_string();
        ctx.finish(answer.clone());
        Ok(answer)
    }
}

/// Extract the body of the first fenced code block, skipping the language
/// tag on the opening fence.
fn extract_code_block(text: &str) -> Option<String> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    let source = body[..close].trim();
    if source.is_empty() {
        None
    } else {
        Some(source.to_string())
    }
}
