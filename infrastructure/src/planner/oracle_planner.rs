//! Planner adapter that drives the reasoning oracle.
//!
//! Prompts the oracle for a JSON step list and parses it with the domain
//! step-list parser. Validation feedback from the previous round, when
//! present, is appended to the prompt so the oracle can correct its draft.

use async_trait::async_trait;
use std::sync::Arc;
use tactician_application::ports::oracle::ReasoningOracle;
use tactician_application::ports::planner::{PlannerError, PlannerPort};
use tactician_domain::{Query, StepRecord, parse_step_list};
use tracing::debug;

const PLAN_PROMPT: &str = "Break the problem below into a list of steps with \
data dependencies. Reply with a ```plan fenced JSON array; each step object \
has: task_id, dependent_task_ids, instruction, task_type, output_key, \
output_type, output_description, dependent (list of {dependent_key, \
dependent_type}), and an optional hint. The final step must produce the \
overall answer.";

/// [`PlannerPort`] implementation over a [`ReasoningOracle`].
pub struct OraclePlanner {
    oracle: Arc<dyn ReasoningOracle>,
}

impl OraclePlanner {
    pub fn new(oracle: Arc<dyn ReasoningOracle>) -> Self {
        Self { oracle }
    }

    fn prompt(query: &Query, feedback: Option<&str>) -> String {
        let mut prompt = format!("{}\n\nProblem:\n{}", PLAN_PROMPT, query.content());
        if let Some(feedback) = feedback {
            prompt.push_str(
                "\n\nYour previous step list was rejected with these errors; \
                 fix all of them:\n",
            );
            prompt.push_str(feedback);
        }
        prompt
    }
}

#[async_trait]
impl PlannerPort for OraclePlanner {
    async fn draft_plan(
        &self,
        query: &Query,
        feedback: Option<&str>,
    ) -> Result<Vec<StepRecord>, PlannerError> {
        let prompt = Self::prompt(query, feedback);
        debug!(with_feedback = feedback.is_some(), "requesting plan draft");

        let response = self.oracle.invoke(&prompt).await?;
        parse_step_list(&response).ok_or_else(|| {
            PlannerError::Unparseable(format!(
                "no step list found in {} chars of response",
                response.len()
            ))
        })
    }
}
