//! Plan graph builder and validator.
//!
//! Converts a flat list of step descriptors (untrusted, produced by the
//! external planner) into a validated [`Plan`]: a DAG with a frozen
//! topological order. Validation reports *all* dependency problems it finds
//! in one pass rather than stopping at the first, so a caller that
//! re-requests a corrected plan can fix everything in a single retry round.

use super::descriptor::{StepDescriptor, StepRecord};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

/// A single problem found while validating a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepValidationIssue {
    /// A step consumes an output key no preceding step produces.
    #[error("step '{step_id}' depends on key '{dependent_key}' which no earlier step produces")]
    MissingDependency {
        step_id: String,
        dependent_key: String,
    },

    /// A step lists a dependency on a step id that does not exist.
    #[error("step '{step_id}' depends on unknown step id '{dependent_id}'")]
    UnknownDependency {
        step_id: String,
        dependent_id: String,
    },

    /// Two steps share the same id.
    #[error("duplicate step id '{step_id}'")]
    DuplicateStepId { step_id: String },
}

/// Validation failure for a candidate plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanValidationError {
    /// The dependency graph contains a cycle; no topological order exists.
    #[error("plan graph contains a cycle involving steps [{}]", .involved.join(", "))]
    CyclicPlan { involved: Vec<String> },

    /// One or more dependency problems, aggregated across the whole plan.
    #[error("plan failed validation with {} issue(s): {}", .0.len(),
            .0.iter().map(|i| i.to_string()).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<StepValidationIssue>),

    /// The plan contains no steps.
    #[error("plan contains no steps")]
    Empty,
}

/// A validated, frozen plan: steps plus their topological execution order.
///
/// Constructed only through [`Plan::from_records`] / [`Plan::from_steps`];
/// a plan that failed validation never exists as a value of this type.
#[derive(Debug, Clone)]
pub struct Plan {
    steps: Vec<StepDescriptor>,
    /// Indices into `steps`, in execution order. Frozen at validation time.
    order: Vec<usize>,
}

impl Plan {
    /// Build and validate a plan from wire-format records.
    pub fn from_records(records: Vec<StepRecord>) -> Result<Self, PlanValidationError> {
        Self::from_steps(records.into_iter().map(StepDescriptor::from).collect())
    }

    /// Build and validate a plan from step descriptors.
    ///
    /// 1. Reject empty plans and duplicate step ids.
    /// 2. Build the dependency digraph (edge `dependent_id -> id`); edges to
    ///    unknown ids are recorded as issues and skipped.
    /// 3. Compute a topological order (Kahn); a cycle fails immediately with
    ///    [`PlanValidationError::CyclicPlan`].
    /// 4. Walk the order with a running set of produced output keys and
    ///    record every `dependent_refs` entry whose key has not been
    ///    produced yet.
    /// 5. If any issues were recorded, fail with the aggregated list.
    pub fn from_steps(steps: Vec<StepDescriptor>) -> Result<Self, PlanValidationError> {
        if steps.is_empty() {
            return Err(PlanValidationError::Empty);
        }

        let mut issues = Vec::new();

        let mut index_of: HashMap<&str, usize> = HashMap::new();
        for (index, step) in steps.iter().enumerate() {
            if index_of.insert(step.id.as_str(), index).is_some() {
                issues.push(StepValidationIssue::DuplicateStepId {
                    step_id: step.id.clone(),
                });
            }
        }
        if !issues.is_empty() {
            // With duplicate ids the graph is ambiguous; report before sorting.
            return Err(PlanValidationError::Invalid(issues));
        }

        // Adjacency: edge dependent -> step, in input order for determinism.
        let mut dependents_of: Vec<Vec<usize>> = vec![Vec::new(); steps.len()];
        let mut in_degree: Vec<usize> = vec![0; steps.len()];

        for (index, step) in steps.iter().enumerate() {
            for dependent_id in &step.dependent_ids {
                match index_of.get(dependent_id.as_str()) {
                    Some(&from) => {
                        dependents_of[from].push(index);
                        in_degree[index] += 1;
                    }
                    None => issues.push(StepValidationIssue::UnknownDependency {
                        step_id: step.id.clone(),
                        dependent_id: dependent_id.clone(),
                    }),
                }
            }
        }

        // Kahn's algorithm; the initial queue and edge lists follow input
        // order, so the resulting order is deterministic.
        let mut queue: VecDeque<usize> = (0..steps.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(steps.len());

        while let Some(index) = queue.pop_front() {
            order.push(index);
            for &next in &dependents_of[index] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() != steps.len() {
            let involved = steps
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, s)| s.id.clone())
                .collect();
            return Err(PlanValidationError::CyclicPlan { involved });
        }

        // Dependency completeness: every consumed key must be produced by a
        // topologically preceding step. Report all violations at once.
        let mut produced: HashSet<&str> = HashSet::new();
        for &index in &order {
            let step = &steps[index];
            for dependent in &step.dependent_refs {
                if !produced.contains(dependent.dependent_key.as_str()) {
                    issues.push(StepValidationIssue::MissingDependency {
                        step_id: step.id.clone(),
                        dependent_key: dependent.dependent_key.clone(),
                    });
                }
            }
            if !step.output_key.is_empty() {
                produced.insert(step.output_key.as_str());
            }
        }

        if !issues.is_empty() {
            return Err(PlanValidationError::Invalid(issues));
        }

        Ok(Self { steps, order })
    }

    /// Number of steps in the plan.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step ids in frozen execution order.
    pub fn ordered_ids(&self) -> Vec<&str> {
        self.order.iter().map(|&i| self.steps[i].id.as_str()).collect()
    }

    /// Iterate over the steps in frozen execution order.
    pub fn steps_in_order(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.order.iter().map(|&i| &self.steps[i])
    }

    /// Look up a step by id.
    pub fn step(&self, id: &str) -> Option<&StepDescriptor> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Attach the result to a completed step.
    pub fn record_answer(&mut self, id: &str, answer: impl Into<String>) {
        if let Some(step) = self.steps.iter_mut().find(|s| s.id == id) {
            step.answer = Some(answer.into());
        }
    }

    /// The step executed last in the frozen order.
    ///
    /// By convention the engine's overall answer is this step's result;
    /// plans are authored with the intended answer as the final step.
    pub fn final_step(&self) -> &StepDescriptor {
        // order is non-empty by construction
        &self.steps[self.order.last().copied().unwrap_or(0)]
    }

    /// The raw records, e.g. for persisting to the plan cache.
    pub fn to_records(&self) -> Vec<StepRecord> {
        self.steps.iter().map(StepRecord::from).collect()
    }
}
