//! Step descriptors - the nodes of a plan graph.
//!
//! [`StepRecord`] is the wire shape the external planner emits and the plan
//! cache persists (field names are part of the cache format and must not
//! change). [`StepDescriptor`] is the executable form: read-only during
//! execution except for attaching the step's `answer` once it completes.

use serde::{Deserialize, Serialize};

/// Reference to a value a step consumes from an earlier step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentRef {
    /// Output key of the producing step.
    pub dependent_key: String,
    /// Declared type of the consumed value.
    pub dependent_type: String,
}

impl DependentRef {
    pub fn new(key: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            dependent_key: key.into(),
            dependent_type: declared_type.into(),
        }
    }
}

/// Serialized step shape used by the planner interface and the plan cache.
///
/// Field names are the persisted cache format; see the plan cache store
/// contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub task_id: String,
    #[serde(default)]
    pub dependent_task_ids: Vec<String>,
    pub instruction: String,
    /// Strategy hint for routing this step (e.g., "direct", "program").
    #[serde(default)]
    pub task_type: String,
    pub output_key: String,
    #[serde(default)]
    pub output_type: String,
    #[serde(default)]
    pub output_description: String,
    #[serde(default)]
    pub dependent: Vec<DependentRef>,
    /// Optional extra guidance for the step, appended to the instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// A single executable step within a validated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    /// Unique identifier of this step within the plan.
    pub id: String,
    /// Steps that must complete before this one.
    pub dependent_ids: Vec<String>,
    /// What this step should do.
    pub instruction: String,
    /// Strategy hint; constrains routing but never bypasses resolution.
    pub strategy_hint: String,
    /// Key under which this step's result is bound in the symbol table.
    pub output_key: String,
    /// Declared type of the result.
    pub output_type: String,
    /// Description of the result.
    pub output_description: String,
    /// Upstream values this step consumes, by output key.
    pub dependent_refs: Vec<DependentRef>,
    /// Optional extra guidance from the planner.
    pub hint: Option<String>,
    /// Result attached after the step has executed.
    pub answer: Option<String>,
}

impl StepDescriptor {
    pub fn new(id: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dependent_ids: Vec::new(),
            instruction: instruction.into(),
            strategy_hint: String::new(),
            output_key: String::new(),
            output_type: String::new(),
            output_description: String::new(),
            dependent_refs: Vec::new(),
            hint: None,
            answer: None,
        }
    }

    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.dependent_ids.push(id.into());
        self
    }

    pub fn with_hint(mut self, strategy_hint: impl Into<String>) -> Self {
        self.strategy_hint = strategy_hint.into();
        self
    }

    pub fn with_output(
        mut self,
        key: impl Into<String>,
        declared_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.output_key = key.into();
        self.output_type = declared_type.into();
        self.output_description = description.into();
        self
    }

    pub fn with_dependent_ref(mut self, dependent: DependentRef) -> Self {
        self.dependent_refs.push(dependent);
        self
    }

    /// Full instruction text, including the planner's extra hint if present.
    pub fn full_instruction(&self) -> String {
        match &self.hint {
            Some(hint) if !hint.is_empty() => format!("{}\n\nHint: {}", self.instruction, hint),
            _ => self.instruction.clone(),
        }
    }
}

impl From<StepRecord> for StepDescriptor {
    fn from(record: StepRecord) -> Self {
        Self {
            id: record.task_id,
            dependent_ids: record.dependent_task_ids,
            instruction: record.instruction,
            strategy_hint: record.task_type,
            output_key: record.output_key,
            output_type: record.output_type,
            output_description: record.output_description,
            dependent_refs: record.dependent,
            hint: record.hint,
            answer: None,
        }
    }
}

impl From<&StepDescriptor> for StepRecord {
    fn from(step: &StepDescriptor) -> Self {
        Self {
            task_id: step.id.clone(),
            dependent_task_ids: step.dependent_ids.clone(),
            instruction: step.instruction.clone(),
            task_type: step.strategy_hint.clone(),
            output_key: step.output_key.clone(),
            output_type: step.output_type.clone(),
            output_description: step.output_description.clone(),
            dependent: step.dependent_refs.clone(),
            hint: step.hint.clone(),
        }
    }
}
