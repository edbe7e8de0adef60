//! Plan model: step descriptors, graph validation, and planner-text parsing.

pub mod descriptor;
pub mod graph;
pub mod parser;

pub use descriptor::{DependentRef, StepDescriptor, StepRecord};
pub use graph::{Plan, PlanValidationError, StepValidationIssue};
pub use parser::{parse_step_list, parse_step_list_json};
