//! Step-list parsing from planner responses.
//!
//! The external planner answers in free text; the step list it proposes is
//! embedded as JSON — either inside a ` ```plan` / ` ```json` fenced block or
//! as the entire response. This module extracts it into [`StepRecord`]s.
//! Pure domain logic: no I/O, no prompt knowledge.

use super::descriptor::{DependentRef, StepRecord};

/// Parse a step list from planner response text.
///
/// Supports three formats, tried in order:
/// 1. ` ```plan` fenced code blocks containing JSON
/// 2. ` ```json` fenced code blocks containing JSON
/// 3. Raw JSON (the entire response is a valid JSON array or object)
///
/// Returns `None` if no valid, non-empty step list is found.
pub fn parse_step_list(response: &str) -> Option<Vec<StepRecord>> {
    for fence in ["```plan", "```json"] {
        let mut in_block = false;
        let mut current_block = String::new();

        for line in response.lines() {
            if line.trim() == fence {
                in_block = true;
                current_block.clear();
            } else if in_block && line.trim() == "```" {
                in_block = false;
                if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&current_block)
                    && let Some(records) = parse_step_list_json(&parsed)
                {
                    return Some(records);
                }
            } else if in_block {
                current_block.push_str(line);
                current_block.push('\n');
            }
        }
    }

    // Try parsing the entire response as JSON
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(response) {
        return parse_step_list_json(&parsed);
    }

    None
}

/// Parse a step list from a JSON value.
///
/// Accepts either a bare array of step objects or an object with a `"steps"`
/// (or legacy `"tasks"`) array. Step ids may be strings or numbers; a step
/// without an id gets its 1-based position. Returns `None` if the array is
/// missing or empty.
pub fn parse_step_list_json(json: &serde_json::Value) -> Option<Vec<StepRecord>> {
    let steps = match json {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(_) => json
            .get("steps")
            .or_else(|| json.get("tasks"))
            .and_then(|v| v.as_array())?,
        _ => return None,
    };

    if steps.is_empty() {
        return None;
    }

    let mut records = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let task_id = step
            .get("task_id")
            .and_then(json_value_to_string)
            .unwrap_or_else(|| format!("{}", index + 1));
        let instruction = step
            .get("instruction")
            .and_then(|v| v.as_str())
            .unwrap_or("No instruction")
            .to_string();

        let dependent_task_ids = step
            .get("dependent_task_ids")
            .and_then(|v| v.as_array())
            .map(|deps| deps.iter().filter_map(json_value_to_string).collect())
            .unwrap_or_default();

        let dependent = step
            .get("dependent")
            .and_then(|v| v.as_array())
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| {
                        let key = r.get("dependent_key").and_then(json_value_to_string)?;
                        let declared_type = r
                            .get("dependent_type")
                            .and_then(json_value_to_string)
                            .unwrap_or_default();
                        Some(DependentRef::new(key, declared_type))
                    })
                    .collect()
            })
            .unwrap_or_default();

        records.push(StepRecord {
            task_id,
            dependent_task_ids,
            instruction,
            task_type: string_field(step, "task_type"),
            output_key: string_field(step, "output_key"),
            output_type: string_field(step, "output_type"),
            output_description: string_field(step, "output_description"),
            dependent,
            hint: step.get("hint").and_then(json_value_to_string),
        });
    }

    Some(records)
}

fn string_field(step: &serde_json::Value, field: &str) -> String {
    step.get(field)
        .and_then(json_value_to_string)
        .unwrap_or_default()
}

/// Convert a JSON value to a string (numbers stringified; null and empty
/// strings become None).
fn json_value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
