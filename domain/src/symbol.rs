//! Symbol table - typed, described values produced by completed plan steps.
//!
//! Each step that completes writes one [`Symbol`] under its declared output
//! key. Later steps look those values up to assemble their own inputs. The
//! table is scoped to a single run and has a single writer (the task
//! executor), so it needs no interior locking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named value produced by one step and consumable by later steps.
///
/// Immutable once created. The declared type and description travel with the
/// value so downstream steps (and the prompts built from them) know what
/// they are consuming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// The produced value.
    pub value: serde_json::Value,
    /// Declared type of the value (e.g., "int", "str", "list[float]").
    pub declared_type: String,
    /// Human-readable description of what the value represents.
    pub description: String,
}

impl Symbol {
    pub fn new(
        value: impl Into<serde_json::Value>,
        declared_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            declared_type: declared_type.into(),
            description: description.into(),
        }
    }

    /// Render the value as plain text (strings unquoted, everything else JSON).
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Mapping from output key to the [`Symbol`] produced under it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol under `key`, returning the previously bound symbol if
    /// one existed.
    ///
    /// A well-formed plan writes each key at most once per run; overwriting
    /// is legal (last writer wins) and the displaced symbol is handed back
    /// so the caller can surface the smell.
    pub fn bind(&mut self, key: impl Into<String>, symbol: Symbol) -> Option<Symbol> {
        self.entries.insert(key.into(), symbol)
    }

    /// Look up the symbol bound under `key`.
    pub fn get(&self, key: &str) -> Option<&Symbol> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all bound keys and symbols (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.entries.iter()
    }
}
