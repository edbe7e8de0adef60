//! Strategy registry - process-wide mapping from strategy name to factory.
//!
//! Populated once at startup via explicit registration calls, then treated
//! as read-only. Lookup is deliberately forgiving: planners and classifiers
//! produce strategy names as free text, so resolution falls back from an
//! exact match to case-insensitive and nearest-name matching before giving
//! up and using the default strategy.

use super::{StrategyDeps, StrategyFactory};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Minimum similarity (0.0..=1.0) a nearest-name candidate must reach;
/// below this the requested name is considered unresolvable and the
/// default strategy is used instead.
const MIN_NAME_SIMILARITY: f64 = 0.5;

/// Errors raised by registry lookups
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("No strategies registered")]
    Empty,

    #[error("Default strategy '{0}' is not registered")]
    MissingDefault(String),
}

/// Write-once-at-startup, read-many registry of strategy factories.
pub struct StrategyRegistry {
    entries: Vec<(String, StrategyFactory)>,
    default: String,
}

impl StrategyRegistry {
    /// Create an empty registry whose unresolvable lookups fall back to
    /// `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            default: default.into(),
        }
    }

    /// Register `factory` under `name`.
    ///
    /// Re-registering an identical name replaces the previous entry
    /// (last writer wins). That is a design smell in the calling code, not
    /// a fatal condition, so it is logged and tolerated.
    pub fn register(&mut self, name: impl Into<String>, factory: StrategyFactory) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            warn!("strategy '{}' registered twice; last writer wins", name);
            entry.1 = factory;
        } else {
            self.entries.push((name, factory));
        }
    }

    /// Name of the default strategy.
    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// Registered strategy names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `requested` to a registered strategy name.
    ///
    /// Tries, in order: exact case-sensitive match, case-insensitive match,
    /// nearest-name match over all registered names. If the best candidate
    /// falls below the similarity threshold (or the requested name is
    /// blank), falls back to the default strategy.
    pub fn resolve(&self, requested: &str) -> Result<&str, RegistryError> {
        if self.entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let requested = requested.trim();
        if requested.is_empty() {
            return self.resolve_default();
        }

        if let Some((name, _)) = self.entries.iter().find(|(n, _)| n == requested) {
            return Ok(name);
        }

        let lowered = requested.to_lowercase();
        if let Some((name, _)) = self
            .entries
            .iter()
            .find(|(n, _)| n.to_lowercase() == lowered)
        {
            debug!("resolved '{}' case-insensitively to '{}'", requested, name);
            return Ok(name);
        }

        let mut best: Option<(&str, f64)> = None;
        for (name, _) in &self.entries {
            let score = name_similarity(&lowered, &name.to_lowercase());
            if best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((name, score));
            }
        }

        match best {
            Some((name, score)) if score >= MIN_NAME_SIMILARITY => {
                debug!(
                    "resolved '{}' to nearest registered name '{}' (similarity {:.2})",
                    requested, name, score
                );
                Ok(name)
            }
            _ => {
                warn!(
                    "could not confidently resolve strategy '{}'; falling back to default '{}'",
                    requested, self.default
                );
                self.resolve_default()
            }
        }
    }

    fn resolve_default(&self) -> Result<&str, RegistryError> {
        self.entries
            .iter()
            .map(|(n, _)| n.as_str())
            .find(|n| *n == self.default)
            .ok_or_else(|| RegistryError::MissingDefault(self.default.clone()))
    }

    /// Instantiate the strategy registered under the (already resolved)
    /// `name`, falling back to the default when absent.
    pub fn instantiate(
        &self,
        name: &str,
        deps: &StrategyDeps,
    ) -> Result<Arc<dyn super::Strategy>, RegistryError> {
        let resolved = self.resolve(name)?;
        let factory = self
            .entries
            .iter()
            .find(|(n, _)| n == resolved)
            .map(|(_, f)| f)
            .ok_or(RegistryError::Empty)?;
        Ok(factory(deps))
    }
}

/// Normalized similarity between two names: `1 - levenshtein / max_len`.
fn name_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Classic two-row Levenshtein edit distance over chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
