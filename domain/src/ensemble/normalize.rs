//! Vote normalization.
//!
//! Raw strategy results are free text; before tallying they are reduced to
//! comparable [`VoteKey`]s according to the entry's [`PostProcessing`]. A
//! result that cannot be normalized (e.g., ambiguous multi-number
//! extraction) becomes the distinct [`VoteKey::Unresolved`] key rather than
//! being dropped, so it still participates in weighting and cannot silently
//! vanish from the tally.

use super::config::PostProcessing;
use serde::{Deserialize, Serialize};

/// A comparable vote identity derived from a raw strategy result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteKey {
    /// Normalized result value.
    Value(String),
    /// The result could not be normalized to a single comparable value.
    Unresolved,
}

impl VoteKey {
    pub fn value(content: impl Into<String>) -> Self {
        Self::Value(content.into())
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, VoteKey::Unresolved)
    }

    /// The winning answer text this key stands for.
    pub fn as_answer(&self) -> &str {
        match self {
            VoteKey::Value(v) => v,
            VoteKey::Unresolved => "<unresolved>",
        }
    }
}

impl std::fmt::Display for VoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_answer())
    }
}

/// Normalize a raw result into a vote key.
pub fn normalize(raw: &str, post_processing: PostProcessing) -> VoteKey {
    match post_processing {
        PostProcessing::None => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                VoteKey::Unresolved
            } else {
                VoteKey::value(trimmed)
            }
        }
        PostProcessing::NumericExtraction => extract_number(raw),
    }
}

/// Extract exactly one number from the text.
///
/// Scans for numeric tokens (optional sign, decimal point, thousands commas
/// stripped). If all found tokens agree on one value, that value wins; zero
/// tokens or disagreeing tokens yield [`VoteKey::Unresolved`].
fn extract_number(raw: &str) -> VoteKey {
    let mut found: Option<f64> = None;

    for token in raw.split(|c: char| c.is_whitespace() || "()[]{}:;=".contains(c)) {
        let cleaned: String = token
            .trim_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'))
            .replace(',', "");
        if cleaned.is_empty() || cleaned == "-" || cleaned == "." {
            continue;
        }
        let Ok(value) = cleaned.parse::<f64>() else {
            continue;
        };
        match found {
            None => found = Some(value),
            // Disagreeing numbers make the extraction ambiguous
            Some(existing) if existing != value => return VoteKey::Unresolved,
            Some(_) => {}
        }
    }

    match found {
        Some(value) => VoteKey::value(format_number(value)),
        None => VoteKey::Unresolved,
    }
}

/// Canonical text form so "42", "42.0" and "42.00" tally together.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
