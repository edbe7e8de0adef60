//! Problem metadata used for routing.
//!
//! The external classifier produces a [`ProblemProfile`] for each incoming
//! query; the router turns it into a strategy name. The profile is a plain
//! value object — classification itself happens outside the engine.

use serde::{Deserialize, Serialize};

/// Coarse complexity of a problem, as judged by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "easy" | "simple" => Ok(Complexity::Low),
            "medium" | "moderate" => Ok(Complexity::Medium),
            "high" | "hard" | "complex" => Ok(Complexity::High),
            _ => Err(format!("Unknown complexity: {}. Valid: low, medium, high", s)),
        }
    }
}

/// Metadata about a problem, supplied by the external classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProblemProfile {
    /// How involved solving the problem is expected to be.
    pub complexity: Complexity,
    /// Free-form difficulty label (classifier-defined scale).
    pub difficulty: String,
    /// Whether the question is narrow or spans multiple topics.
    pub query_range: String,
    /// Top-level domain (e.g., "math", "coding", "commonsense").
    pub domain: String,
    /// Finer-grained subdomain within the domain.
    pub subdomain: String,
    /// Strategy the classifier itself recommends, if any.
    pub recommended: Option<String>,
}

impl ProblemProfile {
    pub fn new(complexity: Complexity, domain: impl Into<String>) -> Self {
        Self {
            complexity,
            domain: domain.into(),
            ..Default::default()
        }
    }

    pub fn with_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = subdomain.into();
        self
    }

    pub fn with_recommendation(mut self, strategy: impl Into<String>) -> Self {
        self.recommended = Some(strategy.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_parse() {
        assert_eq!("high".parse::<Complexity>().ok(), Some(Complexity::High));
        assert_eq!("Hard".parse::<Complexity>().ok(), Some(Complexity::High));
        assert_eq!("simple".parse::<Complexity>().ok(), Some(Complexity::Low));
        assert!("galactic".parse::<Complexity>().is_err());
    }

    #[test]
    fn test_profile_builder() {
        let profile = ProblemProfile::new(Complexity::High, "math")
            .with_subdomain("number theory")
            .with_recommendation("decompose");

        assert_eq!(profile.domain, "math");
        assert_eq!(profile.subdomain, "number theory");
        assert_eq!(profile.recommended.as_deref(), Some("decompose"));
    }
}
