//! Keyword-heuristic classifier.
//!
//! A lightweight fallback for deployments without an external classifier
//! service: scans the query for domain keywords and derives a coarse
//! complexity from its shape. Deliberately crude; the router only needs a
//! rough signal.

use async_trait::async_trait;
use tactician_application::ports::classifier::{ClassifierError, ClassifierPort};
use tactician_domain::{Complexity, ProblemProfile, Query};
use tracing::debug;

const MATH_KEYWORDS: &[&str] = &[
    "calculate", "compute", "sum", "product", "factor", "prime", "integral",
    "derivative", "equation", "percent", "probability", "how many",
];
const CODING_KEYWORDS: &[&str] = &[
    "code", "function", "algorithm", "implement", "program", "regex", "parse",
    "sort", "array", "string manipulation",
];
const DECOMPOSE_CUES: &[&str] = &["step by step", "first", "then", "compare", "and then"];

/// [`ClassifierPort`] implementation based on keyword matching.
#[derive(Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn contains_any(text: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| text.contains(k))
    }
}

#[async_trait]
impl ClassifierPort for KeywordClassifier {
    async fn classify(&self, query: &Query) -> Result<ProblemProfile, ClassifierError> {
        let text = query.content().to_lowercase();

        let domain = if Self::contains_any(&text, MATH_KEYWORDS) {
            "math"
        } else if Self::contains_any(&text, CODING_KEYWORDS) {
            "coding"
        } else {
            "general"
        };

        // Long, multi-clause questions tend to need decomposition.
        let word_count = text.split_whitespace().count();
        let question_marks = text.matches('?').count();
        let complexity = if word_count > 60
            || question_marks > 1
            || Self::contains_any(&text, DECOMPOSE_CUES)
        {
            Complexity::High
        } else if word_count > 20 {
            Complexity::Medium
        } else {
            Complexity::Low
        };

        debug!(domain, %complexity, word_count, "keyword classification");
        Ok(ProblemProfile::new(complexity, domain).with_subdomain("keyword-heuristic"))
    }
}
