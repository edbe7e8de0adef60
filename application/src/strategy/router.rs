//! Router - chooses which strategy handles a request or a plan step.
//!
//! An explicit override from the caller always wins. Otherwise the router
//! consults the external classifier for problem metadata and maps the
//! profile to a strategy name, which is then resolved through the registry
//! (so a classifier recommendation with a typo still lands on a real
//! strategy). For plan steps, the step's `strategy_hint` constrains — but
//! never bypasses — resolution.

use super::registry::{RegistryError, StrategyRegistry};
use crate::ports::classifier::ClassifierPort;
use std::sync::Arc;
use tactician_domain::{Complexity, ProblemProfile, Query, StepDescriptor};
use tracing::{debug, warn};

/// Strategy chooser for top-level requests and plan steps.
pub struct Router {
    registry: Arc<StrategyRegistry>,
    classifier: Arc<dyn ClassifierPort>,
}

impl Router {
    pub fn new(registry: Arc<StrategyRegistry>, classifier: Arc<dyn ClassifierPort>) -> Self {
        Self {
            registry,
            classifier,
        }
    }

    /// Choose the strategy name for a top-level request.
    pub async fn route_request(
        &self,
        query: &Query,
        route_override: Option<&str>,
    ) -> Result<String, RegistryError> {
        if let Some(explicit) = route_override {
            // An explicit override always wins over routing logic
            let resolved = self.registry.resolve(explicit)?;
            debug!("routing override '{}' resolved to '{}'", explicit, resolved);
            return Ok(resolved.to_string());
        }

        let profile = match self.classifier.classify(query).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("classifier failed ({}); routing to default strategy", e);
                return Ok(self.registry.resolve("")?.to_string());
            }
        };

        let candidate = Self::candidate_for(&profile);
        debug!(
            "classified as {}/{} ({}); routing candidate '{}'",
            profile.domain, profile.subdomain, profile.complexity, candidate
        );
        Ok(self.registry.resolve(&candidate)?.to_string())
    }

    /// Choose the strategy name for one plan step.
    ///
    /// The step's hint is fed through registry resolution; a blank hint
    /// routes to the default strategy.
    pub fn route_step(&self, step: &StepDescriptor) -> Result<String, RegistryError> {
        Ok(self.registry.resolve(&step.strategy_hint)?.to_string())
    }

    /// Map a problem profile to a candidate strategy name.
    fn candidate_for(profile: &ProblemProfile) -> String {
        if let Some(recommended) = &profile.recommended {
            return recommended.clone();
        }
        if profile.complexity == Complexity::High {
            return "decompose".to_string();
        }
        match profile.domain.to_lowercase().as_str() {
            "math" | "arithmetic" | "coding" | "code" => "program".to_string(),
            _ => String::new(), // default strategy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StaticClassifier, noop_registry};
    use tactician_domain::StepDescriptor;

    fn router(profile: ProblemProfile) -> Router {
        Router::new(
            Arc::new(noop_registry()),
            Arc::new(StaticClassifier::new(profile)),
        )
    }

    #[tokio::test]
    async fn test_override_wins_over_classifier() {
        let router = router(ProblemProfile::new(Complexity::High, "math"));
        let name = router
            .route_request(&Query::new("q"), Some("program"))
            .await
            .unwrap();
        assert_eq!(name, "program");
    }

    #[tokio::test]
    async fn test_high_complexity_routes_to_decompose() {
        let router = router(ProblemProfile::new(Complexity::High, "history"));
        let name = router.route_request(&Query::new("q"), None).await.unwrap();
        assert_eq!(name, "decompose");
    }

    #[tokio::test]
    async fn test_math_domain_routes_to_program() {
        let router = router(ProblemProfile::new(Complexity::Low, "math"));
        let name = router.route_request(&Query::new("q"), None).await.unwrap();
        assert_eq!(name, "program");
    }

    #[tokio::test]
    async fn test_classifier_recommendation_is_resolved() {
        // recommendation with a typo still resolves through the registry
        let router = router(
            ProblemProfile::new(Complexity::Low, "trivia").with_recommendation("Decompse"),
        );
        let name = router.route_request(&Query::new("q"), None).await.unwrap();
        assert_eq!(name, "decompose");
    }

    #[tokio::test]
    async fn test_plain_profile_routes_to_default() {
        let router = router(ProblemProfile::new(Complexity::Medium, "trivia"));
        let name = router.route_request(&Query::new("q"), None).await.unwrap();
        assert_eq!(name, "direct");
    }

    #[test]
    fn test_step_hint_constrains_resolution() {
        let router = router(ProblemProfile::default());
        let step = StepDescriptor::new("1", "compute").with_hint("PROGRAM");
        assert_eq!(router.route_step(&step).unwrap(), "program");

        let unhinted = StepDescriptor::new("2", "recall");
        assert_eq!(router.route_step(&unhinted).unwrap(), "direct");
    }
}
