//! Scripted port implementations and dependency builders for tests.

use crate::ports::classifier::{ClassifierError, ClassifierPort};
use crate::ports::code_runner::{CodeRunError, CodeRunnerPort};
use crate::ports::oracle::{OracleError, ReasoningOracle};
use crate::ports::plan_cache::{PlanCacheError, PlanCacheStore};
use crate::ports::planner::{PlannerError, PlannerPort};
use crate::strategy::registry::StrategyRegistry;
use crate::strategy::{Strategy, StrategyDeps, StrategyError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tactician_domain::{
    DependentRef, ProblemProfile, Query, RunContext, StepRecord,
};

/// Oracle that replays a fixed list of responses in invocation order.
pub(crate) struct ScriptedOracle {
    responses: Vec<String>,
    failure: Option<String>,
    next: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub(crate) fn new(responses: Vec<impl Into<String>>) -> Self {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            failure: None,
            next: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Vec::new(),
            failure: Some(message.into()),
            next: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in order.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReasoningOracle for ScriptedOracle {
    async fn invoke(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(message) = &self.failure {
            return Err(OracleError::Other(message.clone()));
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(index)
            .cloned()
            .ok_or_else(|| OracleError::Other("oracle script exhausted".to_string()))
    }
}

/// Planner that replays a fixed script of drafts (or failures) and records
/// the feedback it was handed each round.
pub(crate) struct ScriptedPlanner {
    script: Vec<Result<Vec<StepRecord>, String>>,
    repeat_last: bool,
    calls: AtomicUsize,
    feedback: Mutex<Vec<Option<String>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedPlanner {
    pub(crate) fn new(script: Vec<Result<Vec<StepRecord>, String>>) -> Self {
        Self {
            script,
            repeat_last: false,
            calls: AtomicUsize::new(0),
            feedback: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Planner that returns the same draft on every round.
    pub(crate) fn always(records: Vec<StepRecord>) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(vec![Ok(records)])
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Feedback received per round, in order.
    pub(crate) fn feedback_log(&self) -> Vec<Option<String>> {
        self.feedback.lock().unwrap().clone()
    }

    /// Query text received per round, in order.
    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlannerPort for ScriptedPlanner {
    async fn draft_plan(
        &self,
        query: &Query,
        feedback: Option<&str>,
    ) -> Result<Vec<StepRecord>, PlannerError> {
        self.queries.lock().unwrap().push(query.content().to_string());
        self.feedback
            .lock()
            .unwrap()
            .push(feedback.map(|f| f.to_string()));
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = if self.repeat_last {
            index.min(self.script.len().saturating_sub(1))
        } else {
            index
        };
        match self.script.get(index) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(message)) => Err(PlannerError::Oracle(OracleError::Other(message.clone()))),
            None => Err(PlannerError::Unparseable("planner script exhausted".to_string())),
        }
    }
}

/// In-memory plan cache backed by a hash map.
pub(crate) struct MapCache {
    entries: Mutex<HashMap<String, Vec<StepRecord>>>,
}

impl MapCache {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn insert(&self, key: impl Into<String>, records: Vec<StepRecord>) {
        self.entries.lock().unwrap().insert(key.into(), records);
    }
}

#[async_trait]
impl PlanCacheStore for MapCache {
    async fn load(&self, key: &str) -> Result<Vec<StepRecord>, PlanCacheError> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| PlanCacheError::NotFound(key.to_string()))
    }

    async fn save(&self, key: &str, records: &[StepRecord]) -> Result<(), PlanCacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), records.to_vec());
        Ok(())
    }
}

/// Classifier that always produces the same profile.
pub(crate) struct StaticClassifier {
    profile: ProblemProfile,
}

impl StaticClassifier {
    pub(crate) fn new(profile: ProblemProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl ClassifierPort for StaticClassifier {
    async fn classify(&self, _query: &Query) -> Result<ProblemProfile, ClassifierError> {
        Ok(self.profile.clone())
    }
}

/// Code runner that returns a fixed stdout and remembers the last source.
pub(crate) struct ScriptedCodeRunner {
    stdout: String,
    last_source: Mutex<Option<String>>,
}

impl ScriptedCodeRunner {
    pub(crate) fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            last_source: Mutex::new(None),
        }
    }

    pub(crate) fn last_source(&self) -> Option<String> {
        self.last_source.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeRunnerPort for ScriptedCodeRunner {
    async fn run(&self, source: &str) -> Result<String, CodeRunError> {
        *self.last_source.lock().unwrap() = Some(source.to_string());
        Ok(self.stdout.clone())
    }
}

enum CountingBehavior {
    Fixed(String),
    Sequence(Vec<String>),
    Failing(String),
}

/// Strategy that counts its invocations and answers per a fixed behavior.
#[derive(Clone)]
pub(crate) struct CountingStrategy {
    inner: Arc<CountingInner>,
}

struct CountingInner {
    behavior: CountingBehavior,
    invocations: AtomicUsize,
}

impl CountingStrategy {
    pub(crate) fn answering(answer: impl Into<String>) -> Self {
        Self::with_behavior(CountingBehavior::Fixed(answer.into()))
    }

    pub(crate) fn sequence(answers: Vec<impl Into<String>>) -> Self {
        Self::with_behavior(CountingBehavior::Sequence(
            answers.into_iter().map(Into::into).collect(),
        ))
    }

    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(CountingBehavior::Failing(message.into()))
    }

    fn with_behavior(behavior: CountingBehavior) -> Self {
        Self {
            inner: Arc::new(CountingInner {
                behavior,
                invocations: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn invocations(&self) -> usize {
        self.inner.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Strategy for CountingStrategy {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn execute(&self, _ctx: &mut RunContext) -> Result<String, StrategyError> {
        let index = self.inner.invocations.fetch_add(1, Ordering::SeqCst);
        match &self.inner.behavior {
            CountingBehavior::Fixed(answer) => Ok(answer.clone()),
            CountingBehavior::Sequence(answers) => answers
                .get(index)
                .cloned()
                .ok_or_else(|| StrategyError::MalformedResponse("answer script exhausted".into())),
            CountingBehavior::Failing(message) => {
                Err(StrategyError::Oracle(OracleError::Other(message.clone())))
            }
        }
    }
}

struct NamedNoop(&'static str);

#[async_trait]
impl Strategy for NamedNoop {
    fn name(&self) -> &'static str {
        self.0
    }

    async fn execute(&self, _ctx: &mut RunContext) -> Result<String, StrategyError> {
        Ok(self.0.to_string())
    }
}

/// Registry with no-op "direct", "program" and "decompose" strategies.
pub(crate) fn noop_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new("direct");
    for name in ["direct", "program", "decompose"] {
        registry.register(name, Arc::new(move |_deps: &StrategyDeps| {
            Arc::new(NamedNoop(name)) as Arc<dyn Strategy>
        }));
    }
    registry
}

/// Two-step draft: "1" produces `x`, "2" consumes `x` and produces `y`.
pub(crate) fn records_1_then_2() -> Vec<StepRecord> {
    vec![
        StepRecord {
            task_id: "1".into(),
            dependent_task_ids: vec![],
            instruction: "Pick a number between 1 and 10".into(),
            task_type: "direct".into(),
            output_key: "x".into(),
            output_type: "int".into(),
            output_description: "the chosen number".into(),
            dependent: vec![],
            hint: None,
        },
        StepRecord {
            task_id: "2".into(),
            dependent_task_ids: vec!["1".into()],
            instruction: "Square the chosen number".into(),
            task_type: "direct".into(),
            output_key: "y".into(),
            output_type: "int".into(),
            output_description: "the square".into(),
            dependent: vec![DependentRef::new("x", "int")],
            hint: None,
        },
    ]
}

/// Minimal dependency bundle: scripted ports that are never expected to be
/// reached, plus the no-op registry.
pub(crate) fn test_deps() -> StrategyDeps {
    StrategyDeps {
        oracle: Arc::new(ScriptedOracle::new(Vec::<String>::new())),
        planner: Arc::new(ScriptedPlanner::new(vec![])),
        plan_cache: Arc::new(MapCache::new()),
        classifier: Arc::new(StaticClassifier::new(ProblemProfile::default())),
        code_runner: Arc::new(ScriptedCodeRunner::new("")),
        registry: Arc::new(noop_registry()),
        cancellation_token: None,
    }
}

/// Dependency bundle whose "direct" strategy talks to the given oracle.
pub(crate) fn test_deps_with_oracle(oracle: Arc<ScriptedOracle>) -> StrategyDeps {
    let mut registry = StrategyRegistry::new("direct");
    registry.register("direct", crate::strategy::direct::DirectStrategy::factory());
    StrategyDeps {
        oracle,
        planner: Arc::new(ScriptedPlanner::new(vec![])),
        plan_cache: Arc::new(MapCache::new()),
        classifier: Arc::new(StaticClassifier::new(ProblemProfile::default())),
        code_runner: Arc::new(ScriptedCodeRunner::new("")),
        registry: Arc::new(registry),
        cancellation_token: None,
    }
}

/// Dependency bundle with a single registered strategy, which is also the
/// default.
pub(crate) fn test_deps_with_strategy(
    name: &'static str,
    strategy: CountingStrategy,
) -> StrategyDeps {
    let mut registry = StrategyRegistry::new(name);
    registry.register(name, Arc::new(move |_deps: &StrategyDeps| {
        Arc::new(strategy.clone()) as Arc<dyn Strategy>
    }));
    StrategyDeps {
        oracle: Arc::new(ScriptedOracle::new(Vec::<String>::new())),
        planner: Arc::new(ScriptedPlanner::new(vec![])),
        plan_cache: Arc::new(MapCache::new()),
        classifier: Arc::new(StaticClassifier::new(ProblemProfile::default())),
        code_runner: Arc::new(ScriptedCodeRunner::new("")),
        registry: Arc::new(registry),
        cancellation_token: None,
    }
}
