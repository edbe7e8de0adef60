//! Run context - the mutable state carried through one orchestration call.

use crate::core::query::{Query, QueryId, RunId};
use crate::ensemble::EnsembleConfig;
use crate::plan::StepDescriptor;
use crate::symbol::SymbolTable;

/// State owned by one top-level orchestration call.
///
/// Created when a request enters the engine, mutated by each strategy as it
/// executes (current step, symbol bindings, final answer), and never shared
/// across concurrent requests.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The problem being solved.
    pub query: Query,
    /// Accumulated long-form context (documents, prior results).
    pub long_context: String,
    /// Accumulated short-form context (condensed notes).
    pub short_context: String,
    /// Stable identifier of the incoming query.
    pub query_id: QueryId,
    /// Unique identifier of this run.
    pub run_id: RunId,
    /// Symbols produced by completed steps.
    pub symbols: SymbolTable,
    /// Ensemble configuration, when the request is answered by a vote.
    pub ensemble: Option<EnsembleConfig>,
    /// The step currently being executed, if inside a compound plan.
    pub current_step: Option<StepDescriptor>,
    /// Nesting depth of compound strategies (guards runaway recursion).
    pub depth: usize,
    /// Cache key under which a compound strategy may reuse a stored plan.
    pub plan_cache_key: Option<String>,
    /// Final answer, appended once a strategy completes.
    pub answer: Option<String>,
}

impl RunContext {
    pub fn new(query: impl Into<Query>) -> Self {
        Self {
            query: query.into(),
            long_context: String::new(),
            short_context: String::new(),
            query_id: QueryId::generate(),
            run_id: RunId::generate(),
            symbols: SymbolTable::new(),
            ensemble: None,
            current_step: None,
            depth: 0,
            plan_cache_key: None,
            answer: None,
        }
    }

    pub fn with_ensemble(mut self, config: EnsembleConfig) -> Self {
        self.ensemble = Some(config);
        self
    }

    pub fn with_plan_cache_key(mut self, key: impl Into<String>) -> Self {
        self.plan_cache_key = Some(key.into());
        self
    }

    pub fn with_long_context(mut self, context: impl Into<String>) -> Self {
        self.long_context = context.into();
        self
    }

    pub fn with_short_context(mut self, context: impl Into<String>) -> Self {
        self.short_context = context.into();
        self
    }

    /// Derive a fresh, independent context for one ensemble invocation or
    /// one sub-step run: same query and accumulated context, new run id,
    /// empty symbol table, no ensemble config.
    pub fn fork(&self) -> Self {
        Self {
            query: self.query.clone(),
            long_context: self.long_context.clone(),
            short_context: self.short_context.clone(),
            query_id: self.query_id.clone(),
            run_id: RunId::generate(),
            symbols: SymbolTable::new(),
            ensemble: None,
            current_step: None,
            depth: self.depth,
            plan_cache_key: None,
            answer: None,
        }
    }

    /// Record the final answer for this run.
    pub fn finish(&mut self, answer: impl Into<String>) {
        self.answer = Some(answer.into());
    }
}
