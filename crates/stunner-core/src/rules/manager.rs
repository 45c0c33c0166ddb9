use tracing::{debug, trace};

use super::context::RuleContext;
use super::handlers;
use super::ruleset::RuleSet;
use super::violation::RuleViolation;
use crate::ops::Graph;

/// Dispatches evaluation contexts to the rules registered for their kind
///
/// Evaluation is read-only and deterministic: rules are visited in
/// registration order and the graph is only borrowed immutably, so the same
/// graph and context always yield the same violations.
#[derive(Debug, Clone, Copy)]
pub struct RuleManager<'a> {
    rules: &'a RuleSet,
}

impl<'a> RuleManager<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    pub fn evaluate(&self, graph: &Graph, context: &RuleContext<'_>) -> Vec<RuleViolation> {
        evaluate(self.rules, graph, context)
    }
}

/// Evaluate one context against the matching rules of `rules`
pub fn evaluate(rules: &RuleSet, graph: &Graph, context: &RuleContext<'_>) -> Vec<RuleViolation> {
    let kind = context.kind();
    let candidates = rules.rules_for(kind);
    trace!(rule_kind = %kind, rule_count = candidates.len(), "evaluating rules");

    let violations = match context {
        RuleContext::Cardinality(ctx) => handlers::cardinality(candidates, graph, ctx),
        RuleContext::EdgeCardinality(ctx) => handlers::edge_cardinality(candidates, graph, ctx),
        RuleContext::Connection(ctx) => handlers::connection(candidates, ctx),
        RuleContext::Containment(ctx) => handlers::containment(candidates, ctx),
        RuleContext::Docking(ctx) => handlers::docking(candidates, ctx),
    };

    if !violations.is_empty() {
        debug!(
            rule_kind = %kind,
            violation_count = violations.len(),
            "rule violations found"
        );
    }
    violations
}
