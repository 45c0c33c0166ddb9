use crate::ops::Graph;
use crate::rules::{evaluate, RuleContext, RuleSet, RuleViolation};

/// What a command executes against: the graph it may mutate and the rules
/// its checks consult
///
/// Commands never keep references into the graph; they resolve uuids
/// through the context on every call.
pub struct GraphCommandContext<'a> {
    graph: &'a mut Graph,
    rules: &'a RuleSet,
    enforce_rules: bool,
}

impl<'a> GraphCommandContext<'a> {
    pub fn new(graph: &'a mut Graph, rules: &'a RuleSet) -> Self {
        Self {
            graph,
            rules,
            enforce_rules: true,
        }
    }

    /// The same graph and rules with rule evaluation switched off
    ///
    /// Inverse commands run through this context: they put back a state the
    /// rules already accepted. Resolution and structural errors still apply.
    pub fn unchecked(&mut self) -> GraphCommandContext<'_> {
        GraphCommandContext {
            graph: &mut *self.graph,
            rules: self.rules,
            enforce_rules: false,
        }
    }

    /// Read-only view for [`GraphCommand::check`](super::GraphCommand::check)
    pub fn checking(&self) -> CheckContext<'_> {
        CheckContext {
            graph: self.graph,
            rules: self.rules,
            enforce_rules: self.enforce_rules,
        }
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        self.graph
    }

    pub fn rules(&self) -> &RuleSet {
        self.rules
    }

    pub fn enforces_rules(&self) -> bool {
        self.enforce_rules
    }
}

/// What a command is checked against
///
/// Holds the graph by shared reference, so a check cannot mutate it.
pub struct CheckContext<'a> {
    graph: &'a Graph,
    rules: &'a RuleSet,
    enforce_rules: bool,
}

impl<'a> CheckContext<'a> {
    pub fn new(graph: &'a Graph, rules: &'a RuleSet) -> Self {
        Self {
            graph,
            rules,
            enforce_rules: true,
        }
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Execution context over `scratch` with the same rules and enforcement
    pub(crate) fn simulate<'b>(&self, scratch: &'b mut Graph) -> GraphCommandContext<'b>
    where
        'a: 'b,
    {
        GraphCommandContext {
            graph: scratch,
            rules: self.rules,
            enforce_rules: self.enforce_rules,
        }
    }

    /// Evaluate a rule context against the graph; empty when rules are off
    pub fn evaluate(&self, context: &RuleContext<'_>) -> Vec<RuleViolation> {
        if !self.enforce_rules {
            return Vec::new();
        }
        evaluate(self.rules, self.graph, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Definition, Node, NodeContent};
    use crate::rules::{Operation, Rule};

    #[test]
    fn test_unchecked_context_skips_rules() {
        let mut graph = Graph::new("g");
        let rules = RuleSet::new().with_rule(Rule::cardinality("Task", 0, Some(0)));
        let node = Node::new("n1", NodeContent::Definition(Definition::new("Task")));
        let context = RuleContext::cardinality(&node, Operation::Add);

        let mut ctx = GraphCommandContext::new(&mut graph, &rules);
        assert_eq!(ctx.checking().evaluate(&context).len(), 1);

        let unchecked = ctx.unchecked();
        assert!(!unchecked.enforces_rules());
        assert!(unchecked.checking().evaluate(&context).is_empty());
    }
}
