use std::collections::BTreeMap;

use super::context::RuleContextKind;
use super::rule::Rule;

/// Registry of rules grouped by the context kind they evaluate
///
/// Filled once at configuration time; evaluation only reads it. Rules of a
/// kind are kept in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<RuleContextKind, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Rule) -> &mut Self {
        self.rules.entry(rule.context_kind()).or_default().push(rule);
        self
    }

    /// Builder form of `register`
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.register(rule);
        self
    }

    pub fn rules_for(&self, kind: RuleContextKind) -> &[Rule] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rules, grouped by kind in kind order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for rule in iter {
            set.register(rule);
        }
        set
    }
}
