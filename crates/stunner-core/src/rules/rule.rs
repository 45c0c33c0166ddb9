//! Declarative structural rules

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::context::{Direction, RuleContextKind};
use super::violation::ViolationSeverity;

fn default_severity() -> ViolationSeverity {
    ViolationSeverity::Error
}

/// Bounds on how many nodes carrying `role` the graph may hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityRule {
    pub role: String,
    #[serde(default)]
    pub min: usize,
    #[serde(default)]
    pub max: Option<usize>,
    #[serde(default = "default_severity")]
    pub severity: ViolationSeverity,
}

/// Bounds on how many `edge_id` edges a node carrying `role` may have in one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeOccurrencesRule {
    pub edge_id: String,
    pub role: String,
    pub direction: Direction,
    #[serde(default)]
    pub min: usize,
    #[serde(default)]
    pub max: Option<usize>,
    #[serde(default = "default_severity")]
    pub severity: ViolationSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermittedConnection {
    pub from: String,
    pub to: String,
}

impl PermittedConnection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Role pairs an `edge_id` edge may connect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRule {
    pub edge_id: String,
    pub permitted: Vec<PermittedConnection>,
    #[serde(default = "default_severity")]
    pub severity: ViolationSeverity,
}

/// Roles a `container_id` node may contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainmentRule {
    pub container_id: String,
    pub allowed_roles: BTreeSet<String>,
    #[serde(default = "default_severity")]
    pub severity: ViolationSeverity,
}

/// Roles that may be docked on a `host_id` node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockingRule {
    pub host_id: String,
    pub allowed_roles: BTreeSet<String>,
    #[serde(default = "default_severity")]
    pub severity: ViolationSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Cardinality(CardinalityRule),
    EdgeOccurrences(EdgeOccurrencesRule),
    Connection(ConnectionRule),
    Containment(ContainmentRule),
    Docking(DockingRule),
}

impl Rule {
    /// The one context kind this rule evaluates
    pub fn context_kind(&self) -> RuleContextKind {
        match self {
            Rule::Cardinality(_) => RuleContextKind::Cardinality,
            Rule::EdgeOccurrences(_) => RuleContextKind::EdgeCardinality,
            Rule::Connection(_) => RuleContextKind::Connection,
            Rule::Containment(_) => RuleContextKind::Containment,
            Rule::Docking(_) => RuleContextKind::Docking,
        }
    }

    pub fn severity(&self) -> ViolationSeverity {
        match self {
            Rule::Cardinality(rule) => rule.severity,
            Rule::EdgeOccurrences(rule) => rule.severity,
            Rule::Connection(rule) => rule.severity,
            Rule::Containment(rule) => rule.severity,
            Rule::Docking(rule) => rule.severity,
        }
    }

    /// Lower and upper bound, for the rules that have them
    pub fn bounds(&self) -> Option<(usize, Option<usize>)> {
        match self {
            Rule::Cardinality(rule) => Some((rule.min, rule.max)),
            Rule::EdgeOccurrences(rule) => Some((rule.min, rule.max)),
            _ => None,
        }
    }

    pub fn cardinality(role: impl Into<String>, min: usize, max: Option<usize>) -> Self {
        Rule::Cardinality(CardinalityRule {
            role: role.into(),
            min,
            max,
            severity: ViolationSeverity::Error,
        })
    }

    pub fn edge_occurrences(
        edge_id: impl Into<String>,
        role: impl Into<String>,
        direction: Direction,
        min: usize,
        max: Option<usize>,
    ) -> Self {
        Rule::EdgeOccurrences(EdgeOccurrencesRule {
            edge_id: edge_id.into(),
            role: role.into(),
            direction,
            min,
            max,
            severity: ViolationSeverity::Error,
        })
    }

    pub fn connection<I, F, T>(edge_id: impl Into<String>, permitted: I) -> Self
    where
        I: IntoIterator<Item = (F, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        Rule::Connection(ConnectionRule {
            edge_id: edge_id.into(),
            permitted: permitted
                .into_iter()
                .map(|(from, to)| PermittedConnection::new(from, to))
                .collect(),
            severity: ViolationSeverity::Error,
        })
    }

    pub fn containment<I, S>(container_id: impl Into<String>, allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Containment(ContainmentRule {
            container_id: container_id.into(),
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
            severity: ViolationSeverity::Error,
        })
    }

    pub fn docking<I, S>(host_id: impl Into<String>, allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::Docking(DockingRule {
            host_id: host_id.into(),
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
            severity: ViolationSeverity::Error,
        })
    }

    /// Same rule reported at `severity`
    pub fn with_severity(mut self, severity: ViolationSeverity) -> Self {
        match &mut self {
            Rule::Cardinality(rule) => rule.severity = severity,
            Rule::EdgeOccurrences(rule) => rule.severity = severity,
            Rule::Connection(rule) => rule.severity = severity,
            Rule::Containment(rule) => rule.severity = severity,
            Rule::Docking(rule) => rule.severity = severity,
        }
        self
    }
}
