//! Evaluation contexts: what a rule is asked to judge

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{Definition, Edge, Node};

/// Discriminant used to index rules by the context they evaluate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleContextKind {
    Cardinality,
    Connection,
    EdgeCardinality,
    Containment,
    Docking,
}

impl fmt::Display for RuleContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleContextKind::Cardinality => "cardinality",
            RuleContextKind::Connection => "connection",
            RuleContextKind::EdgeCardinality => "edge_cardinality",
            RuleContextKind::Containment => "containment",
            RuleContextKind::Docking => "docking",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// A node is about to be added to or removed from the graph
#[derive(Debug, Clone, Copy)]
pub struct CardinalityContext<'a> {
    pub candidate: &'a Node,
    pub operation: Operation,
}

/// An edge's endpoints are about to become `source` and `target`
#[derive(Debug, Clone, Copy)]
pub struct ConnectionContext<'a> {
    pub edge_uuid: &'a str,
    pub connector: &'a Definition,
    pub source: Option<&'a Node>,
    pub target: Option<&'a Node>,
}

/// An edge is about to gain or lose `candidate` at one end
#[derive(Debug, Clone, Copy)]
pub struct EdgeCardinalityContext<'a> {
    pub candidate: &'a Node,
    pub edge: &'a Edge,
    pub direction: Direction,
    pub operation: Operation,
}

/// `candidate` is about to become a child of `parent`
#[derive(Debug, Clone, Copy)]
pub struct ContainmentContext<'a> {
    pub parent: &'a Node,
    pub candidate: &'a Node,
}

/// `candidate` is about to be docked on `host`
#[derive(Debug, Clone, Copy)]
pub struct DockingContext<'a> {
    pub host: &'a Node,
    pub candidate: &'a Node,
}

#[derive(Debug, Clone, Copy)]
pub enum RuleContext<'a> {
    Cardinality(CardinalityContext<'a>),
    Connection(ConnectionContext<'a>),
    EdgeCardinality(EdgeCardinalityContext<'a>),
    Containment(ContainmentContext<'a>),
    Docking(DockingContext<'a>),
}

impl<'a> RuleContext<'a> {
    pub fn kind(&self) -> RuleContextKind {
        match self {
            RuleContext::Cardinality(_) => RuleContextKind::Cardinality,
            RuleContext::Connection(_) => RuleContextKind::Connection,
            RuleContext::EdgeCardinality(_) => RuleContextKind::EdgeCardinality,
            RuleContext::Containment(_) => RuleContextKind::Containment,
            RuleContext::Docking(_) => RuleContextKind::Docking,
        }
    }

    pub fn cardinality(candidate: &'a Node, operation: Operation) -> Self {
        RuleContext::Cardinality(CardinalityContext {
            candidate,
            operation,
        })
    }

    pub fn connection(
        edge_uuid: &'a str,
        connector: &'a Definition,
        source: Option<&'a Node>,
        target: Option<&'a Node>,
    ) -> Self {
        RuleContext::Connection(ConnectionContext {
            edge_uuid,
            connector,
            source,
            target,
        })
    }

    pub fn edge_cardinality(
        candidate: &'a Node,
        edge: &'a Edge,
        direction: Direction,
        operation: Operation,
    ) -> Self {
        RuleContext::EdgeCardinality(EdgeCardinalityContext {
            candidate,
            edge,
            direction,
            operation,
        })
    }

    pub fn containment(parent: &'a Node, candidate: &'a Node) -> Self {
        RuleContext::Containment(ContainmentContext { parent, candidate })
    }

    pub fn docking(host: &'a Node, candidate: &'a Node) -> Self {
        RuleContext::Docking(DockingContext { host, candidate })
    }
}
