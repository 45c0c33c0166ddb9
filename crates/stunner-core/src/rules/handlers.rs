//! Per-kind rule evaluation
//!
//! Each handler receives only the rules registered for its context kind and
//! reads the graph without mutating it.

use std::collections::BTreeSet;

use super::context::{
    CardinalityContext, ConnectionContext, ContainmentContext, Direction, DockingContext,
    EdgeCardinalityContext, Operation, RuleContextKind,
};
use super::rule::Rule;
use super::violation::{RuleViolation, ViolationSeverity};
use crate::model::{Edge, Node};
use crate::ops::Graph;

pub(crate) fn cardinality(
    rules: &[Rule],
    graph: &Graph,
    ctx: &CardinalityContext<'_>,
) -> Vec<RuleViolation> {
    let candidate = ctx.candidate;
    let mut violations = Vec::new();

    for rule in rules {
        let Rule::Cardinality(rule) = rule else {
            continue;
        };
        if !candidate.definition().has_label(&rule.role) {
            continue;
        }
        let others = graph
            .nodes()
            .filter(|node| node.uuid != candidate.uuid && node.definition().has_label(&rule.role))
            .count();

        match ctx.operation {
            Operation::Add => {
                let projected = others + 1;
                if let Some(max) = rule.max.filter(|max| projected > *max) {
                    violations.push(
                        RuleViolation::new(
                            rule.severity,
                            RuleContextKind::Cardinality,
                            format!(
                                "Role '{}' allows at most {} node(s), adding would make {}",
                                rule.role, max, projected
                            ),
                        )
                        .with_element(candidate.uuid.clone()),
                    );
                }
            }
            Operation::Delete => {
                if others < rule.min {
                    violations.push(
                        RuleViolation::new(
                            rule.severity,
                            RuleContextKind::Cardinality,
                            format!(
                                "Role '{}' requires at least {} node(s), deleting would leave {}",
                                rule.role, rule.min, others
                            ),
                        )
                        .with_element(candidate.uuid.clone()),
                    );
                }
            }
        }
    }

    violations
}

/// Edges with definition `edge_id` attached to `node` in `direction`, excluding `skip_uuid`
pub(crate) fn count_edges(
    graph: &Graph,
    node: &Node,
    direction: Direction,
    edge_id: &str,
    skip_uuid: Option<&str>,
) -> usize {
    let matches = |edge: &&Edge| {
        Some(edge.uuid.as_str()) != skip_uuid
            && edge.content.definition().map(|def| def.id.as_str()) == Some(edge_id)
    };
    match direction {
        Direction::Outgoing => graph.outgoing(node).filter(matches).count(),
        Direction::Incoming => graph.incoming(node).filter(matches).count(),
    }
}

pub(crate) fn edge_cardinality(
    rules: &[Rule],
    graph: &Graph,
    ctx: &EdgeCardinalityContext<'_>,
) -> Vec<RuleViolation> {
    let Some(edge_def) = ctx.edge.content.definition() else {
        return Vec::new();
    };
    let candidate = ctx.candidate;
    let mut violations = Vec::new();

    for rule in rules {
        let Rule::EdgeOccurrences(rule) = rule else {
            continue;
        };
        if rule.edge_id != edge_def.id
            || rule.direction != ctx.direction
            || !candidate.definition().has_label(&rule.role)
        {
            continue;
        }
        let others = count_edges(
            graph,
            candidate,
            ctx.direction,
            &rule.edge_id,
            Some(&ctx.edge.uuid),
        );
        let direction = match ctx.direction {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        };

        match ctx.operation {
            Operation::Add => {
                let projected = others + 1;
                if let Some(max) = rule.max.filter(|max| projected > *max) {
                    violations.push(
                        RuleViolation::new(
                            rule.severity,
                            RuleContextKind::EdgeCardinality,
                            format!(
                                "'{}' allows at most {} {} '{}' edge(s), connecting would make {}",
                                rule.role, max, direction, rule.edge_id, projected
                            ),
                        )
                        .with_element(candidate.uuid.clone()),
                    );
                }
            }
            Operation::Delete => {
                if others < rule.min {
                    violations.push(
                        RuleViolation::new(
                            rule.severity,
                            RuleContextKind::EdgeCardinality,
                            format!(
                                "'{}' requires at least {} {} '{}' edge(s), disconnecting would leave {}",
                                rule.role, rule.min, direction, rule.edge_id, others
                            ),
                        )
                        .with_element(candidate.uuid.clone()),
                    );
                }
            }
        }
    }

    violations
}

pub(crate) fn connection(rules: &[Rule], ctx: &ConnectionContext<'_>) -> Vec<RuleViolation> {
    if ctx.source.is_none() && ctx.target.is_none() {
        return Vec::new();
    }
    let applicable: Vec<_> = rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Connection(rule) if rule.edge_id == ctx.connector.id => Some(rule),
            _ => None,
        })
        .collect();
    let Some(severity) = applicable.iter().map(|rule| rule.severity).max() else {
        return Vec::new();
    };

    let permitted = applicable.iter().flat_map(|rule| &rule.permitted).any(|pair| {
        ctx.source
            .map_or(true, |node| node.definition().has_label(&pair.from))
            && ctx
                .target
                .map_or(true, |node| node.definition().has_label(&pair.to))
    });
    if permitted {
        return Vec::new();
    }

    let describe = |node: Option<&Node>| {
        node.map(|n| n.definition().id.clone())
            .unwrap_or_else(|| "<none>".to_string())
    };
    vec![RuleViolation::new(
        severity,
        RuleContextKind::Connection,
        format!(
            "Connection '{}' is not permitted from '{}' to '{}'",
            ctx.connector.id,
            describe(ctx.source),
            describe(ctx.target)
        ),
    )
    .with_element(ctx.edge_uuid)]
}

/// Shared shape of containment and docking: the holder's definition id
/// selects rules, and the candidate must carry one of their roles. A holder
/// with no rule accepts nothing.
fn holder_accepts(
    kind: RuleContextKind,
    holder: &Node,
    candidate: &Node,
    rules: Vec<(ViolationSeverity, &BTreeSet<String>)>,
    relation: &str,
) -> Vec<RuleViolation> {
    let holder_id = &holder.definition().id;
    let Some(severity) = rules.iter().map(|(severity, _)| *severity).max() else {
        return vec![RuleViolation::error(
            kind,
            format!("'{}' has no {} rule and accepts nothing", holder_id, kind),
        )
        .with_element(candidate.uuid.clone())];
    };

    let accepted = rules
        .iter()
        .any(|(_, roles)| candidate.definition().has_any_label(roles.iter()));
    if accepted {
        return Vec::new();
    }
    vec![RuleViolation::new(
        severity,
        kind,
        format!(
            "'{}' cannot be {} '{}'",
            candidate.definition().id,
            relation,
            holder_id
        ),
    )
    .with_element(candidate.uuid.clone())]
}

pub(crate) fn containment(rules: &[Rule], ctx: &ContainmentContext<'_>) -> Vec<RuleViolation> {
    let parent_id = &ctx.parent.definition().id;
    let applicable = rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Containment(rule) if &rule.container_id == parent_id => {
                Some((rule.severity, &rule.allowed_roles))
            }
            _ => None,
        })
        .collect();
    holder_accepts(
        RuleContextKind::Containment,
        ctx.parent,
        ctx.candidate,
        applicable,
        "contained in",
    )
}

pub(crate) fn docking(rules: &[Rule], ctx: &DockingContext<'_>) -> Vec<RuleViolation> {
    let host_id = &ctx.host.definition().id;
    let applicable = rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Docking(rule) if &rule.host_id == host_id => {
                Some((rule.severity, &rule.allowed_roles))
            }
            _ => None,
        })
        .collect();
    holder_accepts(
        RuleContextKind::Docking,
        ctx.host,
        ctx.candidate,
        applicable,
        "docked on",
    )
}
