use crate::errors::{Result, StunnerError};
use crate::model::{EdgeContent, EdgeKind};
use crate::ops::Graph;

use super::context::{Direction, RuleContext, RuleContextKind};
use super::handlers::count_edges;
use super::invariants;
use super::manager::evaluate;
use super::rule::Rule;
use super::ruleset::RuleSet;
use super::violation::RuleViolation;

/// Validate graph integrity
///
/// Checks, in order:
///
/// 1. Every edge end references an existing node
/// 2. Edge endpoints and node adjacency lists agree
/// 3. No node has more than one containment parent or dock host
/// 4. Containment and docking chains are acyclic
///
/// # Errors
/// Returns the first violation encountered. For exhaustive reporting, call
/// the individual functions in `invariants` directly.
pub fn validate_graph(graph: &Graph) -> Result<()> {
    if let Some((edge_uuid, node_uuid)) = invariants::find_dangling_endpoints(graph).first() {
        return Err(StunnerError::DanglingEndpoint {
            edge_uuid: edge_uuid.clone(),
            node_uuid: node_uuid.clone(),
        });
    }

    if let Some((node_uuid, edge_uuid, reason)) =
        invariants::find_adjacency_mismatches(graph).first()
    {
        return Err(StunnerError::AdjacencyMismatch {
            node_uuid: node_uuid.clone(),
            edge_uuid: edge_uuid.clone(),
            reason: reason.clone(),
        });
    }

    for (kind, relation) in [(EdgeKind::Child, "containment"), (EdgeKind::Dock, "dock")] {
        if let Some(node_uuid) = invariants::find_multiple_parents(graph, kind).first() {
            return Err(StunnerError::MultipleParents {
                node_uuid: node_uuid.clone(),
                relation: relation.to_string(),
            });
        }
        for node in graph.nodes() {
            if invariants::has_cycle(graph, &node.uuid, kind) {
                return Err(StunnerError::CycleDetected {
                    node_uuid: node.uuid.clone(),
                    relation: relation.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn bounds_violation(
    rule: &Rule,
    kind: RuleContextKind,
    subject: String,
    count: usize,
) -> Option<RuleViolation> {
    let (min, max) = rule.bounds()?;
    let message = if count < min {
        format!("{} requires at least {}, found {}", subject, min, count)
    } else if let Some(max) = max.filter(|max| count > *max) {
        format!("{} allows at most {}, found {}", subject, max, count)
    } else {
        return None;
    };
    Some(RuleViolation::new(rule.severity(), kind, message))
}

/// Evaluate every rule against the whole graph
///
/// Unlike command checks, which judge a single proposed change, this
/// re-counts cardinality and edge occurrence bounds as they stand and
/// re-checks every existing connection, containment and docking relation.
/// Used before saving and by the CLI.
pub fn validate_diagram(rules: &RuleSet, graph: &Graph) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    for rule in rules.rules_for(RuleContextKind::Cardinality) {
        let Rule::Cardinality(cardinality) = rule else {
            continue;
        };
        let count = graph
            .nodes()
            .filter(|node| node.definition().has_label(&cardinality.role))
            .count();
        violations.extend(bounds_violation(
            rule,
            RuleContextKind::Cardinality,
            format!("Role '{}'", cardinality.role),
            count,
        ));
    }

    for rule in rules.rules_for(RuleContextKind::EdgeCardinality) {
        let Rule::EdgeOccurrences(occurrences) = rule else {
            continue;
        };
        let direction = match occurrences.direction {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        };
        for node in graph
            .nodes()
            .filter(|node| node.definition().has_label(&occurrences.role))
        {
            let count = count_edges(graph, node, occurrences.direction, &occurrences.edge_id, None);
            let subject = format!(
                "'{}' {} '{}' edges",
                node.definition().id,
                direction,
                occurrences.edge_id
            );
            violations.extend(
                bounds_violation(rule, RuleContextKind::EdgeCardinality, subject, count)
                    .map(|violation| violation.with_element(node.uuid.clone())),
            );
        }
    }

    for edge in graph.edges() {
        let source = edge.source().and_then(|uuid| graph.node(uuid));
        let target = edge.target().and_then(|uuid| graph.node(uuid));
        match (&edge.content, source, target) {
            (EdgeContent::Child, Some(parent), Some(child)) => {
                violations.extend(evaluate(rules, graph, &RuleContext::containment(parent, child)));
            }
            (EdgeContent::Dock, Some(host), Some(docked)) => {
                violations.extend(evaluate(rules, graph, &RuleContext::docking(host, docked)));
            }
            (content, source, target) => {
                if let Some(def) = content.definition() {
                    violations.extend(evaluate(
                        rules,
                        graph,
                        &RuleContext::connection(&edge.uuid, def, source, target),
                    ));
                }
            }
        }
    }

    violations
}
