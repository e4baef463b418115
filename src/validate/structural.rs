//! Graph-completeness rules: trigger, dead ends, orphans, cycles, decision
//! branches, terminal advisories.

use tracing::trace;

use super::issue::{Category, Severity, ValidationIssue};
use crate::parse::graph::FlowGraph;
use crate::parse::types::{FlowDocument, NodeKind};

/// Run all structural rules, in order. Returns nothing; issues accumulate.
pub fn validate_structural(
    flow: &FlowDocument,
    graph: &FlowGraph<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    check_trigger_exists(flow, issues);
    check_paths_reach_terminal(flow, graph, issues);
    check_orphaned_nodes(flow, graph, issues);
    check_cycles(flow, graph, issues);
    check_decision_branches(flow, graph, issues);
    check_terminal_no_outgoing(flow, graph, issues);
}

fn graph_error(message: String) -> ValidationIssue {
    ValidationIssue::flow(Severity::Error, Category::GraphCompleteness, message)
}

fn check_trigger_exists(flow: &FlowDocument, issues: &mut Vec<ValidationIssue>) {
    if flow.trigger.is_none() {
        issues.push(graph_error("Flow must have a trigger node".into()));
    }
}

fn check_paths_reach_terminal(
    flow: &FlowDocument,
    graph: &FlowGraph<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    if !flow.all_nodes().any(|n| n.kind() == NodeKind::Terminal) {
        issues.push(
            graph_error(
                "Flow has no terminal nodes; all paths must end at a terminal".into(),
            )
            .suggest("Add a terminal node and connect your flow to it"),
        );
        return;
    }

    let Some(trigger) = &flow.trigger else {
        trace!("no trigger, skipping dead-end check");
        return;
    };
    let reachable = graph.reachable_from(&trigger.id);

    for node in flow.all_nodes() {
        // Loop and parallel nodes route through their own bodies/branches
        if matches!(
            node.kind(),
            NodeKind::Terminal | NodeKind::Loop | NodeKind::Parallel
        ) {
            continue;
        }
        if !reachable.contains(node.id.as_str()) {
            continue;
        }
        if graph.outgoing_count(&node.id) == 0 {
            issues.push(
                graph_error(format!(
                    "Node \"{}\" ({}) is a dead end with no outgoing connections",
                    node.label,
                    node.kind()
                ))
                .on_node(&node.id)
                .suggest("Connect this node to a downstream node or terminal"),
            );
        }
    }
}

fn check_orphaned_nodes(
    flow: &FlowDocument,
    graph: &FlowGraph<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(trigger) = &flow.trigger else {
        trace!("no trigger, skipping orphan check");
        return;
    };
    let reachable = graph.reachable_from(&trigger.id);

    for node in &flow.nodes {
        if !reachable.contains(node.id.as_str()) {
            issues.push(
                graph_error(format!(
                    "Node \"{}\" ({}) is unreachable from the trigger",
                    node.label,
                    node.kind()
                ))
                .on_node(&node.id)
                .suggest("Connect this node to the flow graph or remove it"),
            );
        }
    }
}

fn check_cycles(flow: &FlowDocument, graph: &FlowGraph<'_>, issues: &mut Vec<ValidationIssue>) {
    // Agent loops are cyclic on purpose
    if flow.is_agent() {
        trace!("agent flow, skipping cycle check");
        return;
    }
    let Some(trigger) = &flow.trigger else {
        return;
    };

    if graph.has_cycle_from(&trigger.id) {
        issues.push(
            graph_error("Flow contains a circular path (cycle detected)".into()).suggest(
                "Remove the cycle or convert to an agent flow if loops are intentional",
            ),
        );
    }
}

fn check_decision_branches(
    flow: &FlowDocument,
    graph: &FlowGraph<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    for node in flow.all_nodes() {
        if node.kind() != NodeKind::Decision {
            continue;
        }

        let handles = graph.outgoing_handles(&node.id);
        if !handles.contains(&Some("true")) {
            issues.push(
                graph_error(format!(
                    "Decision \"{}\" is missing a \"Yes\" (true) branch connection",
                    node.label
                ))
                .on_node(&node.id)
                .suggest("Connect the \"Yes\" handle to a downstream node"),
            );
        }
        if !handles.contains(&Some("false")) {
            issues.push(
                graph_error(format!(
                    "Decision \"{}\" is missing a \"No\" (false) branch connection",
                    node.label
                ))
                .on_node(&node.id)
                .suggest("Connect the \"No\" handle to a downstream node"),
            );
        }
    }
}

fn check_terminal_no_outgoing(
    flow: &FlowDocument,
    graph: &FlowGraph<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    for node in flow.all_nodes() {
        if node.kind() == NodeKind::Terminal && graph.outgoing_count(&node.id) > 0 {
            issues.push(
                ValidationIssue::flow(
                    Severity::Warning,
                    Category::GraphCompleteness,
                    format!(
                        "Terminal \"{}\" has outgoing connections; terminals should be endpoints",
                        node.label
                    ),
                )
                .on_node(&node.id)
                .suggest("Remove outgoing connections from this terminal node"),
            );
        }
    }
}
