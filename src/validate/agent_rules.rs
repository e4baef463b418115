//! Agent-flow rules. Only applied to flows of kind `agent`.

use tracing::trace;

use super::issue::{Category, Severity, ValidationIssue};
use super::node_rules::is_blank;
use crate::parse::types::{AgentLoopSpec, FlowDocument, FlowNode, NodeSpec};

pub fn validate_agent_flow(flow: &FlowDocument, issues: &mut Vec<ValidationIssue>) {
    if !flow.is_agent() {
        trace!("traditional flow, skipping agent rules");
        return;
    }

    let loops: Vec<(&FlowNode, &AgentLoopSpec)> = flow
        .all_nodes()
        .filter_map(|n| match &n.spec {
            NodeSpec::AgentLoop(spec) => Some((n, spec)),
            _ => None,
        })
        .collect();

    if loops.is_empty() {
        issues.push(
            ValidationIssue::flow(
                Severity::Error,
                Category::AgentValidation,
                "Agent flow must have exactly one agent_loop node",
            )
            .suggest("Add an agent_loop node from the toolbar"),
        );
        return;
    }

    if loops.len() > 1 {
        issues.push(ValidationIssue::flow(
            Severity::Warning,
            Category::AgentValidation,
            format!(
                "Agent flow has {} agent_loop nodes; typically only one is expected",
                loops.len()
            ),
        ));
    }

    for (node, spec) in loops {
        check_agent_loop(node, spec, issues);
    }
}

fn check_agent_loop(node: &FlowNode, spec: &AgentLoopSpec, issues: &mut Vec<ValidationIssue>) {
    let issue = |severity: Severity, message: String, suggestion: &str| {
        ValidationIssue::flow(severity, Category::AgentValidation, message)
            .on_node(&node.id)
            .suggest(suggestion)
    };

    if spec.tools.is_empty() {
        issues.push(issue(
            Severity::Error,
            format!("Agent loop \"{}\" has no tools defined", node.label),
            "Add at least one tool to the agent loop",
        ));
    } else if !spec.tools.iter().any(|t| t.is_terminal) {
        issues.push(issue(
            Severity::Error,
            format!(
                "Agent loop \"{}\" has no terminal tool; the agent needs a way to finish",
                node.label
            ),
            "Mark at least one tool as terminal (is_terminal: true)",
        ));
    }

    // Zero is as good as unset
    if spec.max_iterations.unwrap_or(0) == 0 {
        issues.push(issue(
            Severity::Warning,
            format!("Agent loop \"{}\" has no max_iterations set", node.label),
            "Set max_iterations to prevent infinite loops",
        ));
    }

    if is_blank(&spec.model) {
        issues.push(issue(
            Severity::Warning,
            format!("Agent loop \"{}\" has no LLM model specified", node.label),
            "Set the model (e.g., claude-sonnet) in the spec panel",
        ));
    }
}
