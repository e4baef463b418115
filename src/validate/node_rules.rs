//! Per-node spec validation.
//!
//! One arm per `NodeSpec` variant; a new node kind does not compile until it
//! gets an arm here. Missing required fields are errors, empty advisory
//! fields are warnings.

use super::issue::{Category, Severity, ValidationIssue};
use crate::parse::types::*;

const MIN_PARALLEL_BRANCHES: usize = 2;
const MIN_ORCHESTRATOR_AGENTS: usize = 2;
const MIN_GROUP_MEMBERS: usize = 2;

/// Validate every node whose kind belongs to `group`, trigger first.
pub fn validate_group(flow: &FlowDocument, group: RuleGroup, issues: &mut Vec<ValidationIssue>) {
    for node in flow.all_nodes().filter(|n| n.kind().rule_group() == group) {
        validate_node_spec(node, issues);
    }
}

/// Validate a single node's spec. Returns nothing; issues accumulate.
pub fn validate_node_spec(node: &FlowNode, issues: &mut Vec<ValidationIssue>) {
    let label = node.label.as_str();
    let mut rule = Rule {
        node_id: &node.id,
        issues,
    };

    match &node.spec {
        // -- Core -------------------------------------------------------------
        NodeSpec::Trigger(spec) => {
            if is_blank(&spec.event) {
                rule.error(
                    Category::SpecCompleteness,
                    "Trigger must have an event defined".into(),
                    "Set the trigger event in the spec panel",
                );
            }
        }
        NodeSpec::Input(spec) => {
            for field in &spec.fields {
                if field.field_type.trim().is_empty() {
                    rule.error(
                        Category::SpecCompleteness,
                        format!(
                            "Input \"{}\" field \"{}\" is missing a type",
                            label, field.name
                        ),
                        "Set a type for each input field (e.g., string, number)",
                    );
                }
            }
        }
        NodeSpec::Decision(spec) => {
            if is_blank(&spec.condition) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Decision \"{}\" must have a condition defined", label),
                    "Set the condition expression in the spec panel",
                );
            }
        }
        NodeSpec::Process(spec) => {
            if is_blank(&spec.description) && is_blank(&spec.action) {
                rule.warning(
                    Category::SpecCompleteness,
                    format!("Process \"{}\" has no description or action defined", label),
                    "Add a description or action to clarify what this process does",
                );
            }
        }
        // Outgoing-edge advisory lives in structural.rs
        NodeSpec::Terminal(_) => {}

        // -- Agent --------------------------------------------------------------
        // Depends on the flow kind; checked in agent_rules.rs
        NodeSpec::AgentLoop(_) => {}
        NodeSpec::Guardrail(spec) => {
            if spec.checks.is_empty() {
                rule.warning(
                    Category::AgentValidation,
                    format!("Guardrail \"{}\" has no checks defined", label),
                    "Add at least one check (e.g., pii, toxicity) to the guardrail",
                );
            }
        }
        NodeSpec::HumanGate(spec) => {
            if spec.approval_options.is_empty() {
                rule.warning(
                    Category::AgentValidation,
                    format!("Human gate \"{}\" has no approval options", label),
                    "Add approval options (e.g., Approve, Reject) for the reviewer",
                );
            }
        }

        // -- Orchestration ----------------------------------------------------
        NodeSpec::Orchestrator(spec) => {
            if spec.agents.len() < MIN_ORCHESTRATOR_AGENTS {
                rule.error(
                    Category::OrchestrationValidation,
                    format!("Orchestrator \"{}\" must have at least 2 agents", label),
                    "Add agents to the orchestrator in the spec panel",
                );
            }
            if spec.strategy.is_none() {
                rule.error(
                    Category::OrchestrationValidation,
                    format!("Orchestrator \"{}\" must have a strategy defined", label),
                    "Set the strategy (supervisor, round_robin, broadcast, or consensus)",
                );
            }
        }
        NodeSpec::SmartRouter(spec) => {
            if spec.rules.is_empty() && !spec.llm_routing_enabled() {
                rule.error(
                    Category::OrchestrationValidation,
                    format!("Smart router \"{}\" has no rules defined", label),
                    "Add routing rules or enable LLM routing",
                );
            }
        }
        NodeSpec::Handoff(spec) => {
            let target_flow = spec.target.as_ref().and_then(|t| t.flow.clone());
            if is_blank(&target_flow) {
                rule.error(
                    Category::OrchestrationValidation,
                    format!("Handoff \"{}\" must have a target flow", label),
                    "Set the target flow in the spec panel",
                );
            }
        }
        NodeSpec::AgentGroup(spec) => {
            if spec.members.len() < MIN_GROUP_MEMBERS {
                rule.error(
                    Category::OrchestrationValidation,
                    format!("Agent group \"{}\" must have at least 2 members", label),
                    "Add members to the agent group in the spec panel",
                );
            }
        }

        // -- Integration ------------------------------------------------------
        NodeSpec::DataStore(spec) => {
            if spec.operation.is_none() {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Data store \"{}\" must have an operation set", label),
                    "Set the operation (create, read, update, or delete)",
                );
            }
            if is_blank(&spec.model) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Data store \"{}\" must have a model defined", label),
                    "Set the model name (e.g., User, Order)",
                );
            }
        }
        NodeSpec::ServiceCall(spec) => {
            if spec.method.is_none() {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Service call \"{}\" must have a method set", label),
                    "Set the HTTP method (GET, POST, PUT, PATCH, DELETE)",
                );
            }
            if is_blank(&spec.url) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Service call \"{}\" must have a URL defined", label),
                    "Set the service URL",
                );
            }
        }
        NodeSpec::Event(spec) => {
            if spec.direction.is_none() {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Event \"{}\" must have a direction set", label),
                    "Set the direction (emit or consume)",
                );
            }
            if is_blank(&spec.event_name) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Event \"{}\" must have an event name defined", label),
                    "Set the event name",
                );
            }
        }
        NodeSpec::Loop(spec) => {
            if is_blank(&spec.collection) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Loop \"{}\" must have a collection defined", label),
                    "Set the collection to iterate over",
                );
            }
            if is_blank(&spec.iterator) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Loop \"{}\" must have an iterator variable defined", label),
                    "Set the iterator variable name",
                );
            }
        }
        NodeSpec::Parallel(spec) => {
            if spec.branches.len() < MIN_PARALLEL_BRANCHES {
                rule.error(
                    Category::SpecCompleteness,
                    format!("Parallel \"{}\" must have at least 2 branches", label),
                    "Add at least 2 branches to the parallel node",
                );
            }
            if spec.join == Some(JoinMode::NOf) && spec.join_count.unwrap_or(0) < 1 {
                rule.error(
                    Category::SpecCompleteness,
                    format!(
                        "Parallel \"{}\" uses n_of join but join_count is not set",
                        label
                    ),
                    "Set join_count to specify how many branches must complete",
                );
            }
        }
        NodeSpec::SubFlow(spec) => match spec.flow_ref.as_deref().map(str::trim) {
            None | Some("") => rule.error(
                Category::SpecCompleteness,
                format!("Sub-flow \"{}\" must have a flow reference defined", label),
                "Set the flow_ref (e.g., domain/flow-id)",
            ),
            Some(flow_ref) if !flow_ref.contains('/') => rule.warning(
                Category::SpecCompleteness,
                format!(
                    "Sub-flow \"{}\" flow_ref should be in domain/flow-id format",
                    label
                ),
                "Use the format domain/flow-id for the flow reference",
            ),
            Some(_) => {}
        },
        NodeSpec::LlmCall(spec) => {
            if is_blank(&spec.model) {
                rule.error(
                    Category::SpecCompleteness,
                    format!("LLM call \"{}\" must have a model specified", label),
                    "Set the model (e.g., claude-sonnet, gpt-4o)",
                );
            }
            if is_blank(&spec.prompt_template) {
                rule.warning(
                    Category::SpecCompleteness,
                    format!("LLM call \"{}\" has no prompt template defined", label),
                    "Set the prompt template with {{variables}} for dynamic content",
                );
            }
        }
    }
}

/// Absent, empty and whitespace-only strings all count as unset.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

struct Rule<'a> {
    node_id: &'a str,
    issues: &'a mut Vec<ValidationIssue>,
}

impl Rule<'_> {
    fn error(&mut self, category: Category, message: String, suggestion: &str) {
        self.push(Severity::Error, category, message, suggestion);
    }

    fn warning(&mut self, category: Category, message: String, suggestion: &str) {
        self.push(Severity::Warning, category, message, suggestion);
    }

    fn push(&mut self, severity: Severity, category: Category, message: String, suggestion: &str) {
        self.issues.push(
            ValidationIssue::flow(severity, category, message)
                .on_node(self.node_id)
                .suggest(suggestion),
        );
    }
}
