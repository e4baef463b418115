//! Integration tests for the per-kind spec rules.

mod helpers;

use flow_validator::parse::{NodeKind, NodeSpec};
use flow_validator::validate::{self, Category, Severity, ValidationIssue};
use helpers::*;
use serde_json::{Value, json};

/// Issues raised against node `n1` when it sits between trigger and terminal.
fn node_issues(kind: NodeKind, spec: Value) -> Vec<ValidationIssue> {
    let result = validate::validate_flow(&wrapped(node("n1", kind, spec)));
    result
        .issues
        .into_iter()
        .filter(|i| i.node_id.as_deref() == Some("n1"))
        .collect()
}

fn messages(issues: &[ValidationIssue]) -> Vec<&str> {
    issues.iter().map(|i| i.message.as_str()).collect()
}

fn errors(issues: &[ValidationIssue]) -> Vec<&str> {
    issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.message.as_str())
        .collect()
}

#[test]
fn trigger_requires_event() {
    for spec in [json!({}), json!({ "event": "" }), json!({ "event": "   " })] {
        let mut doc = wrapped(process("p1"));
        doc.trigger = Some(node("t1", NodeKind::Trigger, spec));
        connect(&mut doc, "t1", "p1");

        let result = validate::validate_flow(&doc);
        assert_eq!(result.messages(), ["Trigger must have an event defined"]);
        assert_eq!(result.issues[0].category, Category::SpecCompleteness);
    }
}

#[test]
fn input_field_without_type_is_an_error_per_field() {
    let issues = node_issues(
        NodeKind::Input,
        json!({ "fields": [
            { "name": "email", "type": "string" },
            { "name": "age", "type": "" },
            { "name": "note" }
        ] }),
    );
    assert_eq!(
        errors(&issues),
        [
            "Input \"n1\" field \"age\" is missing a type",
            "Input \"n1\" field \"note\" is missing a type",
        ]
    );
}

#[test]
fn decision_requires_condition() {
    let mut doc = flow(flow_validator::parse::FlowKind::Traditional);
    add(&mut doc, node("n1", NodeKind::Decision, json!({})));
    add(&mut doc, terminal("end"));
    connect(&mut doc, "t1", "n1");
    connect_handle(&mut doc, "n1", "true", "end");
    connect_handle(&mut doc, "n1", "false", "end");

    let result = validate::validate_flow(&doc);
    assert_eq!(result.messages(), ["Decision \"n1\" must have a condition defined"]);
}

#[test]
fn process_without_description_or_action_warns() {
    let issues = node_issues(NodeKind::Process, json!({ "service": "billing" }));
    assert_eq!(
        messages(&issues),
        ["Process \"n1\" has no description or action defined"]
    );
    assert_eq!(issues[0].severity, Severity::Warning);

    assert!(node_issues(NodeKind::Process, json!({ "description": "Reserve stock" })).is_empty());
}

#[test]
fn data_store_requires_operation_and_model() {
    let issues = node_issues(NodeKind::DataStore, json!({ "operation": "" }));
    assert_eq!(
        errors(&issues),
        [
            "Data store \"n1\" must have an operation set",
            "Data store \"n1\" must have a model defined",
        ]
    );
    assert!(node_issues(NodeKind::DataStore, json!({ "operation": "read", "model": "Order" })).is_empty());
}

#[test]
fn service_call_requires_method_and_url() {
    let issues = node_issues(NodeKind::ServiceCall, json!({ "method": "GET" }));
    assert_eq!(errors(&issues), ["Service call \"n1\" must have a URL defined"]);

    let issues = node_issues(NodeKind::ServiceCall, json!({ "url": "https://x" }));
    assert_eq!(errors(&issues), ["Service call \"n1\" must have a method set"]);
}

#[test]
fn event_requires_direction_and_name() {
    let issues = node_issues(NodeKind::Event, json!({}));
    assert_eq!(
        errors(&issues),
        [
            "Event \"n1\" must have a direction set",
            "Event \"n1\" must have an event name defined",
        ]
    );
    assert!(
        node_issues(
            NodeKind::Event,
            json!({ "direction": "consume", "event_name": "order.placed" })
        )
        .is_empty()
    );
}

#[test]
fn loop_requires_collection_and_iterator() {
    let issues = node_issues(NodeKind::Loop, json!({ "collection": "order.items" }));
    assert_eq!(
        errors(&issues),
        ["Loop \"n1\" must have an iterator variable defined"]
    );
}

#[test]
fn parallel_with_one_branch_and_no_join_count_has_two_errors() {
    let issues = node_issues(
        NodeKind::Parallel,
        json!({ "branches": ["notify"], "join": "n_of" }),
    );
    assert_eq!(
        errors(&issues),
        [
            "Parallel \"n1\" must have at least 2 branches",
            "Parallel \"n1\" uses n_of join but join_count is not set",
        ]
    );
}

#[test]
fn parallel_join_count_only_matters_for_n_of() {
    let all = node_issues(
        NodeKind::Parallel,
        json!({ "branches": ["a", "b"], "join": "all" }),
    );
    assert!(all.is_empty());

    let zero = node_issues(
        NodeKind::Parallel,
        json!({ "branches": ["a", "b"], "join": "n_of", "join_count": 0 }),
    );
    assert_eq!(errors(&zero).len(), 1);

    let set = node_issues(
        NodeKind::Parallel,
        json!({ "branches": ["a", "b", "c"], "join": "n_of", "join_count": 2 }),
    );
    assert!(set.is_empty());
}

#[test]
fn sub_flow_reference_rules() {
    let missing = node_issues(NodeKind::SubFlow, json!({}));
    assert_eq!(
        errors(&missing),
        ["Sub-flow \"n1\" must have a flow reference defined"]
    );

    let bare = node_issues(NodeKind::SubFlow, json!({ "flow_ref": "charge" }));
    assert!(errors(&bare).is_empty());
    assert_eq!(
        messages(&bare),
        ["Sub-flow \"n1\" flow_ref should be in domain/flow-id format"]
    );

    assert!(node_issues(NodeKind::SubFlow, json!({ "flow_ref": "billing/charge" })).is_empty());
}

#[test]
fn llm_call_requires_model_and_warns_on_prompt() {
    let issues = node_issues(NodeKind::LlmCall, json!({}));
    assert_eq!(errors(&issues), ["LLM call \"n1\" must have a model specified"]);
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[1].severity, Severity::Warning);

    let ok = node_issues(
        NodeKind::LlmCall,
        json!({ "model": "claude-haiku", "prompt_template": "Summarize {{ticket}}" }),
    );
    assert!(ok.is_empty());
}

#[test]
fn orchestrator_requires_agents_and_strategy() {
    let issues = node_issues(
        NodeKind::Orchestrator,
        json!({ "agents": [{ "id": "a", "flow": "support/triage" }] }),
    );
    assert_eq!(
        errors(&issues),
        [
            "Orchestrator \"n1\" must have at least 2 agents",
            "Orchestrator \"n1\" must have a strategy defined",
        ]
    );
    assert!(issues.iter().all(|i| i.category == Category::OrchestrationValidation));
}

#[test]
fn unrecognised_strategy_still_counts_as_set() {
    let issues = node_issues(
        NodeKind::Orchestrator,
        json!({
            "agents": [
                { "id": "a", "flow": "support/triage" },
                { "id": "b", "flow": "support/refunds" }
            ],
            "strategy": "hierarchical"
        }),
    );
    assert!(errors(&issues).is_empty(), "{:?}", messages(&issues));
}

#[test]
fn smart_router_needs_rules_unless_llm_routing() {
    let issues = node_issues(
        NodeKind::SmartRouter,
        json!({ "llm_routing": { "enabled": false } }),
    );
    assert_eq!(errors(&issues), ["Smart router \"n1\" has no rules defined"]);

    let llm = node_issues(
        NodeKind::SmartRouter,
        json!({ "llm_routing": { "enabled": true } }),
    );
    assert!(llm.is_empty());

    let rules = node_issues(
        NodeKind::SmartRouter,
        json!({ "rules": [{ "id": "r1", "condition": "vip", "route": "priority" }] }),
    );
    assert!(rules.is_empty());
}

#[test]
fn handoff_requires_target_flow() {
    for spec in [json!({}), json!({ "target": { "domain": "billing" } })] {
        let issues = node_issues(NodeKind::Handoff, spec);
        assert_eq!(errors(&issues), ["Handoff \"n1\" must have a target flow"]);
    }
}

#[test]
fn agent_group_requires_two_members() {
    let issues = node_issues(
        NodeKind::AgentGroup,
        json!({ "members": [{ "flow": "support/triage" }] }),
    );
    assert_eq!(
        errors(&issues),
        ["Agent group \"n1\" must have at least 2 members"]
    );
}

#[test]
fn orchestration_rules_apply_to_traditional_flows() {
    let issues = node_issues(NodeKind::Handoff, json!({ "mode": "transfer" }));
    assert_eq!(issues.len(), 1);
}

#[test]
fn guardrail_and_human_gate_advisories() {
    let guardrail = node_issues(NodeKind::Guardrail, json!({ "position": "input" }));
    assert_eq!(messages(&guardrail), ["Guardrail \"n1\" has no checks defined"]);
    assert!(errors(&guardrail).is_empty());

    let gate = node_issues(NodeKind::HumanGate, json!({}));
    assert_eq!(messages(&gate), ["Human gate \"n1\" has no approval options"]);
    assert!(errors(&gate).is_empty());
}

#[test]
fn editor_defaults_report_what_the_user_must_fill_in() {
    let node = flow_validator::parse::FlowNode::new(
        "n1",
        "n1",
        NodeSpec::default_for(NodeKind::ServiceCall),
    );
    let result = validate::validate_flow(&wrapped(node));
    assert_eq!(result.error_count, 2, "{:?}", result.messages());
}

#[test]
fn independent_rules_are_not_deduplicated() {
    let issues = node_issues(NodeKind::Loop, json!({}));
    assert_eq!(issues.len(), 2);
    assert_ne!(issues[0].message, issues[1].message);
}
