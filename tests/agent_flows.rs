//! Integration tests for agent-flow rules.

mod helpers;

use flow_validator::parse::{self, FlowKind, NodeKind};
use flow_validator::validate::{self, Category, Severity};
use helpers::*;
use serde_json::json;

fn agent_flow(loop_node: flow_validator::parse::FlowNode) -> parse::FlowDocument {
    let id = loop_node.id.clone();
    let mut doc = flow(FlowKind::Agent);
    add(&mut doc, loop_node);
    add(&mut doc, terminal("end"));
    connect(&mut doc, "t1", &id);
    connect(&mut doc, &id, "end");
    doc
}

#[test]
fn support_agent_fixture_is_clean() {
    let flow = parse::parse_flow(include_str!("fixtures/support_agent.json")).unwrap();
    let result = validate::validate_flow(&flow);
    assert!(result.issues.is_empty(), "{:?}", result.messages());
}

#[test]
fn cleared_tool_list_has_no_tools() {
    let mut value: serde_json::Value =
        serde_json::from_str(include_str!("fixtures/support_agent.json")).unwrap();
    value["nodes"][1]["spec"]["tools"] = serde_json::Value::Null;

    let flow = parse::parse_flow(&value.to_string()).expect("null tools should parse");
    let result = validate::validate_flow(&flow);
    assert_eq!(
        result.messages(),
        ["Agent loop \"Support agent\" has no tools defined"]
    );
    assert_eq!(result.error_count, 1);
}

#[test]
fn no_terminal_tool_is_the_only_error() {
    let doc = agent_flow(agent_loop(
        "agent",
        vec![tool("search", false), tool("reply", false)],
    ));

    let result = validate::validate_flow(&doc);
    assert_eq!(result.error_count, 1, "{:?}", result.messages());
    assert_eq!(
        result.messages(),
        ["Agent loop \"agent\" has no terminal tool; the agent needs a way to finish"]
    );
    assert_eq!(result.issues[0].category, Category::AgentValidation);
    assert_eq!(result.issues[0].node_id.as_deref(), Some("agent"));
}

#[test]
fn agent_flow_without_loop_is_an_error() {
    let mut doc = flow(FlowKind::Agent);
    add(&mut doc, terminal("end"));
    connect(&mut doc, "t1", "end");

    let result = validate::validate_flow(&doc);
    assert_eq!(
        result.messages(),
        ["Agent flow must have exactly one agent_loop node"]
    );
    assert_eq!(result.issues[0].severity, Severity::Error);
}

#[test]
fn several_loops_warn_but_do_not_block() {
    let mut doc = agent_flow(agent_loop("a1", vec![tool("done", true)]));
    add(&mut doc, agent_loop("a2", vec![tool("done", true)]));
    connect(&mut doc, "t1", "a2");
    connect(&mut doc, "a2", "end");

    let result = validate::validate_flow(&doc);
    assert!(result.is_valid, "{:?}", result.messages());
    assert_eq!(
        result.messages(),
        ["Agent flow has 2 agent_loop nodes; typically only one is expected"]
    );
}

#[test]
fn loop_without_tools_is_an_error() {
    let doc = agent_flow(agent_loop("agent", vec![]));
    let result = validate::validate_flow(&doc);
    assert_eq!(result.messages(), ["Agent loop \"agent\" has no tools defined"]);
}

#[test]
fn missing_cap_and_model_are_warnings() {
    for spec in [
        json!({ "tools": [{ "id": "done", "is_terminal": true }] }),
        json!({ "tools": [{ "id": "done", "is_terminal": true }], "model": "", "max_iterations": 0 }),
    ] {
        let doc = agent_flow(node("agent", NodeKind::AgentLoop, spec));
        let result = validate::validate_flow(&doc);

        assert!(result.is_valid);
        assert_eq!(
            result.messages(),
            [
                "Agent loop \"agent\" has no max_iterations set",
                "Agent loop \"agent\" has no LLM model specified",
            ]
        );
    }
}

#[test]
fn agent_loop_in_traditional_flow_is_not_checked() {
    let doc = wrapped(agent_loop("agent", vec![]));
    let result = validate::validate_flow(&doc);
    assert!(result.is_valid, "{:?}", result.messages());
}

#[test]
fn agent_loop_can_cycle_through_tools() {
    let mut doc = agent_flow(agent_loop("agent", vec![tool("done", true)]));
    add(
        &mut doc,
        node("check", NodeKind::Guardrail, json!({ "checks": [{ "type": "pii", "action": "warn" }] })),
    );
    connect(&mut doc, "agent", "check");
    connect(&mut doc, "check", "agent");

    let result = validate::validate_flow(&doc);
    assert!(result.issues.is_empty(), "{:?}", result.messages());
}
