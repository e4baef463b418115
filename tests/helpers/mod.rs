#![allow(dead_code)]

use flow_validator::parse::*;
use serde_json::{Value, json};

// =============================================================================
// Flow builders
// =============================================================================

/// A flow in domain `orders` with only a trigger (`t1`, event set).
pub fn flow(kind: FlowKind) -> FlowDocument {
    let mut doc = FlowDocument::new_default("orders", "checkout", "Checkout", kind);
    doc.nodes.clear();
    doc.trigger = Some(node(
        "t1",
        NodeKind::Trigger,
        json!({ "event": "HTTP POST /checkout" }),
    ));
    doc
}

/// A node labelled with its id, spec decoded from JSON.
pub fn node(id: &str, kind: NodeKind, spec: Value) -> FlowNode {
    let spec = NodeSpec::from_value(kind, spec).expect("test spec should decode");
    FlowNode::new(id, id, spec)
}

pub fn terminal(id: &str) -> FlowNode {
    node(id, NodeKind::Terminal, json!({ "outcome": "done" }))
}

pub fn process(id: &str) -> FlowNode {
    node(id, NodeKind::Process, json!({ "action": "Do the work" }))
}

pub fn decision(id: &str) -> FlowNode {
    node(id, NodeKind::Decision, json!({ "condition": "amount > 100" }))
}

pub fn tool(id: &str, is_terminal: bool) -> Value {
    json!({ "id": id, "name": id, "is_terminal": is_terminal })
}

pub fn agent_loop(id: &str, tools: Vec<Value>) -> FlowNode {
    node(
        id,
        NodeKind::AgentLoop,
        json!({ "model": "claude-sonnet", "max_iterations": 10, "tools": tools }),
    )
}

pub fn add(doc: &mut FlowDocument, node: FlowNode) {
    doc.nodes.push(node);
}

pub fn node_mut<'a>(doc: &'a mut FlowDocument, id: &str) -> &'a mut FlowNode {
    doc.trigger
        .iter_mut()
        .chain(doc.nodes.iter_mut())
        .find(|n| n.id == id)
        .unwrap_or_else(|| panic!("no node {id}"))
}

pub fn connect(doc: &mut FlowDocument, from: &str, to: &str) {
    node_mut(doc, from).connections.push(Connection::to(to));
}

pub fn connect_handle(doc: &mut FlowDocument, from: &str, handle: &str, to: &str) {
    node_mut(doc, from)
        .connections
        .push(Connection::from_handle(handle, to));
}

/// Trigger → `node` → terminal `end`.
pub fn wrapped(node: FlowNode) -> FlowDocument {
    let id = node.id.clone();
    let mut doc = flow(FlowKind::Traditional);
    add(&mut doc, node);
    add(&mut doc, terminal("end"));
    connect(&mut doc, "t1", &id);
    connect(&mut doc, &id, "end");
    doc
}

// =============================================================================
// Domain builders
// =============================================================================

pub fn domain(name: &str, publishes: &[&str], consumes: &[&str]) -> DomainDocument {
    let mut doc = DomainDocument::new(name);
    doc.publishes_events = publishes.iter().map(|e| EventWiring::named(e)).collect();
    doc.consumes_events = consumes.iter().map(|e| EventWiring::named(e)).collect();
    doc
}

pub fn registry<const N: usize>(entries: [(&str, DomainDocument); N]) -> DomainRegistry {
    entries
        .into_iter()
        .map(|(id, doc)| (id.to_string(), doc))
        .collect()
}

pub fn flow_entry(id: &str) -> DomainFlowEntry {
    DomainFlowEntry {
        id: id.into(),
        name: id.into(),
        description: None,
        kind: None,
    }
}
