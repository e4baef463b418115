//! Domain documents: the flow registry of a domain plus the events it
//! publishes to and consumes from other domains.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{FlowKind, Position, null_as_default};

/// Every domain in a project, keyed by domain id. Ordered so that
/// system-scope diagnostics come out in a stable order.
pub type DomainRegistry = BTreeMap<String, DomainDocument>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flows: Vec<DomainFlowEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publishes_events: Vec<EventWiring>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub consumes_events: Vec<EventWiring>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub layout: DomainLayout,
}

impl DomainDocument {
    pub fn new(name: &str) -> Self {
        DomainDocument {
            name: name.into(),
            description: None,
            flows: Vec::new(),
            publishes_events: Vec::new(),
            consumes_events: Vec::new(),
            layout: DomainLayout::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainFlowEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FlowKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWiring {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Publishing flow, on a `publishes_events` entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_flow: Option<String>,
    /// Handling flow, on a `consumes_events` entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handled_by_flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventWiring {
    pub fn named(event: &str) -> Self {
        EventWiring {
            event: event.into(),
            schema: None,
            from_flow: None,
            handled_by_flow: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainLayout {
    #[serde(default, deserialize_with = "null_as_default")]
    pub flows: BTreeMap<String, Position>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub portals: BTreeMap<String, Position>,
}
