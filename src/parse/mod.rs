//! Parse phase: JSON → document types + graph construction.

pub mod domain;
pub mod graph;
pub mod types;

pub use domain::*;
pub use graph::FlowGraph;
pub use types::*;

use crate::error::ParseError;

/// Deserialize a flow document. A node whose spec does not fit its kind fails
/// the whole document with `P003`; the message names the node.
pub fn parse_flow(json: &str) -> Result<FlowDocument, ParseError> {
    types::decode_flow(json)
}

/// Deserialize a single node, as sent by the spec panel.
pub fn parse_node(json: &str) -> Result<FlowNode, ParseError> {
    let value = serde_json::from_str::<serde_json::Value>(json).map_err(ParseError::Flow)?;
    types::decode_node(value)
}

pub fn parse_domain(json: &str) -> Result<DomainDocument, ParseError> {
    serde_json::from_str::<DomainDocument>(json).map_err(ParseError::Domain)
}

/// Deserialize a `{ domainId: DomainDocument }` map.
pub fn parse_domain_registry(json: &str) -> Result<DomainRegistry, ParseError> {
    serde_json::from_str::<DomainRegistry>(json).map_err(ParseError::Domain)
}
