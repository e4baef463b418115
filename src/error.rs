//! Errors raised while reading documents.
//!
//! Validation findings are never errors; they are `ValidationIssue`s.
//! A `ParseError` means the input did not have the document shape at all.

use thiserror::Error;

use crate::parse::types::NodeKind;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse flow document: {0}")]
    Flow(#[source] serde_json::Error),

    #[error("Failed to parse domain document: {0}")]
    Domain(#[source] serde_json::Error),

    #[error("Node '{node_id}' has an invalid {kind} spec: {source}")]
    NodeSpec {
        node_id: String,
        kind: NodeKind,
        #[source]
        source: serde_json::Error,
    },
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Flow(_) => "P001",
            ParseError::Domain(_) => "P002",
            ParseError::NodeSpec { .. } => "P003",
        }
    }
}
