//! Validation engine for flow graphs: flow, domain and system scopes plus
//! the implement gate that sums them.

pub mod error;
pub mod gate;
pub mod parse;
pub mod validate;
pub mod wasm;

pub use error::ParseError;
pub use gate::{ImplementGate, ResultCache, implement_gate};
pub use parse::{
    DomainDocument, DomainRegistry, FlowDocument, FlowGraph, FlowNode, NodeKind, NodeSpec,
};
pub use validate::{
    Category, Scope, Severity, ValidationIssue, ValidationResult, validate_domain, validate_flow,
    validate_system,
};
