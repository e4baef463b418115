//! Cached validation results and the implement gate built on them.
//!
//! The gate only reads what has been recorded. It never re-validates, so a
//! stale cache gives a stale answer; keeping it fresh is the caller's job.

use std::collections::HashMap;

use serde::Serialize;

use crate::parse::domain::DomainRegistry;
use crate::parse::types::FlowDocument;
use crate::validate::{self, Scope, ValidationIssue, ValidationResult};

/// Whether a flow may be handed to implementation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementGate<'a> {
    pub flow_validation: Option<&'a ValidationResult>,
    pub domain_validation: Option<&'a ValidationResult>,
    pub system_validation: Option<&'a ValidationResult>,
    pub error_count: usize,
    pub warning_count: usize,
    pub can_implement: bool,
    pub has_warnings: bool,
}

/// Sum the three scopes. A missing result counts as zero issues.
pub fn implement_gate<'a>(
    flow: Option<&'a ValidationResult>,
    domain: Option<&'a ValidationResult>,
    system: Option<&'a ValidationResult>,
) -> ImplementGate<'a> {
    let scopes = [flow, domain, system];
    let error_count: usize = scopes.iter().flatten().map(|r| r.error_count).sum();
    let warning_count: usize = scopes.iter().flatten().map(|r| r.warning_count).sum();

    ImplementGate {
        flow_validation: flow,
        domain_validation: domain,
        system_validation: system,
        error_count,
        warning_count,
        can_implement: error_count == 0,
        has_warnings: warning_count > 0,
    }
}

/// Most recent result per target. Recording a result replaces the previous
/// one for the same scope and target.
#[derive(Debug, Default)]
pub struct ResultCache {
    flow_results: HashMap<String, ValidationResult>,
    domain_results: HashMap<String, ValidationResult>,
    system_result: Option<ValidationResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ValidationResult) {
        match result.scope {
            Scope::Flow => {
                self.flow_results.insert(result.target_id.clone(), result);
            }
            Scope::Domain => {
                self.domain_results.insert(result.target_id.clone(), result);
            }
            Scope::System => self.system_result = Some(result),
        }
    }

    pub fn flow_result(&self, domain_id: &str, flow_id: &str) -> Option<&ValidationResult> {
        self.flow_results.get(&flow_key(domain_id, flow_id))
    }

    pub fn domain_result(&self, domain_id: &str) -> Option<&ValidationResult> {
        self.domain_results.get(domain_id)
    }

    pub fn system_result(&self) -> Option<&ValidationResult> {
        self.system_result.as_ref()
    }

    /// Issues of a cached flow result that point at `node_id`.
    pub fn node_issues(&self, flow_key: &str, node_id: &str) -> Vec<&ValidationIssue> {
        self.flow_results
            .get(flow_key)
            .map(|r| r.issues_for_node(node_id).collect())
            .unwrap_or_default()
    }

    /// Validate the flow, its domain (if registered) and the whole system,
    /// and record all three.
    pub fn validate_all(&mut self, flow: &FlowDocument, domains: &DomainRegistry) {
        self.record(validate::validate_flow(flow));
        if let Some(domain) = domains.get(&flow.flow.domain) {
            self.record(validate::validate_domain(&flow.flow.domain, domain, domains));
        }
        self.record(validate::validate_system(domains));
    }

    pub fn check_implement_gate(&self, flow_id: &str, domain_id: &str) -> ImplementGate<'_> {
        implement_gate(
            self.flow_result(domain_id, flow_id),
            self.domain_result(domain_id),
            self.system_result(),
        )
    }

    pub fn reset(&mut self) {
        self.flow_results.clear();
        self.domain_results.clear();
        self.system_result = None;
    }
}

fn flow_key(domain_id: &str, flow_id: &str) -> String {
    format!("{}/{}", domain_id, flow_id)
}
