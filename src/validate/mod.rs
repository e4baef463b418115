//! Validation phase: flow, domain and system scopes.
//!
//! Every entry point is a pure function of the documents it is given and
//! always returns a result; incomplete documents show up as issues.

pub mod agent_rules;
pub mod domain_rules;
pub mod issue;
pub mod node_rules;
pub mod structural;
pub mod system_rules;

pub use issue::{Category, Scope, Severity, ValidationIssue, ValidationResult};

use tracing::{debug, instrument};

use crate::parse::domain::{DomainDocument, DomainRegistry};
use crate::parse::graph::FlowGraph;
use crate::parse::types::{FlowDocument, RuleGroup};

/// Validate one flow document. Target id is `domain/flow`.
#[instrument(skip_all, fields(target_id = %flow.target_id()))]
pub fn validate_flow(flow: &FlowDocument) -> ValidationResult {
    let graph = FlowGraph::build(flow);
    let mut issues = Vec::new();

    structural::validate_structural(flow, &graph, &mut issues);
    node_rules::validate_group(flow, RuleGroup::Spec, &mut issues);
    agent_rules::validate_agent_flow(flow, &mut issues);
    node_rules::validate_group(flow, RuleGroup::Agent, &mut issues);
    // Orchestration nodes are allowed in traditional flows too
    node_rules::validate_group(flow, RuleGroup::Orchestration, &mut issues);
    node_rules::validate_group(flow, RuleGroup::Integration, &mut issues);

    for issue in &mut issues {
        issue.flow_id = Some(flow.flow.id.clone());
        issue.domain_id = Some(flow.flow.domain.clone());
    }

    finish(ValidationResult::new(Scope::Flow, flow.target_id(), issues))
}

/// Validate one domain's own consistency. `_all_domains` is accepted so
/// callers need not special-case domain scope; cross-domain wiring is
/// checked by `validate_system`.
#[instrument(skip_all, fields(target_id = domain_id))]
pub fn validate_domain(
    domain_id: &str,
    domain: &DomainDocument,
    _all_domains: &DomainRegistry,
) -> ValidationResult {
    let mut issues = Vec::new();
    domain_rules::validate_domain_rules(domain_id, domain, &mut issues);

    finish(ValidationResult::new(Scope::Domain, domain_id, issues))
}

/// Validate publish/subscribe wiring across every domain.
#[instrument(skip_all, fields(target_id = "system", domains = domains.len()))]
pub fn validate_system(domains: &DomainRegistry) -> ValidationResult {
    let mut issues = Vec::new();
    system_rules::validate_system_rules(domains, &mut issues);

    finish(ValidationResult::new(Scope::System, "system", issues))
}

fn finish(result: ValidationResult) -> ValidationResult {
    debug!(
        errors = result.error_count,
        warnings = result.warning_count,
        info = result.info_count,
        "validation finished"
    );
    result
}
