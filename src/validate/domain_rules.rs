//! Intra-domain consistency rules.
//!
//! A domain consuming an event it does not publish is normal (the event comes
//! from another domain); dangling subscriptions are a system-scope finding.

use std::collections::HashSet;

use super::issue::{Category, Scope, Severity, ValidationIssue};
use crate::parse::domain::DomainDocument;

pub fn validate_domain_rules(
    domain_id: &str,
    domain: &DomainDocument,
    issues: &mut Vec<ValidationIssue>,
) {
    check_duplicate_flow_ids(domain_id, domain, issues);
}

/// One error per repeated occurrence, so three copies of an id yield two.
fn check_duplicate_flow_ids(
    domain_id: &str,
    domain: &DomainDocument,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = HashSet::new();
    for entry in &domain.flows {
        if !seen.insert(entry.id.as_str()) {
            issues.push(
                ValidationIssue::new(
                    Scope::Domain,
                    Severity::Error,
                    Category::DomainConsistency,
                    format!(
                        "Duplicate flow ID \"{}\" in domain \"{}\"",
                        entry.id, domain.name
                    ),
                )
                .in_domain(domain_id)
                .suggest("Rename one of the flows so every flow ID in the domain is unique"),
            );
        }
    }
}
