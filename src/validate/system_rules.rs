//! Cross-domain event wiring rules.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use super::issue::{Category, Scope, Severity, ValidationIssue};
use crate::parse::domain::DomainRegistry;

/// A lower-case letter directly followed by an upper-case one.
static CAMEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z][A-Z]").expect("static regex"));

/// Event name → domains that publish (or consume) it.
type EventIndex<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

pub fn validate_system_rules(domains: &DomainRegistry, issues: &mut Vec<ValidationIssue>) {
    let mut published: EventIndex<'_> = BTreeMap::new();
    let mut consumed: EventIndex<'_> = BTreeMap::new();

    for (domain_id, domain) in domains {
        for wiring in &domain.publishes_events {
            published
                .entry(wiring.event.as_str())
                .or_default()
                .insert(domain_id.as_str());
        }
        for wiring in &domain.consumes_events {
            consumed
                .entry(wiring.event.as_str())
                .or_default()
                .insert(domain_id.as_str());
        }
    }

    check_dangling_subscriptions(&published, &consumed, issues);
    check_unconsumed_publications(&published, &consumed, issues);
    check_event_naming(&published, &consumed, issues);
}

fn wiring_issue(severity: Severity, message: String) -> ValidationIssue {
    ValidationIssue::new(Scope::System, severity, Category::EventWiring, message)
}

fn join(domains: &BTreeSet<&str>) -> String {
    domains.iter().copied().collect::<Vec<_>>().join(", ")
}

fn check_dangling_subscriptions(
    published: &EventIndex<'_>,
    consumed: &EventIndex<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    for (event, consumers) in consumed {
        if !published.contains_key(event) {
            issues.push(
                wiring_issue(
                    Severity::Error,
                    format!(
                        "Event \"{}\" is consumed by {} but no domain publishes it",
                        event,
                        join(consumers)
                    ),
                )
                .suggest("Add this event to the publishing domain or remove the consumer"),
            );
        }
    }
}

/// A warning only: consumers outside the modelled system are plausible.
fn check_unconsumed_publications(
    published: &EventIndex<'_>,
    consumed: &EventIndex<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    for (event, publishers) in published {
        if !consumed.contains_key(event) {
            issues.push(
                wiring_issue(
                    Severity::Warning,
                    format!(
                        "Event \"{}\" is published by {} but no domain consumes it",
                        event,
                        join(publishers)
                    ),
                )
                .suggest("This event may be unused; consider adding a consumer or removing it"),
            );
        }
    }
}

/// Style lint: flags a system that mixes `domain.event.action` names with
/// camelCase names. Counts distinct names.
fn check_event_naming(
    published: &EventIndex<'_>,
    consumed: &EventIndex<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    let names: BTreeSet<&str> = published.keys().chain(consumed.keys()).copied().collect();
    if names.len() < 2 {
        return;
    }

    let dotted = names.iter().filter(|n| n.contains('.')).count();
    let camel = names
        .iter()
        .filter(|n| !n.contains('.') && CAMEL_CASE.is_match(n))
        .count();

    if dotted > 0 && camel > 0 {
        issues.push(
            wiring_issue(
                Severity::Warning,
                format!(
                    "Inconsistent event naming: {} use dot notation, {} use camelCase",
                    dotted, camel
                ),
            )
            .suggest(
                "Standardize event naming across domains (prefer dot notation: domain.event.action)",
            ),
        );
    }
}
