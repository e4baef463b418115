//! Diagnostic value types shared by every validation scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Flow,
    Domain,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the implement gate.
    Error,
    Warning,
    /// Advisory. No current rule emits it.
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    GraphCompleteness,
    SpecCompleteness,
    AgentValidation,
    OrchestrationValidation,
    DomainConsistency,
    EventWiring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub id: Uuid,
    pub scope: Scope,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        scope: Scope,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            id: Uuid::new_v4(),
            scope,
            severity,
            category,
            message: message.into(),
            suggestion: None,
            node_id: None,
            flow_id: None,
            domain_id: None,
        }
    }

    pub fn flow(severity: Severity, category: Category, message: impl Into<String>) -> Self {
        Self::new(Scope::Flow, severity, category, message)
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn on_node(mut self, node_id: &str) -> Self {
        self.node_id = Some(node_id.to_string());
        self
    }

    pub fn in_domain(mut self, domain_id: &str) -> Self {
        self.domain_id = Some(domain_id.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of one validation run over one target. Results for the same
/// target replace each other; they are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub scope: Scope,
    pub target_id: String,
    pub issues: Vec<ValidationIssue>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub is_valid: bool,
    pub validated_at: DateTime<Utc>,
}

impl ValidationResult {
    pub fn new(scope: Scope, target_id: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
        let error_count = count(Severity::Error);
        let warning_count = count(Severity::Warning);
        let info_count = count(Severity::Info);

        ValidationResult {
            scope,
            target_id: target_id.into(),
            issues,
            error_count,
            warning_count,
            info_count,
            is_valid: error_count == 0,
            validated_at: Utc::now(),
        }
    }

    pub fn issues_for_node<'s, 'n>(
        &'s self,
        node_id: &'n str,
    ) -> impl Iterator<Item = &'s ValidationIssue> + use<'s, 'n> {
        self.issues
            .iter()
            .filter(move |i| i.node_id.as_deref() == Some(node_id))
    }

    pub fn issues_with_severity(
        &self,
        severity: Severity,
    ) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }
}
