//! WASM entry points for the editor.
//!
//! Every entry point takes JSON text and returns a plain JS object. Results
//! go through `serde_json::Value` first so ids and timestamps arrive as
//! strings.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::ParseError;
use crate::gate;
use crate::parse;
use crate::validate::{self, ValidationResult};

/// Validate a flow document JSON.
#[wasm_bindgen]
pub fn validate_flow(json: &str) -> JsValue {
    to_js(&validate_flow_inner(json))
}

fn validate_flow_inner(json: &str) -> Response {
    match parse::parse_flow(json) {
        Ok(flow) => Response::Validated(validate::validate_flow(&flow)),
        Err(e) => Response::from(e),
    }
}

/// Validate one domain. `registry_json` is the full `{ domainId: domain }`
/// map; an empty string means no other domains are loaded.
#[wasm_bindgen]
pub fn validate_domain(domain_id: &str, json: &str, registry_json: &str) -> JsValue {
    to_js(&validate_domain_inner(domain_id, json, registry_json))
}

fn validate_domain_inner(domain_id: &str, json: &str, registry_json: &str) -> Response {
    let domain = match parse::parse_domain(json) {
        Ok(d) => d,
        Err(e) => return Response::from(e),
    };
    let registry = match registry_or_empty(registry_json) {
        Ok(r) => r,
        Err(e) => return Response::from(e),
    };

    Response::Validated(validate::validate_domain(domain_id, &domain, &registry))
}

/// Validate event wiring across every domain in `registry_json`.
#[wasm_bindgen]
pub fn validate_system(registry_json: &str) -> JsValue {
    to_js(&validate_system_inner(registry_json))
}

fn validate_system_inner(registry_json: &str) -> Response {
    match registry_or_empty(registry_json) {
        Ok(registry) => Response::Validated(validate::validate_system(&registry)),
        Err(e) => Response::from(e),
    }
}

/// Combine three serialized `ValidationResult`s. Empty strings are absent
/// results.
#[wasm_bindgen]
pub fn check_implement_gate(flow_json: &str, domain_json: &str, system_json: &str) -> JsValue {
    match check_implement_gate_inner(flow_json, domain_json, system_json) {
        Ok(summary) => to_js(&summary),
        Err(errors) => to_js(&errors),
    }
}

fn check_implement_gate_inner(
    flow_json: &str,
    domain_json: &str,
    system_json: &str,
) -> Result<GateDto, Response> {
    let flow = optional_result(flow_json)?;
    let domain = optional_result(domain_json)?;
    let system = optional_result(system_json)?;

    let gate = gate::implement_gate(flow.as_ref(), domain.as_ref(), system.as_ref());
    Ok(GateDto {
        can_implement: gate.can_implement,
        has_warnings: gate.has_warnings,
        error_count: gate.error_count,
        warning_count: gate.warning_count,
    })
}

fn registry_or_empty(json: &str) -> Result<parse::DomainRegistry, ParseError> {
    if json.trim().is_empty() {
        return Ok(parse::DomainRegistry::new());
    }
    parse::parse_domain_registry(json)
}

fn optional_result(json: &str) -> Result<Option<ValidationResult>, Response> {
    if json.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(json).map(Some).map_err(|e| Response::Errors {
        errors: vec![ErrorDto {
            code: "P001".into(),
            message: format!("Failed to parse validation result: {}", e),
        }],
    })
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let Ok(json) = serde_json::to_value(value) else {
        return JsValue::NULL;
    };
    json.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    message: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum Response {
    #[serde(rename = "validated")]
    Validated(ValidationResult),
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl From<ParseError> for Response {
    fn from(e: ParseError) -> Self {
        Response::Errors {
            errors: vec![ErrorDto {
                code: e.code().to_string(),
                message: e.to_string(),
            }],
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct GateDto {
    can_implement: bool,
    has_warnings: bool,
    error_count: usize,
    warning_count: usize,
}
