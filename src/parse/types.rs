//! Rust types for flow documents.
//!
//! These are the serde targets for the editor's flow JSON. Each node kind owns
//! a typed spec struct; fields the editor adds on top (custom properties) are
//! kept in the struct's `extra` map so they survive a round trip.

use std::collections::BTreeMap;

use serde::de::value::StrDeserializer;
use serde::de::{Deserializer, IntoDeserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ParseError;

pub type Extra = BTreeMap<String, Value>;

// =============================================================================
// FLOW DOCUMENT
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FlowDocument {
    pub flow: FlowHeader,
    /// Always present in documents produced by the editor. Kept optional so a
    /// document without one is reported by validation instead of failing here.
    pub trigger: Option<FlowNode>,
    pub nodes: Vec<FlowNode>,
    pub metadata: FlowMetadata,
}

/// Wire shape of a flow document. Nodes stay as raw JSON until
/// [`decode_node`] has seen each one.
#[derive(Deserialize)]
struct RawFlowDocument {
    flow: FlowHeader,
    #[serde(default)]
    trigger: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    nodes: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    metadata: FlowMetadata,
}

/// Decode a flow document. A node whose spec does not fit its kind is a
/// [`ParseError::NodeSpec`], anything else malformed is [`ParseError::Flow`].
pub(crate) fn decode_flow(json: &str) -> Result<FlowDocument, ParseError> {
    let raw: RawFlowDocument = serde_json::from_str(json).map_err(ParseError::Flow)?;
    let trigger = raw.trigger.map(decode_node).transpose()?;
    let nodes = raw
        .nodes
        .into_iter()
        .map(decode_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FlowDocument {
        flow: raw.flow,
        trigger,
        nodes,
        metadata: raw.metadata,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowHeader {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: FlowKind,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    #[default]
    Traditional,
    Agent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub modified: String,
}

impl FlowDocument {
    /// The document the editor creates when a flow is opened for the first
    /// time: a trigger with an empty spec, plus a pre-wired agent loop for
    /// agent flows.
    pub fn new_default(domain: &str, id: &str, name: &str, kind: FlowKind) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let mut trigger = FlowNode::new(
            short_id(NodeKind::Trigger),
            NodeKind::Trigger.default_label(),
            NodeSpec::default_for(NodeKind::Trigger),
        );
        trigger.position = Position { x: 250.0, y: 50.0 };

        let mut nodes = Vec::new();
        if kind == FlowKind::Agent {
            let mut agent = FlowNode::new(
                short_id(NodeKind::AgentLoop),
                NodeKind::AgentLoop.default_label(),
                NodeSpec::default_for(NodeKind::AgentLoop),
            );
            agent.position = Position { x: 200.0, y: 200.0 };
            trigger.connections.push(Connection::to(&agent.id));
            nodes.push(agent);
        }

        FlowDocument {
            flow: FlowHeader {
                id: id.into(),
                name: name.into(),
                kind,
                domain: domain.into(),
                description: None,
            },
            trigger: Some(trigger),
            nodes,
            metadata: FlowMetadata {
                created: now.clone(),
                modified: now,
            },
        }
    }

    /// Key used for flow-scope results: `domain/flow`.
    pub fn target_id(&self) -> String {
        format!("{}/{}", self.flow.domain, self.flow.id)
    }

    pub fn is_agent(&self) -> bool {
        self.flow.kind == FlowKind::Agent
    }

    /// Trigger first, then the node list. Connections may point at either.
    pub fn all_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.trigger.iter().chain(self.nodes.iter())
    }
}

fn short_id(kind: NodeKind) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", kind.as_str(), &uuid[..8])
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub target_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn to(target: &str) -> Self {
        Connection {
            target_node_id: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn from_handle(handle: &str, target: &str) -> Self {
        Connection {
            source_handle: Some(handle.into()),
            ..Connection::to(target)
        }
    }
}

// =============================================================================
// NODE KIND
// =============================================================================

/// Closed set of node kinds. Adding one means adding its spec variant and
/// its arm in `validate::node_rules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Trigger,
    Input,
    Process,
    Decision,
    Terminal,
    DataStore,
    ServiceCall,
    Event,
    Loop,
    Parallel,
    SubFlow,
    LlmCall,
    AgentLoop,
    Guardrail,
    HumanGate,
    Orchestrator,
    SmartRouter,
    Handoff,
    AgentGroup,
}

/// Which rule pass of flow validation owns a kind's spec checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    Spec,
    Agent,
    Orchestration,
    Integration,
    /// No spec rules; terminal only has a structural advisory.
    StructuralOnly,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Input => "input",
            NodeKind::Process => "process",
            NodeKind::Decision => "decision",
            NodeKind::Terminal => "terminal",
            NodeKind::DataStore => "data_store",
            NodeKind::ServiceCall => "service_call",
            NodeKind::Event => "event",
            NodeKind::Loop => "loop",
            NodeKind::Parallel => "parallel",
            NodeKind::SubFlow => "sub_flow",
            NodeKind::LlmCall => "llm_call",
            NodeKind::AgentLoop => "agent_loop",
            NodeKind::Guardrail => "guardrail",
            NodeKind::HumanGate => "human_gate",
            NodeKind::Orchestrator => "orchestrator",
            NodeKind::SmartRouter => "smart_router",
            NodeKind::Handoff => "handoff",
            NodeKind::AgentGroup => "agent_group",
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "Trigger",
            NodeKind::Input => "Input",
            NodeKind::Process => "Process",
            NodeKind::Decision => "Decision",
            NodeKind::Terminal => "Terminal",
            NodeKind::DataStore => "Data Store",
            NodeKind::ServiceCall => "Service Call",
            NodeKind::Event => "Event",
            NodeKind::Loop => "Loop",
            NodeKind::Parallel => "Parallel",
            NodeKind::SubFlow => "Sub-Flow",
            NodeKind::LlmCall => "LLM Call",
            NodeKind::AgentLoop => "Agent Loop",
            NodeKind::Guardrail => "Guardrail",
            NodeKind::HumanGate => "Human Gate",
            NodeKind::Orchestrator => "Orchestrator",
            NodeKind::SmartRouter => "Smart Router",
            NodeKind::Handoff => "Handoff",
            NodeKind::AgentGroup => "Agent Group",
        }
    }

    pub fn rule_group(&self) -> RuleGroup {
        match self {
            NodeKind::Trigger | NodeKind::Input | NodeKind::Process | NodeKind::Decision => {
                RuleGroup::Spec
            }
            NodeKind::AgentLoop | NodeKind::Guardrail | NodeKind::HumanGate => RuleGroup::Agent,
            NodeKind::Orchestrator
            | NodeKind::SmartRouter
            | NodeKind::Handoff
            | NodeKind::AgentGroup => RuleGroup::Orchestration,
            NodeKind::DataStore
            | NodeKind::ServiceCall
            | NodeKind::Event
            | NodeKind::Loop
            | NodeKind::Parallel
            | NodeKind::SubFlow
            | NodeKind::LlmCall => RuleGroup::Integration,
            NodeKind::Terminal => RuleGroup::StructuralOnly,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// FLOW NODE
// =============================================================================

/// A node in a flow graph. The kind is carried by the spec variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawFlowNode")]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    pub position: Position,
    pub connections: Vec<Connection>,
    pub spec: NodeSpec,
    pub parent_id: Option<String>,
    pub observability: Option<Value>,
    pub security: Option<Value>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, spec: NodeSpec) -> Self {
        FlowNode {
            id: id.into(),
            label: label.into(),
            position: Position::default(),
            connections: Vec::new(),
            spec,
            parent_id: None,
            observability: None,
            security: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.spec.kind()
    }
}

/// Wire shape of a node: the spec payload is decoded once `type` is known.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlowNode {
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default, deserialize_with = "null_as_default")]
    position: Position,
    #[serde(default, deserialize_with = "null_as_default")]
    connections: Vec<Connection>,
    #[serde(default)]
    spec: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    label: String,
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    observability: Option<Value>,
    #[serde(default)]
    security: Option<Value>,
}

/// Decode one node, keeping a spec mismatch distinct from a shape error.
pub(crate) fn decode_node(value: Value) -> Result<FlowNode, ParseError> {
    let raw: RawFlowNode = serde_json::from_value(value).map_err(ParseError::Flow)?;
    FlowNode::try_from(raw)
}

impl TryFrom<RawFlowNode> for FlowNode {
    type Error = ParseError;

    fn try_from(raw: RawFlowNode) -> Result<Self, Self::Error> {
        let spec = NodeSpec::from_value(raw.kind, raw.spec).map_err(|source| {
            ParseError::NodeSpec {
                node_id: raw.id.clone(),
                kind: raw.kind,
                source,
            }
        })?;
        Ok(FlowNode {
            id: raw.id,
            label: raw.label,
            position: raw.position,
            connections: raw.connections,
            spec,
            parent_id: raw.parent_id,
            observability: raw.observability,
            security: raw.security,
        })
    }
}

impl Serialize for FlowNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FlowNode", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("connections", &self.connections)?;
        state.serialize_field("spec", &self.spec)?;
        state.serialize_field("label", &self.label)?;
        match &self.parent_id {
            Some(parent) => state.serialize_field("parentId", parent)?,
            None => state.skip_field("parentId")?,
        }
        match &self.observability {
            Some(v) => state.serialize_field("observability", v)?,
            None => state.skip_field("observability")?,
        }
        match &self.security {
            Some(v) => state.serialize_field("security", v)?,
            None => state.skip_field("security")?,
        }
        state.end()
    }
}

// =============================================================================
// NODE SPEC: tagged by node kind
// =============================================================================

/// Serializes as the bare spec object; the kind travels in the node's `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Trigger(TriggerSpec),
    Input(InputSpec),
    Process(ProcessSpec),
    Decision(DecisionSpec),
    Terminal(TerminalSpec),
    DataStore(DataStoreSpec),
    ServiceCall(ServiceCallSpec),
    Event(EventNodeSpec),
    Loop(LoopSpec),
    Parallel(ParallelSpec),
    SubFlow(SubFlowSpec),
    LlmCall(LlmCallSpec),
    AgentLoop(AgentLoopSpec),
    Guardrail(GuardrailSpec),
    HumanGate(HumanGateSpec),
    Orchestrator(OrchestratorSpec),
    SmartRouter(SmartRouterSpec),
    Handoff(HandoffSpec),
    AgentGroup(AgentGroupSpec),
}

impl NodeSpec {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeSpec::Trigger(_) => NodeKind::Trigger,
            NodeSpec::Input(_) => NodeKind::Input,
            NodeSpec::Process(_) => NodeKind::Process,
            NodeSpec::Decision(_) => NodeKind::Decision,
            NodeSpec::Terminal(_) => NodeKind::Terminal,
            NodeSpec::DataStore(_) => NodeKind::DataStore,
            NodeSpec::ServiceCall(_) => NodeKind::ServiceCall,
            NodeSpec::Event(_) => NodeKind::Event,
            NodeSpec::Loop(_) => NodeKind::Loop,
            NodeSpec::Parallel(_) => NodeKind::Parallel,
            NodeSpec::SubFlow(_) => NodeKind::SubFlow,
            NodeSpec::LlmCall(_) => NodeKind::LlmCall,
            NodeSpec::AgentLoop(_) => NodeKind::AgentLoop,
            NodeSpec::Guardrail(_) => NodeKind::Guardrail,
            NodeSpec::HumanGate(_) => NodeKind::HumanGate,
            NodeSpec::Orchestrator(_) => NodeKind::Orchestrator,
            NodeSpec::SmartRouter(_) => NodeKind::SmartRouter,
            NodeSpec::Handoff(_) => NodeKind::Handoff,
            NodeSpec::AgentGroup(_) => NodeKind::AgentGroup,
        }
    }

    /// Decode a raw spec payload for the given kind. `null` reads as `{}`.
    pub fn from_value(kind: NodeKind, value: Value) -> Result<Self, serde_json::Error> {
        let value = match value {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        Ok(match kind {
            NodeKind::Trigger => NodeSpec::Trigger(serde_json::from_value(value)?),
            NodeKind::Input => NodeSpec::Input(serde_json::from_value(value)?),
            NodeKind::Process => NodeSpec::Process(serde_json::from_value(value)?),
            NodeKind::Decision => NodeSpec::Decision(serde_json::from_value(value)?),
            NodeKind::Terminal => NodeSpec::Terminal(serde_json::from_value(value)?),
            NodeKind::DataStore => NodeSpec::DataStore(serde_json::from_value(value)?),
            NodeKind::ServiceCall => NodeSpec::ServiceCall(serde_json::from_value(value)?),
            NodeKind::Event => NodeSpec::Event(serde_json::from_value(value)?),
            NodeKind::Loop => NodeSpec::Loop(serde_json::from_value(value)?),
            NodeKind::Parallel => NodeSpec::Parallel(serde_json::from_value(value)?),
            NodeKind::SubFlow => NodeSpec::SubFlow(serde_json::from_value(value)?),
            NodeKind::LlmCall => NodeSpec::LlmCall(serde_json::from_value(value)?),
            NodeKind::AgentLoop => NodeSpec::AgentLoop(serde_json::from_value(value)?),
            NodeKind::Guardrail => NodeSpec::Guardrail(serde_json::from_value(value)?),
            NodeKind::HumanGate => NodeSpec::HumanGate(serde_json::from_value(value)?),
            NodeKind::Orchestrator => NodeSpec::Orchestrator(serde_json::from_value(value)?),
            NodeKind::SmartRouter => NodeSpec::SmartRouter(serde_json::from_value(value)?),
            NodeKind::Handoff => NodeSpec::Handoff(serde_json::from_value(value)?),
            NodeKind::AgentGroup => NodeSpec::AgentGroup(serde_json::from_value(value)?),
        })
    }

    /// Editor defaults for a freshly placed node.
    pub fn default_for(kind: NodeKind) -> Self {
        let blank = || Some(String::new());
        match kind {
            NodeKind::Trigger => NodeSpec::Trigger(TriggerSpec {
                event: blank(),
                source: blank(),
                description: blank(),
                ..Default::default()
            }),
            NodeKind::Input => NodeSpec::Input(InputSpec {
                validation: blank(),
                description: blank(),
                ..Default::default()
            }),
            NodeKind::Process => NodeSpec::Process(ProcessSpec {
                action: blank(),
                service: blank(),
                description: blank(),
                ..Default::default()
            }),
            NodeKind::Decision => NodeSpec::Decision(DecisionSpec {
                condition: blank(),
                true_label: Some("Yes".into()),
                false_label: Some("No".into()),
                description: blank(),
                ..Default::default()
            }),
            NodeKind::Terminal => NodeSpec::Terminal(TerminalSpec {
                outcome: blank(),
                description: blank(),
                ..Default::default()
            }),
            NodeKind::DataStore => NodeSpec::DataStore(DataStoreSpec::default()),
            NodeKind::ServiceCall => NodeSpec::ServiceCall(ServiceCallSpec::default()),
            NodeKind::Event => NodeSpec::Event(EventNodeSpec::default()),
            NodeKind::Loop => NodeSpec::Loop(LoopSpec::default()),
            NodeKind::Parallel => NodeSpec::Parallel(ParallelSpec::default()),
            NodeKind::SubFlow => NodeSpec::SubFlow(SubFlowSpec::default()),
            NodeKind::LlmCall => NodeSpec::LlmCall(LlmCallSpec {
                model: Some("claude-sonnet".into()),
                system_prompt: blank(),
                prompt_template: blank(),
                temperature: Some(0.7),
                max_tokens: Some(4096),
                retry: Some(RetryPolicy {
                    max_attempts: Some(3),
                    backoff_ms: Some(1000),
                }),
                description: blank(),
                ..Default::default()
            }),
            NodeKind::AgentLoop => NodeSpec::AgentLoop(AgentLoopSpec {
                model: Some("claude-sonnet".into()),
                system_prompt: blank(),
                max_iterations: Some(10),
                temperature: Some(0.7),
                on_max_iterations: Some(OnMaxIterations::Respond),
                ..Default::default()
            }),
            NodeKind::Guardrail => NodeSpec::Guardrail(GuardrailSpec {
                position: Some(GuardrailPosition::Input),
                on_block: Some("reject".into()),
                ..Default::default()
            }),
            NodeKind::HumanGate => NodeSpec::HumanGate(HumanGateSpec {
                approval_options: vec![
                    ApprovalOption::new("approve", "Approve"),
                    ApprovalOption::new("reject", "Reject"),
                ],
                timeout: Some(HumanGateTimeout {
                    duration: Some(3600),
                    action: Some(TimeoutAction::Escalate),
                }),
                ..Default::default()
            }),
            NodeKind::Orchestrator => NodeSpec::Orchestrator(OrchestratorSpec {
                strategy: Some(OrchestratorStrategy::Supervisor),
                model: Some("claude-sonnet".into()),
                supervisor_prompt: blank(),
                result_merge_strategy: Some(ResultMergeStrategy::LastWins),
                ..Default::default()
            }),
            NodeKind::SmartRouter => NodeSpec::SmartRouter(SmartRouterSpec {
                llm_routing: Some(LlmRouting {
                    enabled: Some(false),
                    model: Some("claude-haiku".into()),
                    routing_prompt: blank(),
                    confidence_threshold: Some(0.8),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            NodeKind::Handoff => NodeSpec::Handoff(HandoffSpec {
                mode: Some(HandoffMode::Transfer),
                ..Default::default()
            }),
            NodeKind::AgentGroup => NodeSpec::AgentGroup(AgentGroupSpec::default()),
        }
    }
}

/// Reads `null` (and absent) as the type's default. The editor writes
/// `null` for lists and flags the user has cleared.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads `""` (and absent) as `None`, otherwise decodes the string as `T`.
/// The editor writes empty strings for unset enum fields.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            let de: StrDeserializer<'_, D::Error> = s.into_deserializer();
            T::deserialize(de).map(Some)
        }
    }
}

// =============================================================================
// TRADITIONAL SPECS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<InputField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(rename = "trueLabel", default, skip_serializing_if = "Option::is_none")]
    pub true_label: Option<String>,
    #[serde(rename = "falseLabel", default, skip_serializing_if = "Option::is_none")]
    pub false_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminalSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// INTEGRATION SPECS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStoreOperation {
    Create,
    Read,
    Update,
    Delete,
    /// A tag this crate does not know yet, kept as written.
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataStoreSpec {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub operation: Option<DataStoreOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCallSpec {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDirection {
    Emit,
    Consume,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventNodeSpec {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub direction: Option<EventDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(rename = "async", default, skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    All,
    Any,
    NOf,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParallelSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub branches: Vec<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubFlowSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_mapping: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmCallSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// AGENT SPECS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_terminal: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_confirmation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    ConversationHistory,
    VectorStore,
    KeyValue,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStoreDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMaxIterations {
    Escalate,
    Respond,
    Error,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentLoopSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stop_conditions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: Vec<ToolDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memory: Vec<MemoryStoreDefinition>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub on_max_iterations: Option<OnMaxIterations>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailPosition {
    Input,
    Output,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailAction {
    Block,
    Warn,
    Log,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailCheck {
    #[serde(rename = "type")]
    pub check_type: String,
    pub action: GuardrailAction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardrailSpec {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub position: Option<GuardrailPosition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checks: Vec<GuardrailCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_block: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApprovalOption {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_input: bool,
}

impl ApprovalOption {
    pub fn new(id: &str, label: &str) -> Self {
        ApprovalOption {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutAction {
    Escalate,
    AutoApprove,
    AutoReject,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanGateTimeout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub action: Option<TimeoutAction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanGateSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notification_channels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub approval_options: Vec<ApprovalOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<HumanGateTimeout>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub context_for_human: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// =============================================================================
// ORCHESTRATION SPECS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorStrategy {
    Supervisor,
    RoundRobin,
    Broadcast,
    Consensus,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMergeStrategy {
    LastWins,
    BestOf,
    Combine,
    SupervisorPicks,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorAgent {
    pub id: String,
    pub flow: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryAccess {
    ReadWrite,
    ReadOnly,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedMemoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub memory_type: String,
    pub access: MemoryAccess,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorSpec {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub strategy: Option<OrchestratorStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor_prompt: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agents: Vec<OrchestratorAgent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fallback_chain: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_memory: Vec<SharedMemoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervision: Option<Value>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub result_merge_strategy: Option<ResultMergeStrategy>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartRouterRule {
    pub id: String,
    pub condition: String,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRouting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartRouterSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<SmartRouterRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_routing: Option<LlmRouting>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fallback_chain: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SmartRouterSpec {
    pub fn llm_routing_enabled(&self) -> bool {
        self.llm_routing
            .as_ref()
            .and_then(|r| r.enabled)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffMode {
    Transfer,
    Consult,
    Collaborate,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandoffTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandoffSpec {
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub mode: Option<HandoffMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<HandoffTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_transfer: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_complete: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_failure: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_customer: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentGroupMember {
    pub flow: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentGroupSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<AgentGroupMember>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared_memory: Vec<SharedMemoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordination: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}
