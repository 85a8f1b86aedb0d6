//! Agent discovery and capability types

use serde::{Deserialize, Serialize};

/// Agent Card for agent discovery
///
/// The Agent Card is published at `/.well-known/agent.json` (and under each
/// agent's own path) and describes the agent's identity, capabilities, skills
/// and advertised authentication schemes. Optional descriptive fields are
/// serialized as `null` rather than omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Name of the agent
    pub name: String,

    /// Human-readable description of the agent
    pub description: Option<String>,

    /// Absolute URL at which the agent is served
    pub url: String,

    /// Organization providing the agent
    pub provider: Option<AgentProvider>,

    /// Agent version
    pub version: String,

    /// URL to agent documentation
    pub documentation_url: Option<String>,

    /// Agent capabilities
    pub capabilities: AgentCapabilities,

    /// Advertised authentication schemes
    pub authentication: Option<AgentAuthentication>,

    /// Input modalities accepted by default
    pub default_input_modes: Vec<String>,

    /// Output modalities produced by default
    pub default_output_modes: Vec<String>,

    /// Skills the agent offers
    pub skills: Vec<AgentSkill>,
}

/// Organization providing an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentProvider {
    pub organization: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl AgentProvider {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Agent capabilities
///
/// All three flags are always present on the wire. They are advertised only;
/// the runtime implements none of them.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Supports streaming responses
    #[serde(default)]
    pub streaming: bool,

    /// Supports push notifications via webhooks
    #[serde(default)]
    pub push_notifications: bool,

    /// Records state transition history
    #[serde(default)]
    pub state_transition_history: bool,
}

impl AgentCapabilities {
    /// Create capabilities with default values (all false)
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise streaming
    pub fn with_streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    /// Advertise push notifications
    pub fn with_push_notifications(mut self) -> Self {
        self.push_notifications = true;
        self
    }

    /// Advertise state transition history
    pub fn with_state_transition_history(mut self) -> Self {
        self.state_transition_history = true;
        self
    }
}

/// Authentication block of an agent card
///
/// `credentials` exists for wire compatibility and is always serialized as
/// `null`; secrets are never echoed in discovery documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentAuthentication {
    pub schemes: Vec<String>,
    pub credentials: Option<String>,
}

impl AgentAuthentication {
    /// Authentication block listing `schemes` with no credentials
    pub fn schemes(schemes: Vec<String>) -> Self {
        Self {
            schemes,
            credentials: None,
        }
    }
}

/// A skill advertised by an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_modes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_modes: Option<Vec<String>>,
}

impl AgentSkill {
    /// Create a skill with an id and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            tags: Vec::new(),
            examples: Vec::new(),
            input_modes: None,
            output_modes: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}
