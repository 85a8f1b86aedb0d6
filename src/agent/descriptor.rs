//! Agent descriptors: identity, metadata and message handler of one agent

use std::{fmt, sync::Arc};

use crate::protocol::{AgentCapabilities, AgentProvider, AgentSkill};

use super::handler::MessageHandler;

/// Immutable description of one agent
///
/// Descriptors are assembled at startup, handed to the
/// [`AgentRegistry`](super::AgentRegistry) and shared read-only afterwards.
#[derive(Clone)]
pub struct AgentDescriptor {
    /// Unique, URI-like identifier (e.g. `agent://echo`)
    pub id: String,

    /// Display name
    pub name: String,

    pub description: Option<String>,
    pub version: Option<String>,
    pub provider: Option<AgentProvider>,
    pub documentation_url: Option<String>,

    /// Advertised capabilities; none of them is implemented by the runtime
    pub capabilities: AgentCapabilities,

    pub default_input_modes: Option<Vec<String>>,
    pub default_output_modes: Option<Vec<String>>,
    pub skills: Vec<AgentSkill>,

    /// Advertised authentication schemes; never enforced
    pub authentication_schemes: Option<Vec<String>>,

    /// Business logic behind the agent
    pub handler: Arc<dyn MessageHandler>,
}

impl AgentDescriptor {
    /// Create a descriptor with an identifier, a display name and a handler
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        handler: impl MessageHandler,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            version: None,
            provider: None,
            documentation_url: None,
            capabilities: AgentCapabilities::default(),
            default_input_modes: None,
            default_output_modes: None,
            skills: Vec::new(),
            authentication_schemes: None,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_provider(mut self, provider: AgentProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = Some(modes);
        self
    }

    pub fn with_output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = Some(modes);
        self
    }

    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_authentication(mut self, schemes: Vec<String>) -> Self {
        self.authentication_schemes = Some(schemes);
        self
    }

    /// Identifier with any scheme prefix removed, used in URL paths
    pub fn route_key(&self) -> &str {
        strip_scheme(&self.id)
    }
}

impl fmt::Debug for AgentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("skills", &self.skills.len())
            .finish_non_exhaustive()
    }
}

/// Remove a `scheme://` prefix and surrounding slashes from an identifier
///
/// `agent://echo` and `/echo/` both become `echo`.
pub fn strip_scheme(identifier: &str) -> &str {
    let rest = match identifier.find("://") {
        Some(pos) => &identifier[pos + 3..],
        None => identifier,
    };
    rest.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use crate::{
        agent::handler_fn,
        protocol::{AgentError, Message},
    };

    use super::*;

    fn noop() -> impl MessageHandler {
        handler_fn(|_m: Message, _ctx| async move { Ok::<_, AgentError>(Message::agent("ok")) })
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("agent://echo"), "echo");
        assert_eq!(strip_scheme("echo"), "echo");
        assert_eq!(strip_scheme("/echo/"), "echo");
        assert_eq!(strip_scheme("https://agents/team/echo"), "agents/team/echo");
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = AgentDescriptor::new("agent://greeter", "Greeter", noop())
            .with_description("Says hello")
            .with_version("2.1.0")
            .with_skill(AgentSkill::new("greet", "Greet"))
            .with_authentication(vec!["bearer".into()]);

        assert_eq!(descriptor.route_key(), "greeter");
        assert_eq!(descriptor.version.as_deref(), Some("2.1.0"));
        assert_eq!(descriptor.skills.len(), 1);
        assert!(format!("{:?}", descriptor).contains("agent://greeter"));
    }
}
