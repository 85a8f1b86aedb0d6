//! Discovery document generation

use url::Url;

use crate::protocol::{AgentAuthentication, AgentCard};

use super::descriptor::AgentDescriptor;

/// Version advertised when a descriptor does not declare one
pub const DEFAULT_AGENT_VERSION: &str = "1.0.0";

/// Modality advertised when a descriptor does not declare any
pub const DEFAULT_MODE: &str = "text";

/// Build the agent card for `descriptor` as served under `base_url`
///
/// Side-effect free; cheap enough to run on every discovery request.
pub fn generate_card(descriptor: &AgentDescriptor, base_url: &Url) -> AgentCard {
    let default_modes = || vec![DEFAULT_MODE.to_string()];

    AgentCard {
        name: descriptor.name.clone(),
        description: descriptor.description.clone(),
        url: agent_url(base_url, descriptor),
        provider: descriptor.provider.clone(),
        version: descriptor
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_AGENT_VERSION.to_string()),
        documentation_url: descriptor.documentation_url.clone(),
        capabilities: descriptor.capabilities,
        authentication: descriptor
            .authentication_schemes
            .clone()
            .map(AgentAuthentication::schemes),
        default_input_modes: descriptor
            .default_input_modes
            .clone()
            .unwrap_or_else(default_modes),
        default_output_modes: descriptor
            .default_output_modes
            .clone()
            .unwrap_or_else(default_modes),
        skills: descriptor.skills.clone(),
    }
}

/// `{base}/{identifier-without-scheme}`
pub fn agent_url(base_url: &Url, descriptor: &AgentDescriptor) -> String {
    format!(
        "{}/{}",
        base_url.as_str().trim_end_matches('/'),
        descriptor.route_key()
    )
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{
        agent::handler_fn,
        protocol::{AgentCapabilities, AgentError, AgentProvider, AgentSkill, Message},
    };

    use super::*;

    fn descriptor(id: &str) -> AgentDescriptor {
        AgentDescriptor::new(
            id,
            "Echo",
            handler_fn(|m: Message, _ctx| async move { Ok::<_, AgentError>(m) }),
        )
    }

    fn base() -> Url {
        Url::parse("https://agents.example.com").unwrap()
    }

    #[test]
    fn test_minimal_card_defaults() {
        let card = generate_card(&descriptor("agent://echo"), &base());

        assert_eq!(card.name, "Echo");
        assert_eq!(card.url, "https://agents.example.com/echo");
        assert_eq!(card.version, "1.0.0");
        assert_eq!(card.default_input_modes, vec!["text"]);
        assert_eq!(card.default_output_modes, vec!["text"]);
        assert!(card.skills.is_empty());

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["description"], Value::Null);
        assert_eq!(json["provider"], Value::Null);
        assert_eq!(json["authentication"], Value::Null);
        for key in ["streaming", "pushNotifications", "stateTransitionHistory"] {
            assert_eq!(json["capabilities"][key], false, "{key}");
        }
        assert!(json["skills"].is_array());
    }

    #[test]
    fn test_full_card() {
        let descriptor = descriptor("agent://research")
            .with_description("Deep research")
            .with_version("3.0.0")
            .with_provider(AgentProvider::new("Datathreads").with_url("https://datathreads.ai"))
            .with_documentation_url("https://docs.example.com/research")
            .with_capabilities(AgentCapabilities::new().with_streaming())
            .with_input_modes(vec!["text".into(), "data".into()])
            .with_skill(AgentSkill::new("summarize", "Summarize").with_example("tl;dr this"))
            .with_authentication(vec!["bearer".into()]);

        let card = generate_card(&descriptor, &base());
        assert_eq!(card.version, "3.0.0");
        assert!(card.capabilities.streaming);
        assert_eq!(card.default_input_modes, vec!["text", "data"]);
        assert_eq!(card.default_output_modes, vec!["text"]);
        assert_eq!(card.skills[0].examples, vec!["tl;dr this"]);

        let auth = card.authentication.unwrap();
        assert_eq!(auth.schemes, vec!["bearer"]);
        assert!(auth.credentials.is_none());
    }

    #[test]
    fn test_url_with_base_path() {
        let base = Url::parse("https://example.com/a2a/").unwrap();
        assert_eq!(
            agent_url(&base, &descriptor("echo")),
            "https://example.com/a2a/echo"
        );
    }
}
