//! Registry of the agents served by this process

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, error};

use crate::protocol::A2AError;

use super::descriptor::{strip_scheme, AgentDescriptor};

/// Mapping from agent identifier to descriptor
///
/// Built once before the server accepts traffic and read-only afterwards.
/// Registration order is preserved so that fallback selection is
/// deterministic.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: Vec<Arc<AgentDescriptor>>,
    by_route_key: HashMap<String, usize>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from descriptors, failing on the first duplicate
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = AgentDescriptor>,
    ) -> Result<Self, A2AError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Add an agent
    ///
    /// Two identifiers that differ only by scheme prefix address the same URL
    /// path and are treated as duplicates.
    pub fn register(&mut self, descriptor: AgentDescriptor) -> Result<(), A2AError> {
        let key = descriptor.route_key().to_string();
        if key.is_empty() {
            return Err(A2AError::Configuration(format!(
                "agent identifier {:?} is empty once its scheme is removed",
                descriptor.id
            )));
        }

        if self.by_route_key.contains_key(&key) {
            error!(agent_id = %descriptor.id, "Rejecting duplicate agent registration");
            return Err(A2AError::DuplicateAgent {
                agent_id: descriptor.id,
            });
        }

        debug!(agent_id = %descriptor.id, name = %descriptor.name, "Registered agent");
        self.by_route_key.insert(key, self.agents.len());
        self.agents.push(Arc::new(descriptor));
        Ok(())
    }

    /// Look up an agent by identifier, with or without its scheme prefix
    pub fn resolve(&self, identifier: &str) -> Result<Arc<AgentDescriptor>, A2AError> {
        self.by_route_key
            .get(strip_scheme(identifier))
            .map(|&index| Arc::clone(&self.agents[index]))
            .ok_or_else(|| A2AError::agent_not_found(identifier))
    }

    /// All agents in registration order
    pub fn all(&self) -> &[Arc<AgentDescriptor>] {
        &self.agents
    }

    /// The first registered agent
    pub fn first(&self) -> Option<&Arc<AgentDescriptor>> {
        self.agents.first()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        agent::handler_fn,
        protocol::{AgentError, Message},
    };

    use super::*;

    fn agent(id: &str) -> AgentDescriptor {
        AgentDescriptor::new(
            id,
            format!("Agent {}", id),
            handler_fn(|_m: Message, _ctx| async move { Ok::<_, AgentError>(Message::agent("ok")) }),
        )
    }

    #[test]
    fn test_resolve_with_and_without_scheme() {
        let registry = AgentRegistry::from_descriptors([agent("agent://echo")]).unwrap();

        assert_eq!(registry.resolve("agent://echo").unwrap().id, "agent://echo");
        assert_eq!(registry.resolve("echo").unwrap().id, "agent://echo");
        assert!(matches!(
            registry.resolve("agent://missing"),
            Err(A2AError::AgentNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = AgentRegistry::new();
        registry.register(agent("agent://echo")).unwrap();

        let err = registry.register(agent("agent://echo")).unwrap_err();
        assert!(matches!(err, A2AError::DuplicateAgent { ref agent_id } if agent_id == "agent://echo"));

        // Same path segment under another scheme
        assert!(registry.register(agent("echo")).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let registry =
            AgentRegistry::from_descriptors([agent("agent://b"), agent("agent://a"), agent("c")])
                .unwrap();

        let ids: Vec<&str> = registry.all().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["agent://b", "agent://a", "c"]);
        assert_eq!(registry.first().unwrap().id, "agent://b");
    }

    #[test]
    fn test_empty_route_key_is_rejected() {
        let mut registry = AgentRegistry::new();
        assert!(matches!(
            registry.register(agent("agent://")),
            Err(A2AError::Configuration(_))
        ));
        assert!(registry.is_empty());
    }
}
