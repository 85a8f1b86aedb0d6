//! Request routing: which registered agent an inbound request targets
//!
//! Resolution precedence for RPC calls, first match wins:
//!
//! 1. an explicit agent identifier supplied by the caller (the
//!    [`AGENT_HEADER`] header, else the URL path), with or without scheme;
//! 2. the first registered agent, when fallback routing is enabled.
//!
//! An explicit identifier that matches nothing is an error; it is never
//! rerouted to another agent.

use std::sync::Arc;

use tracing::debug;

use crate::{
    agent::{AgentDescriptor, AgentRegistry},
    protocol::A2AError,
};

/// Header naming the target agent of an RPC call
pub const AGENT_HEADER: &str = "x-a2a-agent";

/// Well-known discovery document path, relative to an agent's path
pub const AGENT_CARD_PATH: &str = ".well-known/agent.json";

/// Resolves inbound requests to agent descriptors
#[derive(Debug, Clone)]
pub struct AgentRouter {
    registry: Arc<AgentRegistry>,
    fallback_to_first: bool,
}

impl AgentRouter {
    pub fn new(registry: Arc<AgentRegistry>, fallback_to_first: bool) -> Self {
        Self {
            registry,
            fallback_to_first,
        }
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Target agent of an RPC call
    ///
    /// `header` takes precedence over `path`. Blank values count as absent.
    pub fn resolve_rpc_target(
        &self,
        header: Option<&str>,
        path: Option<&str>,
    ) -> Result<Arc<AgentDescriptor>, A2AError> {
        let explicit = header.or(path).map(str::trim).filter(|id| !id.is_empty());
        self.resolve(explicit)
    }

    /// Target agent of a discovery request
    ///
    /// `request_path` is the full request path; `None` is returned for paths
    /// that are not discovery paths at all.
    pub fn resolve_discovery(
        &self,
        request_path: &str,
    ) -> Option<Result<Arc<AgentDescriptor>, A2AError>> {
        let agent_path = discovery_agent_path(request_path)?;
        let explicit = Some(agent_path).filter(|p| !p.is_empty());
        Some(self.resolve(explicit))
    }

    fn resolve(&self, explicit: Option<&str>) -> Result<Arc<AgentDescriptor>, A2AError> {
        if self.registry.is_empty() {
            return Err(A2AError::NoAgentsAvailable);
        }

        match explicit {
            Some(identifier) => self.registry.resolve(identifier),
            None if self.fallback_to_first => {
                let agent = self
                    .registry
                    .first()
                    .cloned()
                    .ok_or(A2AError::NoAgentsAvailable)?;
                debug!(agent_id = %agent.id, "No agent addressed, using first registered agent");
                Ok(agent)
            }
            None => Err(A2AError::agent_not_found("<unspecified>")),
        }
    }
}

/// Agent path of a discovery request path, `""` for the root document
///
/// `/echo/.well-known/agent.json` yields `echo`; `/.well-known/agent.json`
/// yields the empty string; any other path yields `None`.
pub fn discovery_agent_path(request_path: &str) -> Option<&str> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed == AGENT_CARD_PATH {
        return Some("");
    }
    trimmed
        .strip_suffix(AGENT_CARD_PATH)
        .and_then(|rest| rest.strip_suffix('/'))
        .map(|rest| rest.trim_matches('/'))
}
