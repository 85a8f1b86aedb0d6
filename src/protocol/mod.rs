//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentAuthentication, AgentCapabilities, AgentCard, AgentProvider, AgentSkill};
pub use error::{A2AError, A2AResult, AgentError};
pub use message::{FileContent, Message, Part, Role};
pub use operation::{A2AOperation, TaskIdParams, TaskQueryParams, TaskSendParams};
pub use task::{Task, TaskState, TaskStatus};

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier of the Artifact
    pub artifact_id: String,

    /// A human readable name for the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A human readable description of the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Contents of the Artifact. Must contain at least one part
    pub parts: Vec<Part>,

    /// Position of the artifact in the task's artifact list
    #[serde(default)]
    pub index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Artifact {
    /// Derive the artifact for an agent reply
    ///
    /// The reply's textual content becomes a single text part. A reply with no
    /// text keeps its own parts.
    pub fn from_reply(reply: &Message) -> Self {
        let parts = match reply.text() {
            Some(text) => vec![Part::text(text)],
            None => reply.parts.clone(),
        };

        Self {
            artifact_id: Uuid::now_v7().to_string(),
            name: Some("response".to_string()),
            description: None,
            parts,
            index: 0,
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_artifact_wraps_reply_text() {
        let reply = Message::agent("Hello").with_part(Part::text("world"));
        let artifact = Artifact::from_reply(&reply);

        assert_eq!(artifact.parts, vec![Part::text("Hello\nworld")]);
        assert_eq!(artifact.index, 0);

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["parts"][0]["type"], "text");
        assert!(json["artifactId"].is_string());
    }

    #[test]
    fn test_artifact_keeps_non_text_reply_parts() {
        let mut data = Map::new();
        data.insert("answer".into(), json!(42));
        let reply = Message::builder()
            .role(Role::Agent)
            .part(Part::data(data))
            .build();

        let artifact = Artifact::from_reply(&reply);
        assert_eq!(artifact.parts[0].kind(), "data");
    }
}
