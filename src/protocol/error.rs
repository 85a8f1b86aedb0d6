//! Error types for A2A protocol operations

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::task::TaskState;

/// JSON-RPC error codes used on the wire
///
/// These values are a fixed interop contract and must not change.
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const TASK_NOT_FOUND: i64 = -32001;
    pub const TASK_NOT_CANCELABLE: i64 = -32002;
    pub const PUSH_NOTIFICATION_NOT_SUPPORTED: i64 = -32003;
    pub const UNSUPPORTED_OPERATION: i64 = -32004;
}

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// The request body is not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The JSON-RPC envelope is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The method name is not recognized
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    /// Method parameters are missing or malformed
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Parameters parsed but failed a protocol validation rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// No agents are registered
    #[error("No agents available")]
    NoAgentsAvailable,

    /// An explicitly addressed agent is not registered
    #[error("Agent not found: {agent_id}")]
    AgentNotFound { agent_id: String },

    /// An agent with the same identifier is already registered
    #[error("Duplicate agent identifier: {agent_id}")]
    DuplicateAgent { agent_id: String },

    /// Task not found
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Cancel requested for a task outside {submitted, working}
    #[error("Task {task_id} cannot be canceled in state {state}")]
    TaskNotCancelable { task_id: String, state: TaskState },

    /// The task lifecycle forbids the requested move
    #[error("Task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        task_id: String,
        from: TaskState,
        to: TaskState,
    },

    /// Push notifications are advertised but not implemented
    #[error("Push notification not supported")]
    PushNotificationNotSupported,

    /// A reserved operation that this runtime does not implement
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The target agent's handler reported an error or panicked
    #[error("Agent handler failed for task {task_id}: {source}")]
    Agent {
        task_id: String,
        #[source]
        source: AgentError,
    },

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Listener or socket failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl A2AError {
    /// JSON-RPC error code for this error
    ///
    /// Routing failures share the method-not-found code for wire compatibility.
    pub fn code(&self) -> i64 {
        match self {
            A2AError::Parse(_) => codes::PARSE_ERROR,
            A2AError::InvalidRequest(_) => codes::INVALID_REQUEST,
            A2AError::MethodNotFound { .. }
            | A2AError::NoAgentsAvailable
            | A2AError::AgentNotFound { .. } => codes::METHOD_NOT_FOUND,
            A2AError::InvalidParams(_) | A2AError::Validation(_) => codes::INVALID_PARAMS,
            A2AError::TaskNotFound { .. } => codes::TASK_NOT_FOUND,
            A2AError::TaskNotCancelable { .. } => codes::TASK_NOT_CANCELABLE,
            A2AError::PushNotificationNotSupported => codes::PUSH_NOTIFICATION_NOT_SUPPORTED,
            A2AError::UnsupportedOperation(_) => codes::UNSUPPORTED_OPERATION,
            A2AError::DuplicateAgent { .. }
            | A2AError::InvalidTransition { .. }
            | A2AError::Agent { .. }
            | A2AError::Configuration(_)
            | A2AError::Transport(_)
            | A2AError::Serialization(_)
            | A2AError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Diagnostic payload for the JSON-RPC `data` member
    pub fn data(&self) -> Option<Value> {
        match self {
            A2AError::Agent { task_id, source } => Some(json!({
                "taskId": task_id,
                "code": source.code,
                "message": source.message,
                "details": source.details,
            })),
            A2AError::TaskNotFound { task_id } => Some(json!({ "taskId": task_id })),
            A2AError::TaskNotCancelable { task_id, state } => Some(json!({
                "taskId": task_id,
                "state": state,
            })),
            A2AError::AgentNotFound { agent_id } => Some(json!({ "agentId": agent_id })),
            _ => None,
        }
    }

    /// Check if the error is rejected at the transport boundary, before any
    /// method is identified
    pub fn is_envelope_error(&self) -> bool {
        matches!(self, A2AError::Parse(_) | A2AError::InvalidRequest(_))
    }

    /// Create a task not found error
    pub fn task_not_found(task_id: impl Into<String>) -> Self {
        Self::TaskNotFound {
            task_id: task_id.into(),
        }
    }

    /// Create an agent not found error
    pub fn agent_not_found(agent_id: impl Into<String>) -> Self {
        Self::AgentNotFound {
            agent_id: agent_id.into(),
        }
    }
}

/// Error reported by an agent's message handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct AgentError {
    /// Error code (e.g., "UPSTREAM_UNAVAILABLE", "PANIC")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details as structured data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AgentError {
    /// Create a new agent error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the agent error
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&str> for AgentError {
    fn from(s: &str) -> Self {
        AgentError::new("AGENT_ERROR", s)
    }
}

impl From<String> for AgentError {
    fn from(s: String) -> Self {
        AgentError::new("AGENT_ERROR", s)
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(A2AError::Parse("x".into()).code(), -32700);
        assert_eq!(A2AError::InvalidRequest("x".into()).code(), -32600);
        assert_eq!(
            A2AError::MethodNotFound {
                method: "nope".into()
            }
            .code(),
            -32601
        );
        assert_eq!(A2AError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(A2AError::Internal("x".into()).code(), -32603);
        assert_eq!(A2AError::task_not_found("t").code(), -32001);
        assert_eq!(
            A2AError::TaskNotCancelable {
                task_id: "t".into(),
                state: TaskState::Completed
            }
            .code(),
            -32002
        );
        assert_eq!(A2AError::PushNotificationNotSupported.code(), -32003);
        assert_eq!(A2AError::UnsupportedOperation("x".into()).code(), -32004);
    }

    #[test]
    fn test_routing_errors_use_method_not_found() {
        assert_eq!(A2AError::NoAgentsAvailable.code(), -32601);
        assert_eq!(A2AError::agent_not_found("agent://x").code(), -32601);
    }

    #[test]
    fn test_agent_error_data() {
        let err = A2AError::Agent {
            task_id: "t1".into(),
            source: AgentError::new("UPSTREAM", "upstream timed out")
                .with_details(json!({"status": 504})),
        };

        assert_eq!(err.code(), -32603);
        let data = err.data().unwrap();
        assert_eq!(data["taskId"], "t1");
        assert_eq!(data["message"], "upstream timed out");
        assert_eq!(data["details"]["status"], 504);
    }

    #[test]
    fn test_envelope_errors() {
        assert!(A2AError::Parse("x".into()).is_envelope_error());
        assert!(A2AError::InvalidRequest("x".into()).is_envelope_error());
        assert!(!A2AError::InvalidParams("x".into()).is_envelope_error());
    }
}
