//! A2A protocol operations
//!
//! Each JSON-RPC method has exactly one parameter schema. Parameters are
//! decoded once, when the operation is built, and anything that does not
//! match the schema is rejected as invalid params.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{error::A2AError, message::Message};

/// JSON-RPC method names
pub mod methods {
    pub const SEND_TASK: &str = "tasks/send";
    pub const GET_TASK: &str = "tasks/get";
    pub const CANCEL_TASK: &str = "tasks/cancel";
    pub const SEND_TASK_SUBSCRIBE: &str = "tasks/sendSubscribe";
    pub const RESUBSCRIBE: &str = "tasks/resubscribe";
    pub const SET_PUSH_NOTIFICATION: &str = "tasks/pushNotification/set";
    pub const GET_PUSH_NOTIFICATION: &str = "tasks/pushNotification/get";
}

/// Parameters of `tasks/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSendParams {
    /// Task identifier, created on first use
    pub id: String,

    /// Optional session identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// The inbound message
    pub message: Message,

    /// Optional caller metadata, stored on the task at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Parameters of `tasks/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    pub id: String,

    /// Return only the most recent N history entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<usize>,
}

/// Parameters of `tasks/cancel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdParams {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// A2A protocol operations served by the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum A2AOperation {
    /// Send a message to the task's agent, creating the task if needed
    SendTask(TaskSendParams),

    /// Read a task record
    GetTask(TaskQueryParams),

    /// Cancel a task
    CancelTask(TaskIdParams),
}

impl A2AOperation {
    /// Build an operation from a JSON-RPC method name and its params
    pub fn from_rpc(method: &str, params: Option<Value>) -> Result<Self, A2AError> {
        match method {
            methods::SEND_TASK => Ok(Self::SendTask(decode_params(method, params)?)),
            methods::GET_TASK => Ok(Self::GetTask(decode_params(method, params)?)),
            methods::CANCEL_TASK => Ok(Self::CancelTask(decode_params(method, params)?)),
            methods::SEND_TASK_SUBSCRIBE | methods::RESUBSCRIBE => Err(
                A2AError::UnsupportedOperation(format!("{} requires streaming", method)),
            ),
            methods::SET_PUSH_NOTIFICATION | methods::GET_PUSH_NOTIFICATION => {
                Err(A2AError::PushNotificationNotSupported)
            }
            other => Err(A2AError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }

    /// JSON-RPC method name of this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendTask(_) => methods::SEND_TASK,
            A2AOperation::GetTask(_) => methods::GET_TASK,
            A2AOperation::CancelTask(_) => methods::CANCEL_TASK,
        }
    }

    /// Identifier of the task this operation targets
    pub fn task_id(&self) -> &str {
        match self {
            A2AOperation::SendTask(params) => &params.id,
            A2AOperation::GetTask(params) => &params.id,
            A2AOperation::CancelTask(params) => &params.id,
        }
    }
}

fn decode_params<T: DeserializeOwned>(method: &str, params: Option<Value>) -> Result<T, A2AError> {
    let params = match params {
        Some(Value::Null) | None => {
            return Err(A2AError::InvalidParams(format!(
                "{} requires a params object",
                method
            )))
        }
        Some(params) => params,
    };

    serde_json::from_value(params)
        .map_err(|e| A2AError::InvalidParams(format!("{}: {}", method, e)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_send_params_decoding() {
        let op = A2AOperation::from_rpc(
            "tasks/send",
            Some(json!({
                "id": "t1",
                "sessionId": "s1",
                "message": {"role": "user", "parts": [{"type": "text", "text": "hi"}]}
            })),
        )
        .unwrap();

        assert_eq!(op.method(), "tasks/send");
        assert_eq!(op.task_id(), "t1");
        match op {
            A2AOperation::SendTask(params) => {
                assert_eq!(params.session_id.as_deref(), Some("s1"));
                assert_eq!(params.message.parts[0].as_text(), Some("hi"));
            }
            other => panic!("Expected SendTask, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_fields_are_invalid_params() {
        let missing_message = A2AOperation::from_rpc("tasks/send", Some(json!({"id": "t1"})));
        assert!(matches!(missing_message, Err(A2AError::InvalidParams(_))));

        let missing_id = A2AOperation::from_rpc(
            "tasks/send",
            Some(json!({"message": {"role": "user", "parts": []}})),
        );
        assert!(matches!(missing_id, Err(A2AError::InvalidParams(_))));

        let no_params = A2AOperation::from_rpc("tasks/get", None);
        assert!(matches!(no_params, Err(A2AError::InvalidParams(_))));

        let null_params = A2AOperation::from_rpc("tasks/cancel", Some(Value::Null));
        assert!(matches!(null_params, Err(A2AError::InvalidParams(_))));
    }

    #[test]
    fn test_wrong_shape_is_not_guessed() {
        // A bare string id is not an accepted alternative shape
        let result = A2AOperation::from_rpc("tasks/get", Some(json!("t1")));
        assert!(matches!(result, Err(A2AError::InvalidParams(_))));

        let result = A2AOperation::from_rpc("tasks/get", Some(json!({"taskId": "t1"})));
        assert!(matches!(result, Err(A2AError::InvalidParams(_))));
    }

    #[test]
    fn test_query_params_history_length() {
        let op =
            A2AOperation::from_rpc("tasks/get", Some(json!({"id": "t1", "historyLength": 1})))
                .unwrap();
        assert_eq!(
            op,
            A2AOperation::GetTask(TaskQueryParams {
                id: "t1".into(),
                history_length: Some(1)
            })
        );
    }

    #[test]
    fn test_reserved_and_unknown_methods() {
        let err = A2AOperation::from_rpc("tasks/sendSubscribe", Some(json!({}))).unwrap_err();
        assert_eq!(err.code(), -32004);

        let err = A2AOperation::from_rpc("tasks/pushNotification/set", None).unwrap_err();
        assert_eq!(err.code(), -32003);

        let err = A2AOperation::from_rpc("tasks/explode", None).unwrap_err();
        assert!(matches!(err, A2AError::MethodNotFound { ref method } if method == "tasks/explode"));
    }
}
