//! A2A service request types

use std::sync::Arc;

use serde_json::Value;

use crate::{agent::AgentDescriptor, protocol::operation::A2AOperation};

/// A request to the A2A service
///
/// This wraps a decoded A2A operation with the routing context it runs in
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// The A2A operation to execute
    pub operation: A2AOperation,

    /// Request context (target agent, request id)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Context resolved for a request before it reaches a method handler
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Agent the request was routed to
    pub agent: Arc<AgentDescriptor>,

    /// JSON-RPC id of the call, `null` when the caller sent none
    pub request_id: Value,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(agent: Arc<AgentDescriptor>) -> Self {
        Self {
            agent,
            request_id: Value::Null,
        }
    }

    /// Set the JSON-RPC request id
    pub fn with_request_id(mut self, request_id: Value) -> Self {
        self.request_id = request_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        agent::handler_fn,
        protocol::{AgentError, Message, TaskIdParams},
    };

    #[test]
    fn test_request_creation() {
        let agent = Arc::new(AgentDescriptor::new(
            "agent://echo",
            "Echo",
            handler_fn(|m: Message, _ctx| async move { Ok::<_, AgentError>(m) }),
        ));

        let operation = A2AOperation::CancelTask(TaskIdParams {
            id: "t1".into(),
            metadata: None,
        });
        let context = RequestContext::new(agent).with_request_id(json!(5));
        let request = A2ARequest::new(operation, context);

        assert_eq!(request.context.agent.id, "agent://echo");
        assert_eq!(request.context.request_id, json!(5));
        assert_eq!(request.operation.task_id(), "t1");
    }
}
