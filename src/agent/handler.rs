//! Message handler contract between the runtime and agent logic

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::protocol::{AgentError, Message};

/// Agent business logic
///
/// Given the inbound message and a per-call context, produce a reply message
/// or an error. Panics are caught by the runtime and reported as failures of
/// the task; they never reach the transport.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, message: Message, ctx: HandlerContext) -> Result<Message, AgentError>;
}

/// Per-call context handed to a message handler
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Task the message belongs to
    pub task_id: String,

    /// Identifier of the agent being invoked
    pub agent_id: String,

    /// Session the task belongs to, if the caller supplied one
    pub session_id: Option<String>,

    /// Logging capability scoped to this call
    pub logger: AgentLogger,
}

impl HandlerContext {
    pub fn new(
        task_id: impl Into<String>,
        agent_id: impl Into<String>,
        session_id: Option<String>,
    ) -> Self {
        let task_id = task_id.into();
        let agent_id = agent_id.into();
        let logger = AgentLogger::new(&agent_id, &task_id);

        Self {
            task_id,
            agent_id,
            session_id,
            logger,
        }
    }
}

/// Logger injected into agent calls
///
/// Every event is tagged with the agent and task identifiers of the call.
#[derive(Debug, Clone)]
pub struct AgentLogger {
    agent_id: Arc<str>,
    task_id: Arc<str>,
}

impl AgentLogger {
    pub fn new(agent_id: &str, task_id: &str) -> Self {
        Self {
            agent_id: Arc::from(agent_id),
            task_id: Arc::from(task_id),
        }
    }

    pub fn log(&self, message: &str) {
        info!(agent_id = %self.agent_id, task_id = %self.task_id, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(agent_id = %self.agent_id, task_id = %self.task_id, "{}", message);
    }

    pub fn error(&self, message: &str) {
        error!(agent_id = %self.agent_id, task_id = %self.task_id, "{}", message);
    }
}

/// Message handler backed by an async closure
///
/// Created with [`handler_fn`].
#[derive(Clone)]
pub struct FnHandler<F> {
    f: F,
}

/// Wrap an async closure as a [`MessageHandler`]
///
/// ```rust
/// use a2a_runtime::agent::handler_fn;
/// use a2a_runtime::protocol::{AgentError, Message};
///
/// let echo = handler_fn(|message: Message, _ctx| async move {
///     Ok::<_, AgentError>(Message::agent(message.text().unwrap_or_default()))
/// });
/// # let _ = echo;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Message, HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Message, AgentError>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(Message, HandlerContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Message, AgentError>> + Send + 'static,
{
    async fn handle(&self, message: Message, ctx: HandlerContext) -> Result<Message, AgentError> {
        (self.f)(message, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_handler_receives_context() {
        let handler = handler_fn(|message: Message, ctx: HandlerContext| async move {
            ctx.logger.log("handling");
            Ok::<_, AgentError>(Message::agent(format!(
                "{}:{}:{}",
                ctx.agent_id,
                ctx.task_id,
                message.text().unwrap_or_default()
            )))
        });

        let ctx = HandlerContext::new("t1", "agent://echo", Some("s1".into()));
        let reply = handler.handle(Message::user("hi"), ctx).await.unwrap();

        assert_eq!(reply.text().as_deref(), Some("agent://echo:t1:hi"));
    }

    #[tokio::test]
    async fn test_fn_handler_propagates_errors() {
        let handler = handler_fn(|_message: Message, _ctx| async move {
            Err::<Message, _>(AgentError::from("no upstream"))
        });

        let ctx = HandlerContext::new("t1", "a", None);
        let err = handler.handle(Message::user("hi"), ctx).await.unwrap_err();
        assert_eq!(err.message, "no upstream");
        assert_eq!(err.code, "AGENT_ERROR");
    }
}
