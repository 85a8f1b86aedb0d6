//! Core A2A protocol service implementation

use std::{
    any::Any,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures::FutureExt;
use tower_service::Service;
use tracing::{debug, info, warn};

use crate::{
    agent::{AgentDescriptor, HandlerContext},
    protocol::{
        error::{A2AError, AgentError},
        operation::{A2AOperation, TaskIdParams, TaskQueryParams, TaskSendParams},
        task::{Task, TaskState},
        Artifact,
    },
    service::A2ARequest,
    store::{NewTask, TaskStore},
};

/// Core A2A protocol service that executes operations against the task store
///
/// This service implements the Tower `Service` trait. Every call resolves to
/// the affected task record, or to the protocol error that stopped it.
#[derive(Debug, Clone)]
pub struct A2AProtocolService {
    store: Arc<TaskStore>,
}

impl A2AProtocolService {
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `store` - Task store shared by every request of the process
    pub fn new(store: Arc<TaskStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Run one send exchange: record the message, invoke the handler, record
    /// the outcome
    async fn send_task(
        store: Arc<TaskStore>,
        agent: Arc<AgentDescriptor>,
        params: TaskSendParams,
    ) -> Result<Task, A2AError> {
        let task_id = params.id;
        let (slot, created) = store
            .get_or_create(NewTask {
                task_id: &task_id,
                agent_id: &agent.id,
                session_id: params.session_id.as_deref(),
                metadata: params.metadata.as_ref(),
            })
            .await;

        if created {
            info!(task_id = %task_id, agent_id = %agent.id, "Task submitted");
        }

        // Held until the reply is recorded
        let _exchange = slot.begin_exchange().await;

        let session_id = {
            let mut task = slot.lock().await;

            if task.agent_id != agent.id {
                return Err(A2AError::InvalidParams(format!(
                    "task {} belongs to agent {}",
                    task_id, task.agent_id
                )));
            }

            if task.state() == TaskState::Canceled {
                return Err(A2AError::UnsupportedOperation(format!(
                    "task {} is canceled and accepts no further messages",
                    task_id
                )));
            }

            task.transition(TaskState::Working)
                .map_err(|(from, to)| invalid_transition(&task_id, from, to))?;
            if task.session_id.is_none() {
                task.session_id = params.session_id.clone();
            }
            task.push_message(params.message.clone());

            task.session_id.clone()
        };

        debug!(task_id = %task_id, agent_id = %agent.id, "Invoking message handler");

        let ctx = HandlerContext::new(task_id.as_str(), agent.id.as_str(), session_id);
        let handler = Arc::clone(&agent.handler);
        let message = params.message;
        let outcome = AssertUnwindSafe(async move { handler.handle(message, ctx).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(AgentError::new("PANIC", panic_message(&*panic))));

        let mut task = slot.lock().await;

        if task.state() == TaskState::Canceled {
            info!(task_id = %task_id, "Task canceled during exchange, discarding reply");
            return Ok(task.clone());
        }

        match outcome {
            Ok(reply) => {
                task.transition(TaskState::Completed)
                    .map_err(|(from, to)| invalid_transition(&task_id, from, to))?;
                task.artifacts = Some(vec![Artifact::from_reply(&reply)]);
                task.push_message(reply);

                info!(task_id = %task_id, agent_id = %agent.id, "Task completed");
                Ok(task.clone())
            }
            Err(source) => {
                task.transition(TaskState::Failed)
                    .map_err(|(from, to)| invalid_transition(&task_id, from, to))?;

                warn!(
                    task_id = %task_id,
                    agent_id = %agent.id,
                    code = %source.code,
                    error = %source.message,
                    "Task failed"
                );
                Err(A2AError::Agent { task_id, source })
            }
        }
    }

    async fn get_task(store: &TaskStore, params: TaskQueryParams) -> Result<Task, A2AError> {
        let task = store
            .get(&params.id)
            .await
            .ok_or_else(|| A2AError::task_not_found(&params.id))?;

        Ok(match params.history_length {
            Some(len) => task.with_history_limit(len),
            None => task,
        })
    }

    async fn cancel_task(store: &TaskStore, params: TaskIdParams) -> Result<Task, A2AError> {
        let slot = store
            .slot(&params.id)
            .await
            .ok_or_else(|| A2AError::task_not_found(&params.id))?;

        let mut task = slot.lock().await;
        let state = task.state();
        if !state.is_cancelable() {
            return Err(A2AError::TaskNotCancelable {
                task_id: params.id,
                state,
            });
        }

        task.transition(TaskState::Canceled)
            .map_err(|(from, to)| invalid_transition(&params.id, from, to))?;
        info!(task_id = %params.id, previous = %state, "Task canceled");

        Ok(task.clone())
    }
}

impl Service<A2ARequest> for A2AProtocolService {
    type Response = Task;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let store = Arc::clone(&self.store);
        let A2ARequest { operation, context } = req;

        Box::pin(async move {
            match operation {
                A2AOperation::SendTask(params) => {
                    // Detached so a dropped caller cannot strand the task in `working`
                    tokio::spawn(Self::send_task(store, context.agent, params))
                        .await
                        .map_err(|e| A2AError::Internal(format!("send exchange aborted: {}", e)))?
                }
                A2AOperation::GetTask(params) => Self::get_task(&store, params).await,
                A2AOperation::CancelTask(params) => Self::cancel_task(&store, params).await,
            }
        })
    }
}

fn invalid_transition(task_id: &str, from: TaskState, to: TaskState) -> A2AError {
    A2AError::InvalidTransition {
        task_id: task_id.to_string(),
        from,
        to,
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("handler panicked: {}", message)
    } else {
        "handler panicked".to_string()
    }
}
