//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{
        error::A2AError,
        message::{FileContent, Message, Part},
        operation::A2AOperation,
        task::{Task, TaskState},
    },
    service::A2ARequest,
};

/// Layer that validates A2A protocol requests and responses
#[derive(Clone, Debug, Default)]
pub struct A2AValidationLayer;

impl A2AValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService { inner }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone, Debug)]
pub struct A2AValidationService<S> {
    inner: S,
}

impl<S> A2AValidationService<S> {
    /// Validate an A2A request
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        if req.operation.task_id().trim().is_empty() {
            return Err(A2AError::Validation("Task ID cannot be empty".into()));
        }

        if let A2AOperation::SendTask(params) = &req.operation {
            Self::validate_message(&params.message)?;
        }

        Ok(())
    }

    fn validate_message(message: &Message) -> Result<(), A2AError> {
        if message.parts.is_empty() {
            return Err(A2AError::Validation(
                "Message must have at least one part".into(),
            ));
        }

        for (index, part) in message.parts.iter().enumerate() {
            if let Part::File { file, .. } = part {
                Self::validate_file(file)
                    .map_err(|reason| A2AError::Validation(format!("part {}: {}", index, reason)))?;
            }
        }

        Ok(())
    }

    fn validate_file(file: &FileContent) -> Result<(), String> {
        match (&file.bytes, &file.uri) {
            (Some(_), Some(_)) => Err("file must not carry both bytes and uri".into()),
            (None, None) => Err("file must have either uri or bytes content".into()),
            (Some(bytes), None) => STANDARD
                .decode(bytes)
                .map(|_| ())
                .map_err(|e| format!("file bytes are not valid base64: {}", e)),
            (None, Some(uri)) if uri.trim().is_empty() => Err("file uri cannot be empty".into()),
            (None, Some(_)) => Ok(()),
        }
    }

    /// Validate the task returned for a request
    fn validate_response(task_id: &str, task: &Task) -> Result<(), A2AError> {
        if task.id != task_id {
            return Err(A2AError::Internal(format!(
                "expected task {}, got {}",
                task_id, task.id
            )));
        }

        // A completed exchange always records its reply artifact
        if task.state() == TaskState::Completed
            && task.artifacts.as_ref().map_or(true, Vec::is_empty)
        {
            return Err(A2AError::Internal(format!(
                "completed task {} has no artifacts",
                task.id
            )));
        }

        Ok(())
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = Task, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Task;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        // Validate request before passing to inner service
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        let task_id = req.operation.task_id().to_string();
        let mut inner = self.inner.clone();
        Box::pin(async move {
            let task = inner.call(req).await?;

            Self::validate_response(&task_id, &task)?;

            Ok(task)
        })
    }
}
