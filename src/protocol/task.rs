//! A2A task types and lifecycle management

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{message::Message, Artifact};

/// A task in the A2A protocol
///
/// A task is one identifier-keyed exchange between a caller and the agent that
/// owns it. The history is append-only; artifacts hold the derived output of
/// the latest successful exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Client-supplied task identifier
    pub id: String,

    /// Identifier of the agent that owns this task, fixed at creation
    pub agent_id: String,

    /// Optional session identifier grouping related tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Ordered history of exchanged messages
    #[serde(default)]
    pub history: Vec<Message>,

    /// Output of the latest successful exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,

    /// Optional caller-supplied metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Task {
    /// Create a new task in the `submitted` state with an empty history
    pub fn new(id: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent_id: agent_id.into(),
            session_id: None,
            status: TaskStatus::new(TaskState::Submitted),
            history: Vec::new(),
            artifacts: None,
            metadata: None,
        }
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        self.status.state
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Move the task to `next`, stamping a fresh timestamp
    ///
    /// Returns the rejected pair when the lifecycle does not allow the move;
    /// the task is left untouched in that case.
    pub fn transition(&mut self, next: TaskState) -> Result<(), (TaskState, TaskState)> {
        let current = self.status.state;
        if !current.can_transition_to(next) {
            return Err((current, next));
        }
        self.status = TaskStatus::new(next);
        Ok(())
    }

    /// Append a message to the history
    pub fn push_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Copy of this record keeping only the most recent `len` history entries
    pub fn with_history_limit(&self, len: usize) -> Self {
        let mut task = self.clone();
        let skip = task.history.len().saturating_sub(len);
        task.history.drain(..skip);
        task
    }
}

/// Status of a task: lifecycle state plus the time it was entered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    /// Lifecycle state
    pub state: TaskState,

    /// When the state was entered
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    /// Status entering `state` now
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            timestamp: Utc::now(),
        }
    }
}

/// Task state in the A2A protocol lifecycle
///
/// ```text
/// submitted -> working -> completed | failed
/// submitted | working -> canceled
/// completed | failed -> working    (a new exchange on the same task)
/// ```
///
/// `canceled` admits no further transitions. `input-required` is part of the
/// wire vocabulary but is never entered by this runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been created and not yet picked up
    Submitted,

    /// An agent handler is processing the latest message
    Working,

    /// Reserved: the agent needs more input from the caller
    InputRequired,

    /// The latest exchange finished successfully
    Completed,

    /// The task was canceled by the caller
    Canceled,

    /// The latest exchange failed
    Failed,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }

    /// Check if a cancel request may move a task out of this state
    pub fn is_cancelable(&self) -> bool {
        matches!(self, TaskState::Submitted | TaskState::Working)
    }

    /// Check if the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;

        matches!(
            (self, next),
            (Submitted, Working)
                | (Working, Completed)
                | (Working, Failed)
                | (Submitted, Canceled)
                | (Working, Canceled)
                | (Completed, Working)
                | (Failed, Working)
        )
    }

    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Canceled => "canceled",
            TaskState::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
