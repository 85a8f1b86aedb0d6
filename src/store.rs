//! In-memory task store
//!
//! The store is the only mutable shared state of the runtime. Each task lives
//! in its own [`TaskSlot`]; the map lock is held only long enough to find or
//! insert a slot, so work on different tasks proceeds in parallel.
//!
//! Records are kept for the lifetime of the process. There is no eviction
//! and no persistence.

use std::{collections::HashMap, sync::Arc};

use serde_json::{Map, Value};
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard, RwLock};
use tracing::debug;

use crate::protocol::Task;

/// Storage cell of one task
///
/// `record` guards the task itself and is held only for short, non-blocking
/// updates. `exchange` serializes whole send exchanges on the task, so the
/// inbound message, the handler call and the reply of one exchange are never
/// interleaved with those of another. Cancel does not take `exchange` and can
/// therefore land while a handler is running.
#[derive(Debug)]
pub struct TaskSlot {
    record: Mutex<Task>,
    exchange: Arc<Mutex<()>>,
}

impl TaskSlot {
    fn new(task: Task) -> Self {
        Self {
            record: Mutex::new(task),
            exchange: Arc::new(Mutex::new(())),
        }
    }

    /// Lock the task record
    pub async fn lock(&self) -> MutexGuard<'_, Task> {
        self.record.lock().await
    }

    /// Copy of the current record
    pub async fn snapshot(&self) -> Task {
        self.record.lock().await.clone()
    }

    /// Wait for exclusive use of the task for one send exchange
    pub async fn begin_exchange(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.exchange).lock_owned().await
    }
}

/// Parameters for a task created on first send
#[derive(Debug, Clone)]
pub struct NewTask<'a> {
    pub task_id: &'a str,
    pub agent_id: &'a str,
    pub session_id: Option<&'a str>,
    pub metadata: Option<&'a Map<String, Value>>,
}

/// Process-lifetime map from task identifier to task slot
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<HashMap<String, Arc<TaskSlot>>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the slot for `new.task_id`, creating a `submitted` task if absent
    ///
    /// The boolean is `true` when this call created the task.
    pub async fn get_or_create(&self, new: NewTask<'_>) -> (Arc<TaskSlot>, bool) {
        if let Some(slot) = self.slot(new.task_id).await {
            return (slot, false);
        }

        let mut tasks = self.tasks.write().await;
        // Another request may have created it between the two locks
        if let Some(slot) = tasks.get(new.task_id) {
            return (Arc::clone(slot), false);
        }

        let mut task = Task::new(new.task_id, new.agent_id);
        task.session_id = new.session_id.map(str::to_string);
        task.metadata = new.metadata.cloned();

        let slot = Arc::new(TaskSlot::new(task));
        tasks.insert(new.task_id.to_string(), Arc::clone(&slot));
        debug!(task_id = %new.task_id, agent_id = %new.agent_id, "Created task");

        (slot, true)
    }

    /// The slot for `task_id`, if the task exists
    pub async fn slot(&self, task_id: &str) -> Option<Arc<TaskSlot>> {
        self.tasks.read().await.get(task_id).cloned()
    }

    /// Copy of the task record, if it exists
    pub async fn get(&self, task_id: &str) -> Option<Task> {
        match self.slot(task_id).await {
            Some(slot) => Some(slot.snapshot().await),
            None => None,
        }
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}
