//! In-memory backend used by store tests

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{Credentials, TaskBackend};
use crate::error::{ErrorBody, Result, TaskError};
use crate::model::{Page, Priority, Task, TaskDraft, TaskId, TaskPatch};

/// Server-side task list kept in memory; newest tasks are listed first.
pub struct MemoryBackend {
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    fail_next: Mutex<Option<(u16, String)>>,
    fetch_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MemoryBackend {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            next_id: AtomicI64::new(100),
            calls: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
            fetch_gate: Mutex::new(None),
        }
    }

    /// Number of backend calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next call fail with the given status and message
    pub fn fail_next(&self, status: u16, message: &str) {
        *self.fail_next.lock().unwrap() = Some((status, message.to_string()));
    }

    /// Park the next fetch until `gate` fires (or its sender is dropped)
    pub fn hold_next_fetch(&self, gate: oneshot::Receiver<()>) {
        *self.fetch_gate.lock().unwrap() = Some(gate);
    }

    /// Replace the server-side list (simulates other clients)
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_next.lock().unwrap().take() {
            Some((status, message)) => Err(TaskError::request(
                status,
                ErrorBody {
                    message: Some(message),
                    ..ErrorBody::default()
                },
            )),
            None => Ok(()),
        }
    }

    fn not_found(id: &TaskId) -> TaskError {
        TaskError::request(
            404,
            ErrorBody {
                message: Some(format!("Task {} not found", id)),
                ..ErrorBody::default()
            },
        )
    }
}

fn apply_patch(task: &mut Task, patch: &TaskPatch) {
    if let Some(name) = &patch.name {
        task.name = name.clone();
    }
    if let Some(description) = &patch.description {
        task.description = Some(description.clone());
    }
    if let Some(project_id) = &patch.project_id {
        task.project_id = Some(project_id.clone());
    }
    if let Some(project_name) = &patch.project_name {
        task.project_name = Some(project_name.clone());
    }
    if let Some(assigned_to) = &patch.assigned_to {
        task.assigned_to = assigned_to.clone();
    }
    if let Some(due_date) = &patch.due_date {
        task.due_date = Some(due_date.clone());
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(progress) = patch.progress {
        task.progress = progress;
    }
    if let Some(status) = &patch.status {
        task.status = Some(status.clone());
    }
}

#[async_trait]
impl TaskBackend for MemoryBackend {
    async fn fetch_tasks(
        &self,
        credentials: &Credentials,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Task>> {
        credentials.token()?;
        let gate = self.fetch_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.begin()?;
        let tasks = self.tasks.lock().unwrap();
        let content: Vec<Task> = tasks
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        let total = tasks.len() as u64;
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Ok(Page {
            content,
            total_elements: total,
            total_pages: pages,
        })
    }

    async fn create_task(&self, credentials: &Credentials, draft: &TaskDraft) -> Result<Task> {
        credentials.token()?;
        self.begin()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task {
            description: draft.description.clone(),
            project_id: draft.project_id.clone(),
            project_name: draft.project_name.clone(),
            assigned_to: draft.assigned_to.clone().unwrap_or_default(),
            due_date: draft.due_date.clone(),
            priority: draft
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or_default(),
            progress: draft.progress.unwrap_or(0),
            ..Task::new(id, draft.name.clone())
        };
        self.tasks.lock().unwrap().insert(0, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        credentials: &Credentials,
        id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<Task> {
        credentials.token()?;
        self.begin()?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        apply_patch(task, patch);
        Ok(task.clone())
    }

    async fn delete_task(&self, credentials: &Credentials, id: &TaskId) -> Result<()> {
        credentials.token()?;
        self.begin()?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        if tasks.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
