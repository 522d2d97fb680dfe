//! Local task cache with derived views
//!
//! `TaskStore` owns the authoritative task list fetched from the backend and
//! keeps two derived views in step with every mutation:
//!
//! - personal tasks (no project name)
//! - tasks due on the selected date
//!
//! Mutations apply the server's canonical copy immediately, without a refetch.
//! Every operation logs exactly one `tracing` event with its outcome.

pub mod views;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{Credentials, TaskBackend};
use crate::error::{ErrorInfo, Result, TaskError};
use crate::model::{Task, TaskDraft, TaskId, TaskPatch};

/// How the date view reacts to `update` and `remove`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyMode {
    /// Re-derive the date view after every mutation
    #[default]
    Strict,
    /// `update`/`remove` leave the date view alone until the next
    /// `select_date` or `load`
    Legacy,
}

/// In-flight indicator that can be read while an operation holds the store.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn begin(&self) -> InFlight {
        self.0.store(true, Ordering::SeqCst);
        InFlight(Arc::clone(&self.0))
    }
}

/// Clears the flag when the backend call finishes or is dropped.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Task cache bound to a backend.
pub struct TaskStore<B> {
    backend: B,
    mode: ConsistencyMode,
    tasks: Vec<Task>,
    personal: Vec<Task>,
    by_date: Vec<Task>,
    selected_date: Option<String>,
    loading: LoadingFlag,
    error: Option<ErrorInfo>,
}

impl<B: TaskBackend> TaskStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_mode(backend, ConsistencyMode::default())
    }

    pub fn with_mode(backend: B, mode: ConsistencyMode) -> Self {
        Self {
            backend,
            mode,
            tasks: Vec::new(),
            personal: Vec::new(),
            by_date: Vec::new(),
            selected_date: None,
            loading: LoadingFlag::default(),
            error: None,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mode(&self) -> ConsistencyMode {
        self.mode
    }

    /// All tasks, server order with newly created tasks first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn personal_tasks(&self) -> &[Task] {
        &self.personal
    }

    pub fn date_indexed_tasks(&self) -> &[Task] {
        &self.by_date
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Handle that observes `is_loading` from another task while a backend
    /// call is awaited.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Last surfaced error; cleared by the next successful operation
    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Fetch one window of tasks and replace the list wholesale.
    ///
    /// On failure the current list stays visible and the error is recorded.
    pub async fn load(&mut self, credentials: &Credentials, offset: u32, limit: u32) -> Result<usize> {
        if let Err(err) = credentials.token() {
            return Err(self.fail("load", err));
        }

        let result = {
            let _in_flight = self.loading.begin();
            self.backend.fetch_tasks(credentials, offset, limit).await
        };
        let page = result.map_err(|err| self.fail("load", err))?;

        let received = page.content.len();
        self.tasks = views::dedup_by_id(page.content);
        self.refresh_personal();
        self.refresh_date_view();
        self.error = None;

        tracing::info!(
            op = "load",
            count = self.tasks.len(),
            duplicates = received - self.tasks.len(),
            total = page.total_elements,
            "tasks loaded"
        );
        Ok(self.tasks.len())
    }

    /// Validate the draft, create it remotely and prepend the canonical task.
    pub async fn create(&mut self, credentials: &Credentials, draft: TaskDraft) -> Result<Task> {
        let draft = match credentials.token().and_then(|_| draft.normalized()) {
            Ok(draft) => draft,
            Err(err) => return Err(self.fail("create", err)),
        };

        let result = {
            let _in_flight = self.loading.begin();
            self.backend.create_task(credentials, &draft).await
        };
        let task = result.map_err(|err| self.fail("create", err))?;

        self.tasks.retain(|t| t.id != task.id);
        self.tasks.insert(0, task.clone());
        self.refresh_personal();
        match self.mode {
            ConsistencyMode::Strict => self.refresh_date_view(),
            ConsistencyMode::Legacy => {
                if let Some(day) = self.selected_date.as_deref() {
                    if task.is_due_on(day) {
                        self.by_date.retain(|t| t.id != task.id);
                        self.by_date.insert(0, task.clone());
                    }
                }
            }
        }
        self.error = None;

        tracing::info!(
            op = "create",
            id = %task.id,
            personal = task.is_personal(),
            count = self.tasks.len(),
            "task created"
        );
        Ok(task)
    }

    /// Apply a patch remotely and swap in the canonical task.
    ///
    /// The list is untouched when the backend rejects the patch.
    pub async fn update(
        &mut self,
        credentials: &Credentials,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task> {
        if let Err(err) = credentials.token() {
            return Err(self.fail("update", err));
        }

        let result = {
            let _in_flight = self.loading.begin();
            self.backend.update_task(credentials, id, &patch).await
        };
        let task = result.map_err(|err| self.fail("update", err))?;

        let replaced = match self.tasks.iter().position(|t| &t.id == id) {
            Some(pos) => {
                self.tasks[pos] = task.clone();
                // the server may hand back a different id; keep it unique
                let mut index = 0;
                self.tasks.retain(|t| {
                    let keep = index == pos || t.id != task.id;
                    index += 1;
                    keep
                });
                true
            }
            None => false,
        };
        self.refresh_personal();
        if self.mode == ConsistencyMode::Strict {
            self.refresh_date_view();
        }
        self.error = None;

        tracing::info!(
            op = "update",
            id = %id,
            replaced,
            personal = task.is_personal(),
            "task updated"
        );
        Ok(task)
    }

    /// Delete remotely, then drop the task locally. Nothing is removed on failure.
    pub async fn remove(&mut self, credentials: &Credentials, id: &TaskId) -> Result<()> {
        if let Err(err) = credentials.token() {
            return Err(self.fail("remove", err));
        }

        let result = {
            let _in_flight = self.loading.begin();
            self.backend.delete_task(credentials, id).await
        };
        result.map_err(|err| self.fail("remove", err))?;

        self.tasks.retain(|t| &t.id != id);
        self.refresh_personal();
        if self.mode == ConsistencyMode::Strict {
            self.refresh_date_view();
        }
        self.error = None;

        tracing::info!(op = "remove", id = %id, count = self.tasks.len(), "task removed");
        Ok(())
    }

    /// Select a calendar day and refilter; `None` or blank clears the view.
    pub fn select_date(&mut self, day: Option<&str>) -> &[Task] {
        self.selected_date = views::normalize_day(day);
        self.refresh_date_view();
        tracing::debug!(
            op = "select_date",
            date = self.selected_date.as_deref().unwrap_or(""),
            count = self.by_date.len(),
            "date selected"
        );
        &self.by_date
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn refresh_personal(&mut self) {
        self.personal = views::personal_view(&self.tasks);
    }

    fn refresh_date_view(&mut self) {
        self.by_date = views::date_view(&self.tasks, self.selected_date.as_deref());
    }

    fn fail(&mut self, op: &'static str, err: TaskError) -> TaskError {
        let info = err.info();
        tracing::warn!(
            op,
            error = %info.message,
            details = info.details.as_deref().unwrap_or(""),
            "operation failed"
        );
        self.error = Some(info);
        err
    }
}
