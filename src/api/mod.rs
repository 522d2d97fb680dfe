//! Backend access for tasks
//!
//! [`TaskBackend`] is the seam between the store and the remote service.
//! [`http::HttpBackend`] talks to the REST API; tests use an in-memory backend.

pub mod http;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::{Result, TaskError};
use crate::model::{Page, Task, TaskDraft, TaskId, TaskPatch};

pub use http::HttpBackend;

/// Bearer credential supplied on every call.
#[derive(Clone, Default)]
pub struct Credentials(Option<String>);

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }

    /// The token, or a precondition error when it is missing or blank.
    pub fn token(&self) -> Result<&str> {
        self.0
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TaskError::precondition("You are not signed in. Set a token first."))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Credentials(***)"),
            None => f.write_str("Credentials(none)"),
        }
    }
}

/// Remote task service contract.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// `GET tasks?offset&limit`
    async fn fetch_tasks(&self, credentials: &Credentials, offset: u32, limit: u32)
        -> Result<Page<Task>>;

    /// `POST tasks`, returns the canonical task
    async fn create_task(&self, credentials: &Credentials, draft: &TaskDraft) -> Result<Task>;

    /// `PUT tasks/{id}`, returns the canonical task
    async fn update_task(
        &self,
        credentials: &Credentials,
        id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<Task>;

    /// `DELETE tasks/{id}`
    async fn delete_task(&self, credentials: &Credentials, id: &TaskId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_precondition() {
        assert!(Credentials::none().token().unwrap_err().is_precondition());
        assert!(Credentials::bearer("  ").token().unwrap_err().is_precondition());
        assert_eq!(Credentials::bearer(" abc ").token().unwrap(), "abc");
    }

    #[test]
    fn test_debug_hides_token() {
        let creds = Credentials::bearer("secret");
        assert_eq!(format!("{:?}", creds), "Credentials(***)");
    }
}
