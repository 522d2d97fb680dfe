//! REST backend over reqwest

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use super::{Credentials, TaskBackend};
use crate::error::{ErrorBody, Result, TaskError};
use crate::model::{Page, Task, TaskDraft, TaskId, TaskPatch};

/// HTTP implementation of [`TaskBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// `base_url` is the API root; task endpoints live at `{base_url}/tasks`.
    ///
    /// Without `timeout` the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| TaskError::config(format!("invalid server url '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(TaskError::config(format!(
                "server url '{}' cannot be used as a base",
                base_url
            )));
        }

        let mut builder = Client::builder().user_agent(concat!("taskdeck/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TaskError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/tasks[/{id}]`, with the id pushed as a single encoded segment
    fn tasks_url(&self, id: Option<&TaskId>) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TaskError::config("server url cannot be used as a base"))?;
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, credentials: &Credentials) -> Result<RequestBuilder> {
        let token = credentials.token()?;
        Ok(self
            .client
            .request(method, url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json"))
    }

    /// Send and return the body of a 2xx response; anything else becomes a
    /// `Request` or `Transport` error.
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| TaskError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TaskError::Transport(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            tracing::debug!(status = status.as_u16(), "backend rejected request");
            Err(TaskError::request(status.as_u16(), ErrorBody::parse(&body)))
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| TaskError::Decode(e.to_string()))
}

#[async_trait]
impl TaskBackend for HttpBackend {
    async fn fetch_tasks(
        &self,
        credentials: &Credentials,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Task>> {
        let request = self
            .request(Method::GET, self.tasks_url(None)?, credentials)?
            .query(&[("offset", offset), ("limit", limit)]);
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn create_task(&self, credentials: &Credentials, draft: &TaskDraft) -> Result<Task> {
        let request = self
            .request(Method::POST, self.tasks_url(None)?, credentials)?
            .json(draft);
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn update_task(
        &self,
        credentials: &Credentials,
        id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<Task> {
        let request = self
            .request(Method::PUT, self.tasks_url(Some(id))?, credentials)?
            .json(patch);
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn delete_task(&self, credentials: &Credentials, id: &TaskId) -> Result<()> {
        let request = self.request(Method::DELETE, self.tasks_url(Some(id))?, credentials)?;
        self.send(request).await?;
        Ok(())
    }
}
