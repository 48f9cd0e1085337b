//! REST Storage Implementation
//!
//! Talks JSON to a remote collection:
//! - `GET  {collection}?expand=members&q={filter}` lists tasks
//! - `POST {collection}` creates
//! - `PUT  {collection}/{id}` replaces
//! - `DELETE {collection}/{id}` removes

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::StorageConfig;
use crate::domain::{NewTask, StorageError, StorageResult, Task, TaskFilter};
use super::credential::Credential;
use super::traits::TaskStorage;

/// Collection listing as returned by the server
#[derive(Debug, Deserialize)]
pub(crate) struct MemberList {
    #[serde(default)]
    pub members: Vec<Task>,
}

/// HTTP-backed task storage
#[derive(Debug, Clone)]
pub struct RestStorage {
    client: Client,
    collection_url: String,
    credential: Credential,
}

impl RestStorage {
    pub fn new(config: &StorageConfig, credential: Credential) -> Self {
        Self {
            client: Client::new(),
            collection_url: config.collection_url(),
            credential,
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    pub(crate) fn member_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credential.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> StorageResult<String> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;
        read_body(response).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> StorageResult<T> {
        let body = self.send(request).await?;
        decode(&body)
    }
}

/// Query string for a filter; an unconstrained filter sends no `q`
pub(crate) fn query_params(filter: &TaskFilter) -> StorageResult<Vec<(&'static str, String)>> {
    let mut params = vec![("expand", "members".to_string())];
    if !filter.is_unconstrained() {
        let q = serde_json::to_string(filter).map_err(|e| StorageError::Internal(e.to_string()))?;
        params.push(("q", q));
    }
    Ok(params)
}

/// Map a non-success status to its error
pub(crate) fn status_error(status: u16, body: String) -> StorageError {
    match status {
        401 => StorageError::Unauthorized(body),
        403 => StorageError::Forbidden(body),
        404 => StorageError::NotFound(body),
        _ => StorageError::Status(status, body),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> StorageResult<T> {
    serde_json::from_str(body).map_err(|e| StorageError::Decode(e.to_string()))
}

async fn read_body(response: Response) -> StorageResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StorageError::Transport(e.to_string()))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status.as_u16(), body))
    }
}

#[async_trait(?Send)]
impl TaskStorage for RestStorage {
    async fn query(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        debug!("GET {} {:?}", self.collection_url, filter);
        let request = self.client.get(&self.collection_url).query(&query_params(filter)?);
        let list: MemberList = self.send_json(request).await?;
        Ok(list.members)
    }

    async fn save(&self, task: &NewTask) -> StorageResult<Task> {
        debug!("POST {}", self.collection_url);
        let request = self.client.post(&self.collection_url).json(task);
        self.send_json(request).await
    }

    async fn update(&self, task: &Task) -> StorageResult<Task> {
        let url = self.member_url(&task.id);
        debug!("PUT {}", url);
        self.send_json(self.client.put(&url).json(task)).await
    }

    async fn remove(&self, task: &Task) -> StorageResult<()> {
        let url = self.member_url(&task.id);
        debug!("DELETE {}", url);
        self.send(self.client.delete(&url)).await.map(|_| ())
    }
}
