use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::{
    domain::{Devlog, DevlogId, Project, ProjectId, StoreItem, StoreItemId, User, UserId},
    error::ApiError,
    protocol::{DevlogList, ErrorBody, ProjectDraft, ProjectList, ProjectUpdate, UserList},
};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://flavortown.hackclub.com/api/v1";

/// Read and write operations the bot needs from the project tracker.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn projects(&self, page: u32, query: Option<&str>) -> Result<ProjectList, ApiError>;
    async fn project(&self, project_id: ProjectId) -> Result<Project, ApiError>;
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Value, ApiError>;
    async fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> Result<Value, ApiError>;
    async fn devlogs(&self, page: u32) -> Result<DevlogList, ApiError>;
    async fn devlog(&self, devlog_id: DevlogId) -> Result<Devlog, ApiError>;
    async fn store_items(&self) -> Result<Vec<StoreItem>, ApiError>;
    async fn store_item(&self, item_id: StoreItemId) -> Result<StoreItem, ApiError>;
    async fn users(&self, page: u32, query: Option<&str>) -> Result<UserList, ApiError>;
    async fn user(&self, user_id: UserId) -> Result<User, ApiError>;
}

#[derive(Clone)]
pub struct FlavortownClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl FlavortownClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        // Idle connections are never kept, so every call dials a fresh one.
        let http = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .unwrap_or_else(|err| {
                warn!(%err, "flavortown: falling back to default http client");
                Client::new()
            });
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        debug!(%method, path, "flavortown: request");
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key);
        if !params.is_empty() {
            builder = builder.query(params);
        }
        let response = builder.send().await.map_err(transport_error)?;
        read_response(response).await
    }

    /// Same error mapping as [`request`](Self::request), but the payload is
    /// sent as form fields.
    pub async fn submit<F>(&self, method: Method, path: &str, form: &F) -> Result<Value, ApiError>
    where
        F: Serialize + ?Sized,
    {
        debug!(%method, path, "flavortown: submit");
        let response = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;
        read_response(response).await
    }
}

fn listing_params(page: u32, query: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", page.to_string())];
    if let Some(query) = query.map(str::trim).filter(|query| !query.is_empty()) {
        params.push(("query", query.to_string()));
    }
    params
}

fn transport_error(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(ApiError::from)
}

async fn read_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => return Err(ApiError::NotFound),
        _ => {}
    }

    let body = response.bytes().await.map_err(transport_error)?;
    if status.is_client_error() || status.is_server_error() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.error);
        debug!(status = status.as_u16(), ?message, "flavortown: request rejected");
        return Err(ApiError::rejected(message));
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl TrackerApi for FlavortownClient {
    async fn projects(&self, page: u32, query: Option<&str>) -> Result<ProjectList, ApiError> {
        let params = listing_params(page, query);
        decode(self.request(Method::GET, "/projects", &params).await?)
    }

    async fn project(&self, project_id: ProjectId) -> Result<Project, ApiError> {
        let path = format!("/projects/{project_id}");
        decode(self.request(Method::GET, &path, &[]).await?)
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Value, ApiError> {
        let draft = draft.clone().normalized();
        self.submit(Method::POST, "/projects", &draft).await
    }

    async fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> Result<Value, ApiError> {
        let path = format!("/projects/{project_id}");
        self.submit(Method::PATCH, &path, update).await
    }

    async fn devlogs(&self, page: u32) -> Result<DevlogList, ApiError> {
        let params = listing_params(page, None);
        decode(self.request(Method::GET, "/devlogs", &params).await?)
    }

    async fn devlog(&self, devlog_id: DevlogId) -> Result<Devlog, ApiError> {
        let path = format!("/devlogs/{devlog_id}");
        decode(self.request(Method::GET, &path, &[]).await?)
    }

    async fn store_items(&self) -> Result<Vec<StoreItem>, ApiError> {
        decode(self.request(Method::GET, "/store", &[]).await?)
    }

    async fn store_item(&self, item_id: StoreItemId) -> Result<StoreItem, ApiError> {
        let path = format!("/store/{item_id}");
        decode(self.request(Method::GET, &path, &[]).await?)
    }

    async fn users(&self, page: u32, query: Option<&str>) -> Result<UserList, ApiError> {
        let params = listing_params(page, query);
        decode(self.request(Method::GET, "/users", &params).await?)
    }

    async fn user(&self, user_id: UserId) -> Result<User, ApiError> {
        let path = format!("/users/{user_id}");
        decode(self.request(Method::GET, &path, &[]).await?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
