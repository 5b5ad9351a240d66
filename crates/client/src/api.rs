//! HTTP client for the Todo Bloom REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use bloom_core::todo::Todo;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Partial update body for PUT /todos/{id}
///
/// Absent fields are left untouched by the server. `due_date` carries an
/// extra `Option` so an explicit null can clear the date.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestBody<'a> {
    partial_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    completion: String,
}

/// Thin wrapper over the five HTTP operations
pub struct TodoApi {
    http: reqwest::Client,
    base_url: String,
}

impl TodoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /todos
    pub async fn fetch_all(&self) -> Result<Vec<Todo>> {
        let resp = self.http.get(self.url("/todos")).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// POST /todos
    pub async fn create(&self, text: &str, due_date: Option<DateTime<Utc>>) -> Result<Todo> {
        let resp = self
            .http
            .post(self.url("/todos"))
            .json(&CreateBody { text, due_date })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// PUT /todos/{id}
    pub async fn update(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo> {
        let resp = self
            .http
            .put(self.url(&format!("/todos/{}", id)))
            .json(patch)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp.json().await?)
    }

    /// DELETE /todos/{id}
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/todos/{}", id)))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(())
    }

    /// POST /suggest
    pub async fn suggest(&self, partial: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.url("/suggest"))
            .json(&SuggestBody {
                partial_description: partial,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        let body: SuggestResponse = resp.json().await?;
        Ok(body.completion)
    }
}
