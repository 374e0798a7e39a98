//! Transport to the Entry Store.

use async_trait::async_trait;
use diary_core::{CreateEntryRequest, DiaryEntry, EntryId};
use reqwest::{Response, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),
}

/// The three calls the client makes against `/api/entries`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryApi: Send + Sync {
    async fn list(&self) -> Result<Vec<DiaryEntry>, ClientError>;

    /// Sends `content` as typed; trimming is the server's job.
    async fn create(&self, content: String) -> Result<DiaryEntry, ClientError>;

    async fn delete(&self, id: EntryId) -> Result<(), ClientError>;
}

/// [`EntryApi`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpEntryApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEntryApi {
    /// `base_url` is the server origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }
}

fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status(status))
    }
}

#[async_trait]
impl EntryApi for HttpEntryApi {
    async fn list(&self) -> Result<Vec<DiaryEntry>, ClientError> {
        let resp = self.http.get(self.url("/entries")).send().await?;
        Ok(ensure_success(resp)?.json().await?)
    }

    async fn create(&self, content: String) -> Result<DiaryEntry, ClientError> {
        let body = CreateEntryRequest {
            content: Some(content),
        };
        let resp = self
            .http
            .post(self.url("/entries"))
            .json(&body)
            .send()
            .await?;
        Ok(ensure_success(resp)?.json().await?)
    }

    async fn delete(&self, id: EntryId) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/entries/{id}")))
            .send()
            .await?;
        ensure_success(resp)?;
        Ok(())
    }
}
