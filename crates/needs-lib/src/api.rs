use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use needs_spec::{FlowKind, Question, SubmissionPayload};

use crate::config::ApiConfig;
use crate::error::ApiError;

/// A file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self::new(name, guess_content_type(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "dwg" => "image/vnd.dwg",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Identifier of a created needs-assessment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionId::Number(id) => write!(f, "{id}"),
            SubmissionId::Text(id) => f.write_str(id),
        }
    }
}

/// External collaborators of a questionnaire session.
#[async_trait]
pub trait NeedsApi: Send + Sync {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError>;

    /// Requests a one-time writable target for a single file.
    async fn issue_upload_target(&self) -> Result<Url, ApiError>;

    async fn transfer_file(&self, target: &Url, file: &PendingFile) -> Result<(), ApiError>;

    async fn submit(
        &self,
        flow: FlowKind,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionId, ApiError>;
}

#[async_trait]
impl<T: NeedsApi + ?Sized> NeedsApi for &T {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        (**self).fetch_questions().await
    }

    async fn issue_upload_target(&self) -> Result<Url, ApiError> {
        (**self).issue_upload_target().await
    }

    async fn transfer_file(&self, target: &Url, file: &PendingFile) -> Result<(), ApiError> {
        (**self).transfer_file(target, file).await
    }

    async fn submit(
        &self,
        flow: FlowKind,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionId, ApiError> {
        (**self).submit(flow, payload).await
    }
}

#[derive(Debug, Deserialize)]
struct UploadTargetResponse {
    #[serde(rename = "uploadURL", alias = "uploadUrl", alias = "url")]
    upload_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    id: Option<SubmissionId>,
}

/// reqwest-backed implementation of [`NeedsApi`].
#[derive(Debug, Clone)]
pub struct HttpNeedsApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpNeedsApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.config.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl NeedsApi for HttpNeedsApi {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ApiError> {
        let url = self.endpoint(&self.config.questions_path)?;
        tracing::debug!(%url, "fetching question catalog");
        let response = self.authorize(self.client.get(url)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn issue_upload_target(&self) -> Result<Url, ApiError> {
        let url = self.endpoint(&self.config.upload_path)?;
        let response = self.authorize(self.client.post(url)).send().await?;
        let body: UploadTargetResponse = Self::check(response).await?.json().await?;
        let raw = body.upload_url.ok_or(ApiError::MissingField("uploadURL"))?;
        Ok(Url::parse(&raw)?)
    }

    async fn transfer_file(&self, target: &Url, file: &PendingFile) -> Result<(), ApiError> {
        let response = self
            .client
            .put(target.clone())
            .header(reqwest::header::CONTENT_TYPE, file.content_type.as_str())
            .body(file.bytes.clone())
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn submit(
        &self,
        flow: FlowKind,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionId, ApiError> {
        let url = self.endpoint(self.config.submit_path(flow))?;
        tracing::debug!(%url, ?flow, "submitting needs assessment");
        let response = self
            .authorize(self.client.post(url))
            .json(payload)
            .send()
            .await?;
        let body: SubmissionResponse = Self::check(response).await?.json().await?;
        body.id.ok_or(ApiError::MissingField("id"))
    }
}
