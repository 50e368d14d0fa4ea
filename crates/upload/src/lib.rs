//! Image uploads to the third-party image host
//!
//! Uploads are unsigned multipart submissions authorized only by an upload
//! preset. They never carry the portal's session credential: the host is a
//! different trust domain, so [`ImageHostClient`] owns its own HTTP client.

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Base URL of the hosted image API
pub const DEFAULT_HOST: &str = "https://api.cloudinary.com/v1_1";

/// What the user is told whenever an upload fails, whatever the cause
pub const UPLOAD_FAILED: &str = "Image upload failed";

pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Image host rejected the upload ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response from image host: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn user_message(&self) -> &'static str {
        UPLOAD_FAILED
    }
}

/// Anything that can turn file contents into a permanent URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, contents: Vec<u8>, file_name: &str) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Client for `POST {host}/{cloud_name}/image/upload`
#[derive(Debug, Clone)]
pub struct ImageHostClient {
    host: String,
    cloud_name: String,
    upload_preset: String,
    http_client: Client,
}

impl ImageHostClient {
    pub fn new(cloud_name: &str, upload_preset: &str) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
            http_client: Client::new(),
        }
    }

    /// Point at a different host, e.g. a mock server
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured client (timeouts, proxies). It must not carry
    /// default authorization headers.
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.host, self.cloud_name)
    }

    /// Read a file from disk and upload it.
    pub async fn upload_file(&self, file_path: &Path) -> Result<String> {
        let contents = tokio::fs::read(file_path).await?;
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        self.upload(contents, &file_name).await
    }
}

#[async_trait]
impl ImageUploader for ImageHostClient {
    async fn upload(&self, contents: Vec<u8>, file_name: &str) -> Result<String> {
        let url = self.upload_url();
        debug!("Uploading {} ({} bytes) to {}", file_name, contents.len(), url);

        let part = Part::bytes(contents).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone());

        let response = self.http_client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected { status, body });
        }

        let body = response.bytes().await?;
        let parsed: UploadResponse = serde_json::from_slice(&body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

        parsed
            .secure_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| UploadError::InvalidResponse("missing secure_url".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url() {
        let client = ImageHostClient::new("jodhpur-pg", "residents");
        assert_eq!(
            client.upload_url(),
            "https://api.cloudinary.com/v1_1/jodhpur-pg/image/upload"
        );

        let client = client.with_host("http://127.0.0.1:9000/");
        assert_eq!(
            client.upload_url(),
            "http://127.0.0.1:9000/jodhpur-pg/image/upload"
        );
    }

    #[test]
    fn test_every_failure_reads_the_same_to_users() {
        let rejected = UploadError::Rejected {
            status: StatusCode::BAD_REQUEST,
            body: "Upload preset not found".to_string(),
        };
        let invalid = UploadError::InvalidResponse("missing secure_url".to_string());
        assert_eq!(rejected.user_message(), UPLOAD_FAILED);
        assert_eq!(invalid.user_message(), UPLOAD_FAILED);
    }
}
