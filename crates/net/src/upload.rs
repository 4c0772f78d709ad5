//! Forwarding uploaded images to a third-party image host.
//!
//! The host is expected to speak the imgbb upload API: a multipart POST
//! with an `image` field and a `key` query parameter, answered with JSON
//! carrying `data.url` on success or `error.message` on failure.

use crate::USER_AGENT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default image host endpoint.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://api.imgbb.com/1/upload";

/// Errors that can occur while forwarding an upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// No API key was configured for the image host.
    #[error("Image host is not configured")]
    NotConfigured,

    /// The uploaded file was empty.
    #[error("Uploaded file is empty")]
    EmptyFile,

    /// The request could not be sent or the response could not be read.
    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host answered with a failure.
    #[error("Image host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The host reported success without a URL.
    #[error("Image host response did not include a URL")]
    MissingUrl,
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<HostData>,
    #[serde(default)]
    error: Option<HostError>,
}

#[derive(Debug, Deserialize)]
struct HostData {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostError {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the image host.
#[derive(Debug, Clone)]
pub struct ImageHost {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ImageHost {
    /// Create a client for `endpoint`. Uploads fail with
    /// [`UploadError::NotConfigured`] until an API key is supplied.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Upload an image and return the hosted URL.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        let api_key = self.api_key.as_deref().ok_or(UploadError::NotConfigured)?;
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let size = bytes.len();
        let form = Form::new().part("image", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log::debug!("Image host answered {} for {} ({} bytes)", status, filename, size);

        parse_host_response(status, &body)
    }
}

/// Interpret the host's answer.
fn parse_host_response(status: StatusCode, body: &str) -> Result<String, UploadError> {
    let parsed: Option<HostResponse> = serde_json::from_str(body).ok();

    let rejected = |message: Option<String>| UploadError::Rejected {
        status: status.as_u16(),
        message: message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        }),
    };

    let Some(parsed) = parsed else {
        return Err(if status.is_success() {
            UploadError::MissingUrl
        } else {
            rejected(None)
        });
    };

    if !status.is_success() || parsed.success == Some(false) {
        return Err(rejected(parsed.error.and_then(|e| e.message)));
    }

    parsed
        .data
        .and_then(|d| d.url)
        .filter(|url| !url.is_empty())
        .ok_or(UploadError::MissingUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"data":{"id":"abc","url":"https://i.ibb.co/abc/cat.png"},"success":true,"status":200}"#;
        assert_eq!(
            parse_host_response(StatusCode::OK, body).unwrap(),
            "https://i.ibb.co/abc/cat.png"
        );
    }

    #[test]
    fn test_parse_rejection_message() {
        let body = r#"{"status_code":400,"error":{"message":"Invalid API v1 key.","code":100},"status_txt":"Bad Request"}"#;
        let err = parse_host_response(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(
            err,
            UploadError::Rejected { status: 400, ref message } if message == "Invalid API v1 key."
        ));
    }

    #[test]
    fn test_parse_non_json_failure() {
        let err = parse_host_response(StatusCode::BAD_GATEWAY, "<html>oops</html>").unwrap_err();
        assert!(matches!(
            err,
            UploadError::Rejected { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_parse_success_flag_false() {
        let body = r#"{"success":false,"error":{"message":"quota exceeded"}}"#;
        assert!(matches!(
            parse_host_response(StatusCode::OK, body),
            Err(UploadError::Rejected { .. })
        ));
    }

    #[test]
    fn test_parse_missing_url() {
        let body = r#"{"data":{},"success":true}"#;
        assert!(matches!(
            parse_host_response(StatusCode::OK, body),
            Err(UploadError::MissingUrl)
        ));
    }

    #[tokio::test]
    async fn test_upload_requires_key() {
        let host = ImageHost::new(DEFAULT_UPLOAD_ENDPOINT, Some("  ".to_string()), Duration::from_secs(1))
            .unwrap();
        assert!(!host.is_configured());
        let err = host.upload("cat.png", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, UploadError::NotConfigured));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let host = ImageHost::new(DEFAULT_UPLOAD_ENDPOINT, Some("key".to_string()), Duration::from_secs(1))
            .unwrap();
        let err = host.upload("cat.png", Vec::new()).await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyFile));
    }
}
