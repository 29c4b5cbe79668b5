use crate::errors::AppError;
use crate::models::UpstreamQuery;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Path of the company search operation, relative to the registry base URL.
pub const SEARCH_PATH: &str = "api/v1/company/search";

/// Error bodies longer than this are truncated before they reach logs or callers.
pub const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

const TRUNCATED_MARKER: &str = " [truncated]";

/// Outcome of a failed upstream call, classified by how far the request got.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The registry answered, but not with 200.
    #[error("registry returned {status}: {body}")]
    Status { status: u16, body: String },

    /// No response was received (connect failure, timeout, dropped body).
    #[error("no response from registry: {0}")]
    NoResponse(String),

    /// The request could not be built or sent.
    #[error("failed to build registry request: {0}")]
    Build(String),

    /// A 200 response whose body was not valid JSON.
    #[error("failed to decode registry response: {0}")]
    Decode(String),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { status, body } => AppError::UpstreamError { status, body },
            TransportError::NoResponse(reason) => AppError::UpstreamUnavailable(reason),
            TransportError::Build(reason) => AppError::Internal(reason),
            TransportError::Decode(reason) => AppError::Internal(reason),
        }
    }
}

/// HTTPS access to the registry search operation.
///
/// Implementations make exactly one attempt per call and return the decoded
/// JSON body of a 200 response.
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    async fn search(
        &self,
        query: &UpstreamQuery,
        authorization: &str,
    ) -> Result<Value, TransportError>;
}

/// Client for the Zefix public REST API.
#[derive(Clone)]
pub struct ReqwestRegistryClient {
    client: reqwest::Client,
    search_url: Url,
}

impl ReqwestRegistryClient {
    /// Creates a new `ReqwestRegistryClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Registry root, e.g. `https://www.zefix.admin.ch/ZefixPublicREST`.
    /// * `timeout` - Per-request timeout; expiry is reported as no response.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let search_url = search_endpoint(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create Zefix client: {}", e)))?;

        Ok(Self { client, search_url })
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}

/// Resolves the search endpoint, keeping any path prefix of `base_url`.
pub fn search_endpoint(base_url: &str) -> Result<Url, AppError> {
    let mut base = Url::parse(base_url)
        .map_err(|e| AppError::Internal(format!("Invalid Zefix base URL '{}': {}", base_url, e)))?;

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(SEARCH_PATH)
        .map_err(|e| AppError::Internal(format!("Failed to build Zefix search URL: {}", e)))
}

#[async_trait]
impl RegistryTransport for ReqwestRegistryClient {
    async fn search(
        &self,
        query: &UpstreamQuery,
        authorization: &str,
    ) -> Result<Value, TransportError> {
        tracing::debug!("POST {} (activeOnly={})", self.search_url, query.active_only);

        let response = self
            .client
            .post(self.search_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, authorization)
            .json(query)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: read_capped_body(response, MAX_ERROR_BODY_BYTES).await,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::NoResponse(format!("Failed to read Zefix response: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| TransportError::Decode(format!("Failed to parse Zefix response: {}", e)))
    }
}

/// Reads at most `limit` bytes of the body; the rest is never buffered.
async fn read_capped_body(mut response: reqwest::Response, limit: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let mut truncated = false;

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = limit - buf.len();
                if chunk.len() > room {
                    buf.extend_from_slice(&chunk[..room]);
                    truncated = true;
                    break;
                }
                buf.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(_) if buf.is_empty() => return "Unknown error".to_string(),
            Err(_) => break,
        }
    }

    let mut text = String::from_utf8_lossy(&buf).into_owned();
    if truncated {
        text.push_str(TRUNCATED_MARKER);
    }
    text
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Build(err.to_string())
    } else {
        TransportError::NoResponse(err.to_string())
    }
}
