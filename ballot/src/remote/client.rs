//! Async REST client for a server-authoritative ballot backend

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::types::{RemoteConfig, RemoteResults, ResetReceipt, VoteReceipt, VoteRequest};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// Result type for backend calls
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Client for the ballot backend's REST API
pub struct RemoteBallotClient {
    base_url: String,
    http_client: Client,
}

impl RemoteBallotClient {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: impl Into<String>) -> RemoteResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteError::InvalidUrl(base_url));
        }

        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET /config`
    pub async fn get_config(&self) -> RemoteResult<RemoteConfig> {
        let response = self.http_client.get(self.url("config")).send().await?;
        decode(response).await
    }

    /// `POST /vote` with `{"candidate": option}`
    pub async fn cast_vote(&self, option: &str) -> RemoteResult<VoteReceipt> {
        let response = self
            .http_client
            .post(self.url("vote"))
            .json(&VoteRequest { candidate: option })
            .send()
            .await?;
        let receipt: VoteReceipt = decode(response).await?;
        debug!(option, total_votes = receipt.total_votes, "Remote vote cast");
        Ok(receipt)
    }

    /// `POST /simulate/{count}`
    pub async fn simulate(&self, count: u32) -> RemoteResult<VoteReceipt> {
        let response = self
            .http_client
            .post(self.url(&format!("simulate/{count}")))
            .send()
            .await?;
        let receipt: VoteReceipt = decode(response).await?;
        info!(count, total_votes = receipt.total_votes, "Remote simulation complete");
        Ok(receipt)
    }

    /// `GET /results`
    pub async fn results(&self) -> RemoteResult<RemoteResults> {
        let response = self.http_client.get(self.url("results")).send().await?;
        decode(response).await
    }

    /// `POST /reset`
    pub async fn reset(&self) -> RemoteResult<ResetReceipt> {
        let response = self.http_client.post(self.url("reset")).send().await?;
        let receipt: ResetReceipt = decode(response).await?;
        info!(base_url = %self.base_url, "Remote votes reset");
        Ok(receipt)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}
