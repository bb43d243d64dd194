//! HTTP client for room creation and lookup.

use async_trait::async_trait;
use serde::Deserialize;

use crate::{config::ClientConfig, error::ClientError};

/// Room lookup and creation, as needed before opening a session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// Create a room and return its code
    async fn create_room(&self) -> Result<String, ClientError>;

    /// Whether a room with `code` exists
    async fn room_exists(&self, code: &str) -> Result<bool, ClientError>;
}

#[derive(Debug, Deserialize)]
struct CreateRoomResponse {
    #[serde(default, rename = "roomCode")]
    room_code: String,
}

#[derive(Debug, Deserialize)]
struct RoomExistsResponse {
    #[serde(default)]
    exists: bool,
}

/// [`RoomDirectory`] backed by the game server's HTTP API
#[derive(Debug, Clone)]
pub struct RoomsClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RoomsClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl RoomDirectory for RoomsClient {
    /// `POST {api_url}/create-room`
    ///
    /// A success response without `roomCode` yields an empty code.
    async fn create_room(&self) -> Result<String, ClientError> {
        let url = self.config.api_endpoint("create-room");
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: CreateRoomResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        tracing::info!("Room '{}' created", parsed.room_code);
        Ok(parsed.room_code)
    }

    /// `GET {api_url}/room-exists/{code}`
    ///
    /// Non-success statuses and unreadable bodies count as "does not exist";
    /// only transport errors are reported as errors.
    async fn room_exists(&self, code: &str) -> Result<bool, ClientError> {
        let url = self.config.api_endpoint(&format!("room-exists/{code}"));
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::debug!("room-exists answered {}", response.status());
            return Ok(false);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str::<RoomExistsResponse>(&body)
            .map(|parsed| parsed.exists)
            .unwrap_or(false))
    }
}
