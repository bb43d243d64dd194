//! Error types for the Rogue AI room client.

use thiserror::Error;

/// Client-level errors (HTTP directory calls and the terminal runner)
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request could not be performed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP error: {0}")]
    UnexpectedStatus(u16),

    /// The response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The requested room does not exist on the server
    #[error("Room '{0}' not found")]
    RoomNotFound(String),
}

/// Errors raised while decoding an inbound frame
///
/// Only top-level failures are errors. Frames that parse but lack a required
/// node are dropped without an error.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The frame is not valid JSON
    #[error("Failed to parse message: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The frame is valid JSON but not an object
    #[error("Failed to parse message: expected a JSON object")]
    NotAnObject,
}
