//! Outbound frame serialization.

use serde::Serialize;

/// Actions the client sends to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Ready / not ready in the lobby
    Room { ready: bool },
    /// Ask the server for a new display name
    RefreshName,
    /// Act on a board command
    ExecuteAction { command_id: String, action: String },
}

impl OutboundMessage {
    /// Serialize to a text frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
