//! Wire codec for room-session frames.
//!
//! Inbound frames are decoded defensively from `serde_json::Value`: every
//! field falls back to a type-appropriate default and only a handful of
//! structural nodes can reject a frame. Outbound frames are plain serde
//! types.

mod inbound;
mod json;
mod outbound;

pub use inbound::{InboundMessage, decode_frame};
pub use outbound::OutboundMessage;
