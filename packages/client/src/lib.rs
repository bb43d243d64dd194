//! Client for Rogue AI game rooms.
//!
//! [`RoomSession`] keeps one WebSocket connection to a room and publishes
//! what the server pushes as independent `watch` projections. [`RoomsClient`]
//! creates and looks up rooms over HTTP. The `rogueai-client` binary wraps
//! both in a terminal front-end.

pub mod api;
pub mod codec;
pub mod config;
pub mod countdown;
pub mod domain;
pub mod error;
pub mod session;
pub mod terminal;

pub use api::{RoomDirectory, RoomsClient};
pub use config::ClientConfig;
pub use countdown::remaining_millis;
pub use domain::{
    Command, ControlStyle, GamePhase, GameState, GameStateKind, GameStatus, Instruction,
    LobbyPlayer, PlayerBoard, PlayerInfo, RoomInfo, TryHistoryItem,
};
pub use error::{ClientError, FrameError};
pub use session::{CLIENT_CLOSING, NORMAL_CLOSURE, RoomSession};
