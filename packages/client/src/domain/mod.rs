//! Value types published by the room session.
//!
//! Every type here is owned by whichever projection last published it and is
//! replaced wholesale on each update.

mod board;
mod game;
mod room;

pub use board::{Command, ControlStyle, Instruction, PlayerBoard};
pub use game::{GamePhase, GameState, GameStateKind, GameStatus, TryHistoryItem};
pub use room::{LobbyPlayer, PlayerInfo, RoomInfo};
