//! Terminal front-end for a room session.

mod formatter;
mod input;
mod runner;
mod ui;

pub use runner::{RoomTarget, resolve_room, run_client};
