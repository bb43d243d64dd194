//! Last-write-wins state cells shared between the session and its observers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::{
    codec::InboundMessage,
    domain::{GameState, GameStatus, PlayerBoard, RoomInfo},
};

/// All projections of one session
///
/// Each cell is a `watch` channel updated with `send_replace`, so observers
/// always see whole values. `epoch` identifies the connection allowed to
/// publish; it is bumped whenever a connection is torn down.
pub(crate) struct Projections {
    epoch: Mutex<u64>,
    pub(crate) connected: watch::Sender<bool>,
    pub(crate) room_info: watch::Sender<Option<RoomInfo>>,
    pub(crate) game_state: watch::Sender<Option<GameState>>,
    pub(crate) player_board: watch::Sender<Option<PlayerBoard>>,
    pub(crate) last_error: watch::Sender<Option<String>>,
    pub(crate) time_remaining: watch::Sender<i64>,
    pub(crate) game_status: watch::Sender<GameStatus>,
}

impl Projections {
    pub(crate) fn new() -> Self {
        Self {
            epoch: Mutex::new(0),
            connected: watch::Sender::new(false),
            room_info: watch::Sender::new(None),
            game_state: watch::Sender::new(None),
            player_board: watch::Sender::new(None),
            last_error: watch::Sender::new(None),
            time_remaining: watch::Sender::new(0),
            game_status: watch::Sender::new(GameStatus::default()),
        }
    }

    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invalidate every publisher handed out so far and mark the session closed.
    ///
    /// Returns the epoch for the next connection.
    pub(crate) fn retire(&self) -> u64 {
        let mut epoch = self.lock_epoch();
        *epoch += 1;
        self.connected.send_replace(false);
        *epoch
    }

    /// Clear every projection. Callers retire the current epoch first.
    pub(crate) fn clear(&self) {
        let _epoch = self.lock_epoch();
        self.connected.send_replace(false);
        self.room_info.send_replace(None);
        self.game_state.send_replace(None);
        self.player_board.send_replace(None);
        self.last_error.send_replace(None);
        self.time_remaining.send_replace(0);
        self.game_status.send_replace(GameStatus::default());
    }
}

/// Write handle bound to one connection epoch
///
/// Writes from a retired epoch are discarded, so nothing from a closed
/// connection can reach observers.
#[derive(Clone)]
pub(crate) struct Publisher {
    projections: Arc<Projections>,
    epoch: u64,
}

impl Publisher {
    pub(crate) fn new(projections: Arc<Projections>, epoch: u64) -> Self {
        Self { projections, epoch }
    }

    pub(crate) fn projections(&self) -> &Projections {
        &self.projections
    }

    /// Run `f` only while this publisher's epoch is current.
    fn publish(&self, f: impl FnOnce(&Projections)) -> bool {
        let epoch = self.projections.lock_epoch();
        if *epoch != self.epoch {
            return false;
        }
        f(&self.projections);
        true
    }

    pub(crate) fn set_connected(&self, connected: bool) -> bool {
        self.publish(|p| {
            p.connected.send_replace(connected);
        })
    }

    pub(crate) fn set_error(&self, error: String) -> bool {
        self.publish(|p| {
            p.last_error.send_replace(Some(error));
        })
    }

    pub(crate) fn transport_failed(&self, error: String) -> bool {
        self.publish(|p| {
            p.connected.send_replace(false);
            p.last_error.send_replace(Some(error));
        })
    }

    pub(crate) fn apply(&self, message: InboundMessage) -> bool {
        self.publish(|p| match message {
            InboundMessage::RoomInfo(info) => {
                p.room_info.send_replace(Some(info));
            }
            InboundMessage::GameState(state) => {
                p.game_state.send_replace(Some(state));
            }
            InboundMessage::PlayerBoard(board) => {
                p.player_board.send_replace(Some(board));
            }
        })
    }

    pub(crate) fn set_time_remaining(&self, remaining: i64) -> bool {
        self.publish(|p| {
            p.time_remaining.send_replace(remaining);
        })
    }

    pub(crate) fn set_game_status(&self, status: GameStatus) -> bool {
        self.publish(|p| {
            p.game_status.send_replace(status);
        })
    }
}
