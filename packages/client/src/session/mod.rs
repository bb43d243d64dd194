//! Room session: one WebSocket connection and its state projections.

mod dispatch;
mod projection;
mod transport;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rogueai_shared::time::{Clock, SystemClock};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    codec::OutboundMessage,
    config::{ClientConfig, MIN_INTERVAL},
    countdown::CountdownProjector,
    domain::{GameState, GameStatus, PlayerBoard, RoomInfo},
};

pub(crate) use projection::{Projections, Publisher};
use transport::{Outbound, TransportSettings};

/// Normal-closure code used by [`RoomSession::close_normal`].
pub const NORMAL_CLOSURE: u16 = 1000;
/// Reason sent by [`RoomSession::close_normal`].
pub const CLIENT_CLOSING: &str = "client closing";

type Slot = Arc<Mutex<Option<Connection>>>;

/// Tasks and outbound queue of the live connection
struct Connection {
    epoch: u64,
    room_code: String,
    outbound: mpsc::UnboundedSender<Outbound>,
    driver: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
    countdown: JoinHandle<()>,
}

impl Connection {
    /// Release the connection unconditionally.
    ///
    /// Dispatcher and countdown stop at once. The driver performs the close
    /// handshake if the socket is still up, or is aborted otherwise.
    fn shutdown(self, code: u16, reason: &str) {
        self.dispatcher.abort();
        self.countdown.abort();
        let request = Outbound::Close {
            code,
            reason: reason.to_string(),
        };
        if self.outbound.send(request).is_err() {
            self.driver.abort();
        }
        tracing::info!("Connection to room '{}' released", self.room_code);
    }
}

fn lock_slot(slot: &Mutex<Option<Connection>>) -> MutexGuard<'_, Option<Connection>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drop the connection of `epoch` once its transport has ended.
///
/// Runs on the dispatcher after the last transport event is applied. A slot
/// already taken over by a newer `open` is left alone.
fn release_ended(slot: &Mutex<Option<Connection>>, epoch: u64) {
    let Some(connection) = lock_slot(slot).take_if(|connection| connection.epoch == epoch) else {
        return;
    };
    connection.countdown.abort();
    tracing::info!("Connection to room '{}' ended", connection.room_code);
}

/// Client side of a game room
///
/// Owns at most one WebSocket connection at a time and publishes what the
/// server pushes as independent projections. Share it by reference or `Arc`;
/// every operation takes `&self`.
///
/// # Example
///
/// ```no_run
/// # async fn demo() {
/// use rogueai_client::{ClientConfig, RoomSession};
///
/// let session = RoomSession::new(ClientConfig::default());
/// let mut room = session.room_info();
/// session.open("ABC123");
/// room.changed().await.ok();
/// session.send_ready(true);
/// # }
/// ```
pub struct RoomSession {
    config: ClientConfig,
    clock: Arc<dyn Clock>,
    projections: Arc<Projections>,
    connection: Slot,
}

impl RoomSession {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Use `clock` as the countdown's time source.
    pub fn with_clock(config: ClientConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            projections: Arc::new(Projections::new()),
            connection: Arc::new(Mutex::new(None)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn lock_connection(&self) -> MutexGuard<'_, Option<Connection>> {
        lock_slot(&self.connection)
    }

    /// Connect to `room_code`, closing any previous connection first.
    ///
    /// Must be called from within a Tokio runtime; the connection's tasks are
    /// spawned onto it. The code is used verbatim in the query string.
    /// Projections keep their values until the new connection replaces them.
    /// When the transport ends on its own (server close or failure) the
    /// connection is released and [`room_code`](Self::room_code) turns `None`.
    pub fn open(&self, room_code: &str) {
        let mut slot = self.lock_connection();
        if let Some(previous) = slot.take() {
            previous.shutdown(NORMAL_CLOSURE, CLIENT_CLOSING);
        }
        let epoch = self.projections.retire();
        let publisher = Publisher::new(self.projections.clone(), epoch);

        let url = self.config.room_url(room_code);
        let settings = TransportSettings {
            connect_timeout: self.config.connect_timeout,
            ping_interval: self.config.ping_interval.max(MIN_INTERVAL),
        };
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let driver = tokio::spawn(transport::drive(url, outbound_rx, events_tx, settings));
        let ended_slot = self.connection.clone();
        let dispatch_publisher = publisher.clone();
        let dispatcher = tokio::spawn(async move {
            dispatch::dispatch(events_rx, dispatch_publisher).await;
            release_ended(&ended_slot, epoch);
        });
        let tick_interval = self.config.tick_interval.max(MIN_INTERVAL);
        let countdown = CountdownProjector::new(self.clock.clone(), tick_interval).spawn(publisher);

        tracing::info!("Opening room '{}'", room_code);
        *slot = Some(Connection {
            epoch,
            room_code: room_code.to_string(),
            outbound: outbound_tx,
            driver,
            dispatcher,
            countdown,
        });
    }

    /// Close the connection, if any. Idempotent; never publishes an error.
    pub fn close(&self, code: u16, reason: &str) {
        let mut slot = self.lock_connection();
        if let Some(connection) = slot.take() {
            connection.shutdown(code, reason);
        }
        self.projections.retire();
    }

    /// [`close`](Self::close) with code 1000 and `"client closing"`.
    pub fn close_normal(&self) {
        self.close(NORMAL_CLOSURE, CLIENT_CLOSING);
    }

    /// Close and clear every projection, including the last error.
    pub fn reset_all(&self) {
        let mut slot = self.lock_connection();
        if let Some(connection) = slot.take() {
            connection.shutdown(NORMAL_CLOSURE, CLIENT_CLOSING);
        }
        self.projections.retire();
        self.projections.clear();
    }

    /// Room code of the live connection
    pub fn room_code(&self) -> Option<String> {
        self.lock_connection()
            .as_ref()
            .map(|connection| connection.room_code.clone())
    }

    /// Announce whether the local player is ready.
    ///
    /// Returns whether the frame was handed to the transport.
    pub fn send_ready(&self, ready: bool) -> bool {
        self.send(&OutboundMessage::Room { ready })
    }

    /// Flip the local player's ready flag as last reported by the server.
    pub fn toggle_ready(&self) -> bool {
        let ready = self
            .projections
            .room_info
            .borrow()
            .as_ref()
            .is_some_and(|info| info.you.ready);
        self.send_ready(!ready)
    }

    /// Perform `action` on the board command `command_id`.
    pub fn send_execute_action(&self, command_id: &str, action: &str) -> bool {
        self.send(&OutboundMessage::ExecuteAction {
            command_id: command_id.to_string(),
            action: action.to_string(),
        })
    }

    /// Ask the server for a new display name.
    pub fn refresh_name(&self) -> bool {
        self.send(&OutboundMessage::RefreshName)
    }

    /// Fire-and-forget handoff; no acknowledgement, no retry.
    fn send(&self, message: &OutboundMessage) -> bool {
        let frame = match message.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                return false;
            }
        };
        let slot = self.lock_connection();
        let Some(connection) = slot.as_ref() else {
            tracing::debug!("No live connection, dropping {:?}", message);
            return false;
        };
        connection.outbound.send(Outbound::Frame(frame)).is_ok()
    }

    pub fn connected(&self) -> watch::Receiver<bool> {
        self.projections.connected.subscribe()
    }

    pub fn room_info(&self) -> watch::Receiver<Option<RoomInfo>> {
        self.projections.room_info.subscribe()
    }

    pub fn game_state(&self) -> watch::Receiver<Option<GameState>> {
        self.projections.game_state.subscribe()
    }

    pub fn player_board(&self) -> watch::Receiver<Option<PlayerBoard>> {
        self.projections.player_board.subscribe()
    }

    pub fn last_error(&self) -> watch::Receiver<Option<String>> {
        self.projections.last_error.subscribe()
    }

    /// Milliseconds left on the active instruction
    pub fn time_remaining(&self) -> watch::Receiver<i64> {
        self.projections.time_remaining.subscribe()
    }

    pub fn game_status(&self) -> watch::Receiver<GameStatus> {
        self.projections.game_status.subscribe()
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        self.close_normal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sends_without_connection_return_false() {
        // テスト項目: 接続が無い状態での送信は false を返し、エラーは公開されない
        // given (前提条件):
        let session = RoomSession::new(ClientConfig::default());

        // when (操作):
        let action = session.send_execute_action("cmd-7", "toggle");
        let ready = session.send_ready(true);
        let name = session.refresh_name();
        let toggle = session.toggle_ready();

        // then (期待する結果):
        assert!(!action);
        assert!(!ready);
        assert!(!name);
        assert!(!toggle);
        assert!(session.last_error().borrow().is_none());
    }

    #[test]
    fn test_close_twice_is_idempotent() {
        // テスト項目: close を 2 回呼んでも 1 回と同じ結果になる
        // given (前提条件):
        let session = RoomSession::new(ClientConfig::default());

        // when (操作):
        session.close_normal();
        let after_first = (*session.connected().borrow(), session.last_error().borrow().clone());
        session.close_normal();
        let after_second = (*session.connected().borrow(), session.last_error().borrow().clone());

        // then (期待する結果):
        assert_eq!(after_first, (false, None));
        assert_eq!(after_first, after_second);
        assert!(session.room_code().is_none());
    }

    #[tokio::test]
    async fn test_send_before_handshake_is_queued() {
        // テスト項目: ハンドシェイク前でも接続があれば送信は受け付けられる
        // given (前提条件):
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let session = RoomSession::new(
            ClientConfig::default().with_socket_url(format!("ws://{addr}")),
        );

        // when (操作):
        session.open("ABC123");
        let handed_over = session.send_ready(true);

        // then (期待する結果):
        assert!(handed_over);
        assert_eq!(session.room_code().as_deref(), Some("ABC123"));
        session.close_normal();
        assert!(!session.send_ready(false));
    }
}
