//! Client configuration.

use std::time::Duration;

/// Default WebSocket endpoint of the game backend.
pub const DEFAULT_SOCKET_URL: &str = "wss://backend.rogueai.surpuissant.io";
/// Default HTTP endpoint of the game backend.
pub const DEFAULT_API_URL: &str = "https://backend.rogueai.surpuissant.io";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(20);
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Shortest interval accepted for periodic timers (`tokio::time::interval` rejects zero).
pub(crate) const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Endpoints and timings used by [`RoomSession`](crate::RoomSession) and
/// [`RoomsClient`](crate::RoomsClient).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rogueai_client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_socket_url("ws://127.0.0.1:8080")
///     .with_tick_interval(Duration::from_millis(50));
/// assert_eq!(config.room_url("ABC123"), "ws://127.0.0.1:8080/?room=ABC123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base WebSocket URL; the room code is appended as `/?room=<code>`.
    pub socket_url: String,
    /// Base HTTP URL for `create-room` and `room-exists`.
    pub api_url: String,
    /// Upper bound on the WebSocket handshake.
    pub connect_timeout: Duration,
    /// Upper bound on each HTTP request.
    pub http_timeout: Duration,
    /// Interval between keep-alive pings on an open socket.
    pub ping_interval: Duration,
    /// Cadence of the instruction countdown.
    pub tick_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_url: DEFAULT_SOCKET_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            ping_interval: DEFAULT_PING_INTERVAL,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_socket_url(mut self, url: impl Into<String>) -> Self {
        self.socket_url = url.into();
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Zero is clamped to one millisecond.
    #[must_use]
    pub fn with_ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Zero is clamped to one millisecond.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// WebSocket URL for a room. The code is used verbatim.
    pub fn room_url(&self, room_code: &str) -> String {
        format!(
            "{}/?room={}",
            self.socket_url.trim_end_matches('/'),
            room_code
        )
    }

    /// HTTP URL for an API path such as `create-room`.
    pub fn api_endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
