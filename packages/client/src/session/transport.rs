//! WebSocket transport driver for one connection.
//!
//! The driver owns the socket. It forwards connection events and text frames
//! onto a single-consumer channel, in arrival order, and writes whatever the
//! session hands it through the outbound channel.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::{
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        self,
        protocol::{CloseFrame, Message, frame::coding::CloseCode},
    },
};

const CLOSE_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(1);

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Work handed from the session to the driver
#[derive(Debug)]
pub(crate) enum Outbound {
    Frame(String),
    Close { code: u16, reason: String },
}

/// What the driver reports back
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TransportEvent {
    Opened,
    Frame(String),
    Closed,
    Failed(String),
}

#[derive(Debug, Clone)]
pub(crate) struct TransportSettings {
    pub(crate) connect_timeout: Duration,
    pub(crate) ping_interval: Duration,
}

/// Connect to `url` and pump frames until closed.
///
/// Frames queued on `outbound` before the handshake completes are written
/// once the socket is open. A close request during the handshake abandons it.
/// A dropped outbound sender counts as a normal close.
pub(crate) async fn drive(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<TransportEvent>,
    settings: TransportSettings,
) {
    tracing::info!("Connecting to {}", url);

    let connect = time::timeout(settings.connect_timeout, connect_async(url.as_str()));
    tokio::pin!(connect);
    let mut pending = Vec::new();
    let connected = loop {
        tokio::select! {
            result = &mut connect => break result,
            command = outbound.recv() => match command {
                Some(Outbound::Frame(text)) => pending.push(text),
                Some(Outbound::Close { .. }) | None => {
                    tracing::info!("Connection attempt to {} abandoned", url);
                    return;
                }
            },
        }
    };

    let mut socket = match connected {
        Ok(Ok((socket, _response))) => socket,
        Ok(Err(e)) => {
            tracing::warn!("WebSocket connection to {} failed: {}", url, e);
            let _ = events.send(TransportEvent::Failed(e.to_string()));
            return;
        }
        Err(_) => {
            tracing::warn!("WebSocket connection to {} timed out", url);
            let _ = events.send(TransportEvent::Failed(format!(
                "Connection timed out after {:?}",
                settings.connect_timeout
            )));
            return;
        }
    };

    tracing::info!("Connected to {}", url);
    let _ = events.send(TransportEvent::Opened);

    for text in pending {
        if let Err(e) = socket.send(Message::Text(text.into())).await {
            tracing::warn!("Failed to send queued frame: {}", e);
            let _ = events.send(TransportEvent::Failed(e.to_string()));
            return;
        }
    }

    let mut keepalive = time::interval(settings.ping_interval);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    keepalive.tick().await;

    loop {
        tokio::select! {
            incoming = socket.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(TransportEvent::Frame(text.as_str().to_owned()));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!("Server closed the connection: {:?}", frame);
                    // Let tungstenite flush the close reply before the stream ends.
                    drain(&mut socket).await;
                    let _ = events.send(TransportEvent::Closed);
                    return;
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Some(Ok(_)) => {}
                Some(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)) | None => {
                    tracing::info!("Connection to {} ended", url);
                    let _ = events.send(TransportEvent::Closed);
                    return;
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    let _ = events.send(TransportEvent::Failed(e.to_string()));
                    return;
                }
            },
            command = outbound.recv() => match command {
                Some(Outbound::Frame(text)) => {
                    if let Err(e) = socket.send(Message::Text(text.into())).await {
                        tracing::warn!("Failed to send frame: {}", e);
                        let _ = events.send(TransportEvent::Failed(e.to_string()));
                        return;
                    }
                }
                Some(Outbound::Close { code, reason }) => {
                    close(&mut socket, code, reason).await;
                    return;
                }
                None => {
                    close(&mut socket, u16::from(CloseCode::Normal), String::new()).await;
                    return;
                }
            },
            _ = keepalive.tick() => {
                if let Err(e) = socket.send(Message::Ping(Default::default())).await {
                    tracing::warn!("Failed to send keep-alive ping: {}", e);
                    let _ = events.send(TransportEvent::Failed(e.to_string()));
                    return;
                }
            }
        }
    }
}

/// Client-initiated close handshake, bounded by [`CLOSE_HANDSHAKE_TIMEOUT`].
async fn close(socket: &mut Socket, code: u16, reason: String) {
    tracing::info!("Closing connection ({}: {})", code, reason);
    let frame = CloseFrame {
        code: CloseCode::from(code),
        reason: reason.into(),
    };
    if let Err(e) = socket.close(Some(frame)).await {
        tracing::debug!("Close frame not delivered: {}", e);
        return;
    }
    drain(socket).await;
}

/// Read until the peer finishes the close handshake or the timeout elapses.
async fn drain(socket: &mut Socket) {
    let finished = time::timeout(CLOSE_HANDSHAKE_TIMEOUT, async {
        while let Some(Ok(_)) = socket.next().await {}
    })
    .await;
    if finished.is_err() {
        tracing::debug!("Close handshake timed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_refused_reports_failure() {
        // テスト項目: 接続できないアドレスでは Failed イベントが送られる
        // given (前提条件):
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let (_outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let settings = TransportSettings {
            connect_timeout: Duration::from_secs(2),
            ping_interval: Duration::from_secs(20),
        };

        // when (操作):
        drive(format!("ws://{addr}/?room=ABC123"), outbound_rx, events_tx, settings).await;

        // then (期待する結果):
        let event = events_rx.recv().await;
        assert!(matches!(event, Some(TransportEvent::Failed(ref msg)) if !msg.is_empty()));
        assert_eq!(events_rx.recv().await, None);
    }
}
