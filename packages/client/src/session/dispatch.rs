//! Frame dispatcher: drains transport events and publishes projections.

use tokio::sync::mpsc;

use crate::codec::decode_frame;

use super::{projection::Publisher, transport::TransportEvent};

/// Consume events of one connection in arrival order.
///
/// Returns once the driver is gone. The connection is marked closed then,
/// since a driver that died without reporting leaves nothing behind it.
pub(crate) async fn dispatch(
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
    publisher: Publisher,
) {
    while let Some(event) = events.recv().await {
        handle_event(&publisher, event);
    }
    publisher.set_connected(false);
    tracing::debug!("Dispatcher stopped");
}

pub(crate) fn handle_event(publisher: &Publisher, event: TransportEvent) {
    match event {
        TransportEvent::Opened => {
            publisher.set_connected(true);
        }
        TransportEvent::Frame(text) => match decode_frame(&text) {
            Ok(Some(message)) => {
                publisher.apply(message);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Dropping malformed frame: {}", e);
                publisher.set_error(e.to_string());
            }
        },
        TransportEvent::Closed => {
            publisher.set_connected(false);
        }
        TransportEvent::Failed(error) => {
            publisher.transport_failed(error);
        }
    }
}
