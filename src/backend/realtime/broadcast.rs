/**
 * Outbound Delivery
 *
 * Every live connection owns an outbox: the sending half of an unbounded
 * channel drained by that connection's writer task. Fan-out is a loop of
 * non-blocking sends, so it can run while the presence lock is held.
 *
 * Delivery is best effort. A connection that closed between lookup and send
 * simply does not receive the event; nothing is retried or queued.
 */

use tokio::sync::mpsc;

use crate::shared::ServerEvent;

/// Sending half of a connection's outbound queue
pub type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// Receiving half, drained by the socket writer
pub type Inbox = mpsc::UnboundedReceiver<ServerEvent>;

/// Create a connection outbox
pub fn outbox() -> (Outbox, Inbox) {
    mpsc::unbounded_channel()
}

/// Push one event to one connection
///
/// # Returns
///
/// `false` if the connection has already gone away
pub fn deliver(outbox: &Outbox, event: ServerEvent) -> bool {
    let name = event.name();
    match outbox.send(event) {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("[Realtime] Dropped {} for a closed connection", name);
            false
        }
    }
}

/// Push one event to many connections
///
/// # Returns
///
/// Number of connections that accepted the event
pub fn broadcast_event<'a>(outboxes: impl IntoIterator<Item = &'a Outbox>, event: &ServerEvent) -> usize {
    let delivered = outboxes
        .into_iter()
        .filter(|outbox| deliver(outbox, event.clone()))
        .count();
    tracing::debug!("[Realtime] {} delivered to {} connections", event.name(), delivered);
    delivered
}
