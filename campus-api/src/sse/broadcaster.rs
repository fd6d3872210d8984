//! SSE broadcaster for real-time dashboard updates
//!
//! In-memory fanout of [`ChangeEvent`]s to every connected dashboard
//! session. Delivery is at-most-once: no queue, no persistence, no replay
//! buffer, no per-client cursor. A subscriber that is not connected at
//! publish time never sees that event; reconnect-on-drop is the client's
//! responsibility.

use axum::response::sse::{Event, KeepAlive, Sse};
use campus_common::events::ChangeEvent;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

/// Change-event fanout over a tokio broadcast channel.
///
/// The channel's receiver registry is the subscriber set: concurrency-safe,
/// process-wide, alive for the process lifetime. Dropping a receiver on
/// disconnect promptly removes it from the fanout.
#[derive(Clone)]
pub struct ChangeBroadcaster {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeBroadcaster {
    /// Create a new broadcaster
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events buffered per slow subscriber before
    ///   it starts lagging (recommended: 100)
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        info!("Change broadcaster initialized with capacity {}", capacity);
        Self { tx }
    }

    /// Publish an event to all connected dashboards.
    ///
    /// Fire-and-forget: never suspends on slow subscribers, and a send with
    /// no connected dashboards is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        if let Ok(count) = self.tx.send(event) {
            debug!("Broadcast change event to {} clients", count);
        }
    }

    /// Get current number of connected clients
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Create an SSE stream for a new client connection.
    ///
    /// A lagged or closed receiver error affects only this client's stream;
    /// it is logged and skipped, never aborting delivery to others.
    pub fn subscribe_stream(&self) -> impl Stream<Item = Result<Event, Infallible>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx);

        stream.filter_map(|result| async move {
            match result {
                Ok(change_event) => {
                    let event = Event::default().json_data(&change_event).ok();
                    event.map(Ok)
                }
                Err(e) => {
                    warn!("SSE client error: {:?}", e);
                    None
                }
            }
        })
    }

    /// Create an Axum SSE response for GET /api/v1/stream
    pub fn handle_sse_connection(&self) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        info!(
            "New SSE client connected, total clients: {}",
            self.client_count()
        );

        Sse::new(self.subscribe_stream()).keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("keep-alive"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_common::events::ChangeAction;

    #[tokio::test]
    async fn connected_subscriber_receives_event_exactly_once() {
        let broadcaster = ChangeBroadcaster::new(16);
        let mut rx = broadcaster.tx.subscribe();

        broadcaster.publish(ChangeEvent::deleted("assignments", "a-1"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.action, ChangeAction::Delete);
        assert_eq!(event.id.as_deref(), Some("a-1"));

        // Nothing else queued
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn disconnected_subscriber_never_receives_later_events() {
        let broadcaster = ChangeBroadcaster::new(16);
        let rx = broadcaster.tx.subscribe();
        assert_eq!(broadcaster.client_count(), 1);

        drop(rx);
        assert_eq!(broadcaster.client_count(), 0);

        // No receivers; publish must not error or panic
        broadcaster.publish(ChangeEvent::deleted("assignments", "a-2"));

        // A new subscriber only sees events published after it connected
        let mut late = broadcaster.tx.subscribe();
        broadcaster.publish(ChangeEvent::deleted("assignments", "a-3"));
        let event = late.recv().await.unwrap();
        assert_eq!(event.id.as_deref(), Some("a-3"));
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let broadcaster = ChangeBroadcaster::new(16);
        let mut rx = broadcaster.tx.subscribe();

        for sid in ["s-1", "s-2", "s-3"] {
            broadcaster.publish(ChangeEvent::deleted("students", sid));
        }

        for expected in ["s-1", "s-2", "s-3"] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.id.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn stream_yields_json_encoded_events() {
        let broadcaster = ChangeBroadcaster::new(16);
        let mut stream = Box::pin(broadcaster.subscribe_stream());

        broadcaster.publish(ChangeEvent::created(
            "students",
            &serde_json::json!({"sid": "S1"}),
        ));

        let event = stream.next().await.unwrap();
        assert!(event.is_ok());
    }
}
