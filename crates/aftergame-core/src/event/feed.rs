//! Broadcast change feed with explicit subscription teardown.
//!
//! Built on `tokio::sync::broadcast`, the `ChangeFeed` supports multiple
//! concurrent subscribers. Publishing with no active subscribers is a no-op.
//! A [`Subscription`] stops receiving as soon as [`Subscription::unsubscribe`]
//! is called or the subscription is dropped, whichever comes first.

use tokio::sync::broadcast;

use aftergame_types::event::{ChangeEvent, ChangeFilter};

/// Multi-consumer feed of row-level changes.
///
/// Cloning the feed clones the sender, allowing multiple producers.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    /// Create a feed with the given per-subscriber buffer.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive future events matching `filter`.
    pub fn subscribe(&self, filter: ChangeFilter) -> Subscription {
        Subscription {
            receiver: Some(self.sender.subscribe()),
            filter,
        }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ChangeEvent) {
        tracing::trace!(table = ?event.table, kind = ?event.kind, row_id = %event.row_id, "change published");
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

/// A live, filtered view of the feed.
#[derive(Debug)]
pub struct Subscription {
    receiver: Option<broadcast::Receiver<ChangeEvent>>,
    filter: ChangeFilter,
}

impl Subscription {
    /// Wait for the next matching event.
    ///
    /// Returns `None` once unsubscribed or when every publisher is gone.
    /// Events missed because this subscriber lagged are skipped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            let receiver = self.receiver.as_mut()?;
            match receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change subscriber lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.receiver = None;
                    return None;
                }
            }
        }
    }

    /// Stop receiving. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.receiver.take().is_some() {
            tracing::debug!("change subscription closed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
