//! Write notifications.
//!
//! Every successful mutation emits an [`Event`]. Consumers treat these as
//! render hints (a dashboard refetches its snapshot); nothing here is a
//! correctness mechanism, and a dropped event loses no data.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderSubmitted {
        order_number: String,
        line_count: usize,
    },
    OrderReplaced {
        order_number: String,
        line_count: usize,
    },
    OrderDeleted {
        order_number: String,
    },
    StockInRecorded {
        id: i64,
    },
    StockInDeleted {
        id: i64,
    },
    WastageRecorded {
        id: i64,
    },
    WastageDeleted {
        id: i64,
    },
    ProductAdded {
        id: i64,
    },
    ProductDeleted {
        id: i64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates a connected sender/receiver pair with a bounded buffer.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains events and logs them. Spawned once at startup; exits when every
/// sender is gone.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "data changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_events_in_order() {
        let (sender, mut rx) = channel(8);
        sender
            .send(Event::OrderSubmitted {
                order_number: "ORD-1".into(),
                line_count: 2,
            })
            .await
            .unwrap();
        sender
            .send(Event::OrderDeleted {
                order_number: "ORD-1".into(),
            })
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::OrderSubmitted { line_count: 2, .. })
        ));
        assert!(matches!(rx.recv().await, Some(Event::OrderDeleted { .. })));
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (sender, rx) = channel(1);
        drop(rx);
        assert!(sender
            .send(Event::ProductAdded { id: 1 })
            .await
            .is_err());
    }
}
