//! The `navigation-changed` channel
//!
//! Views publish the item they navigated to (or `None` when leaving a
//! section entirely); the breadcrumb tracker is the single consumer.
//! Delivery is FIFO per publisher.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Payload of a navigation change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Label shown in the breadcrumb trail
    pub name: String,
}

impl NavigationItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A `navigation-changed` notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// `None` means "no navigation item": the trail is cleared
    pub item: Option<NavigationItem>,
}

/// Create a connected publisher/subscription pair
pub fn navigation_channel() -> (NavigationPublisher, NavigationSubscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NavigationPublisher { tx }, NavigationSubscription { rx })
}

/// Sending half, cloned into every view that announces navigation
#[derive(Debug, Clone)]
pub struct NavigationPublisher {
    tx: mpsc::UnboundedSender<NavigationEvent>,
}

impl NavigationPublisher {
    /// Publish a navigation change
    ///
    /// Returns false if the subscriber has gone away.
    pub fn publish(&self, item: Option<NavigationItem>) -> bool {
        debug!("navigation-changed: {:?}", item);
        self.tx.send(NavigationEvent { item }).is_ok()
    }

    /// Announce navigation to a named item
    pub fn navigated_to(&self, name: impl Into<String>) -> bool {
        self.publish(Some(NavigationItem::new(name)))
    }

    /// Announce that no navigation item is active
    pub fn left_section(&self) -> bool {
        self.publish(None)
    }
}

/// Receiving half, owned by the tracker
#[derive(Debug)]
pub struct NavigationSubscription {
    rx: mpsc::UnboundedReceiver<NavigationEvent>,
}

impl NavigationSubscription {
    /// Wait for the next event; `None` once every publisher is dropped
    pub async fn recv(&mut self) -> Option<NavigationEvent> {
        self.rx.recv().await
    }

    /// Take the next queued event without waiting
    pub fn try_recv(&mut self) -> Option<NavigationEvent> {
        self.rx.try_recv().ok()
    }
}
