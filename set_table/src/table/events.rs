//! Table event types and the fire-and-forget subscriber bus.

use crate::game::{Card, PlayerId, Slot};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;

/// Notification sent when something visible at the table changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    /// A card was dealt into a slot
    CardPlaced { card: Card, slot: Slot },
    /// A slot was vacated
    CardRemoved { slot: Slot },
    /// A player put a token on a slot
    TokenPlaced { player: PlayerId, slot: Slot },
    /// A token left a slot (taken back, or cleared with the card)
    TokenRemoved { player: PlayerId, slot: Slot },
    /// Round countdown refresh
    Countdown { remaining: Duration, warn: bool },
    /// A correct claim was scored
    ScoreChanged { player: PlayerId, score: u32 },
    /// A wrong claim was penalized
    Penalized { player: PlayerId },
    /// A player is frozen for `remaining` (zero once the freeze ends)
    Frozen { player: PlayerId, remaining: Duration },
    /// Final result, every player tied at the top score
    Winners(Vec<PlayerId>),
}

/// Broadcasts table events to any number of subscribers.
///
/// Publishing never waits: a subscriber whose channel is full misses the
/// event, and a subscriber that hung up is dropped.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<mpsc::Sender<TableEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber with room for `capacity` undelivered events
    pub fn subscribe(&self, capacity: usize) -> mpsc::Receiver<TableEvent> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Broadcast an event to all subscribers
    pub fn publish(&self, event: TableEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        subscribers.retain(|sender| match sender.try_send(event.clone()) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Subscriber channel full, dropping {:?}", event);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("Subscriber disconnected, removing");
                false
            }
        });
    }
}
