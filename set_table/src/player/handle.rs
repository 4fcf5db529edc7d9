//! Player handle: what the dealer sees of a seated player.

use crate::game::{PlayerId, Slot};
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use tokio::sync::mpsc;

/// What the dealer needs from a seated player.
///
/// The callbacks are signals only; any freeze that follows a verdict is the
/// player's own business and must not block the dealer.
pub trait Contestant: Send + Sync {
    fn id(&self) -> PlayerId;

    /// Current score, read when announcing winners
    fn score(&self) -> u32;

    /// The player's claim was a legal set
    fn on_scored(&self);

    /// The player's claim was not a legal set
    fn on_penalized(&self);

    /// The player's token on `slot` was cleared because the slot was vacated
    fn on_token_lost(&self, slot: Slot);
}

/// Messages delivered to a player actor's inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMessage {
    Scored,
    Penalized,
    TokenLost(Slot),
}

/// Cheap cloneable handle to a player actor
#[derive(Clone, Debug)]
pub struct PlayerHandle {
    id: PlayerId,
    score: Arc<AtomicU32>,
    sender: mpsc::Sender<PlayerMessage>,
}

impl PlayerHandle {
    /// Inbox capacity; verdicts are one at a time, lost tokens at most one
    /// per slot per sweep.
    pub const INBOX_CAPACITY: usize = 64;

    /// Create a handle and the inbox its actor reads from
    pub fn new(id: PlayerId) -> (Self, mpsc::Receiver<PlayerMessage>) {
        let (sender, inbox) = mpsc::channel(Self::INBOX_CAPACITY);
        let handle = Self {
            id,
            score: Arc::new(AtomicU32::new(0)),
            sender,
        };
        (handle, inbox)
    }

    fn notify(&self, message: PlayerMessage) {
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(message)) => {
                log::warn!("Player {} inbox full, dropping {:?}", self.id, message);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("Player {} has left, not notifying", self.id);
            }
        }
    }
}

impl Contestant for PlayerHandle {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn score(&self) -> u32 {
        self.score.load(Ordering::Acquire)
    }

    fn on_scored(&self) {
        self.score.fetch_add(1, Ordering::AcqRel);
        self.notify(PlayerMessage::Scored);
    }

    fn on_penalized(&self) {
        self.notify(PlayerMessage::Penalized);
    }

    fn on_token_lost(&self, slot: Slot) {
        self.notify(PlayerMessage::TokenLost(slot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_increments_and_notifies() {
        let (handle, mut inbox) = PlayerHandle::new(3);

        handle.on_scored();
        handle.on_scored();

        assert_eq!(handle.id(), 3);
        assert_eq!(handle.score(), 2);
        assert_eq!(inbox.try_recv().unwrap(), PlayerMessage::Scored);
        assert_eq!(inbox.try_recv().unwrap(), PlayerMessage::Scored);
    }

    #[test]
    fn test_penalty_leaves_score() {
        let (handle, mut inbox) = PlayerHandle::new(0);

        handle.on_penalized();
        handle.on_token_lost(4);

        assert_eq!(handle.score(), 0);
        assert_eq!(inbox.try_recv().unwrap(), PlayerMessage::Penalized);
        assert_eq!(inbox.try_recv().unwrap(), PlayerMessage::TokenLost(4));
    }

    #[test]
    fn test_clones_share_score() {
        let (handle, inbox) = PlayerHandle::new(1);
        let clone = handle.clone();
        drop(inbox);

        clone.on_scored();
        assert_eq!(handle.score(), 1);
    }
}
