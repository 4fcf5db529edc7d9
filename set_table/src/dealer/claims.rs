//! Claim channel: players ask the dealer to adjudicate their current claim.
//!
//! A bounded tokio mpsc channel carries bare player ids. Capacity equals the
//! number of players, and tokio hands out capacity to blocked senders in the
//! order they started waiting, so claims are served strictly first come,
//! first served.

use crate::game::PlayerId;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Claim submission errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    /// Every slot in the channel is taken
    #[error("Claim channel full, dropping claim from player {0}")]
    Full(PlayerId),

    /// The dealer is gone
    #[error("Claim channel closed, dealer has stopped")]
    Closed,
}

/// Result type for claim submission
pub type ClaimResult<T> = Result<T, ClaimError>;

/// Create a claim channel with room for `capacity` outstanding claims
pub fn claim_channel(capacity: usize) -> (ClaimSender, ClaimReceiver) {
    let (sender, inbox) = mpsc::channel(capacity.max(1));
    (ClaimSender { sender }, ClaimReceiver { inbox })
}

/// Player side of the claim channel
#[derive(Clone, Debug)]
pub struct ClaimSender {
    sender: mpsc::Sender<PlayerId>,
}

impl ClaimSender {
    /// Enqueue a claim without waiting
    pub fn submit(&self, player: PlayerId) -> ClaimResult<()> {
        self.sender.try_send(player).map_err(|e| match e {
            mpsc::error::TrySendError::Full(player) => ClaimError::Full(player),
            mpsc::error::TrySendError::Closed(_) => ClaimError::Closed,
        })
    }

    /// Enqueue a claim, waiting for room in arrival order
    pub async fn submit_wait(&self, player: PlayerId) -> ClaimResult<()> {
        self.sender
            .send(player)
            .await
            .map_err(|_| ClaimError::Closed)
    }
}

/// Dealer side of the claim channel
#[derive(Debug)]
pub struct ClaimReceiver {
    inbox: mpsc::Receiver<PlayerId>,
}

impl ClaimReceiver {
    /// Next claim in arrival order, waiting at most `timeout`.
    ///
    /// A channel with no senders left behaves like an empty one: the call
    /// still waits out `timeout` before returning `None`.
    pub async fn try_take_one(&mut self, timeout: Duration) -> Option<PlayerId> {
        let deadline = tokio::time::Instant::now() + timeout;
        match tokio::time::timeout_at(deadline, self.inbox.recv()).await {
            Ok(Some(player)) => Some(player),
            Ok(None) => {
                tokio::time::sleep_until(deadline).await;
                None
            }
            Err(_) => None,
        }
    }

    /// Every claim already queued, oldest first, without waiting
    pub fn drain_pending(&mut self) -> Vec<PlayerId> {
        let mut pending = Vec::new();
        while let Ok(player) = self.inbox.try_recv() {
            pending.push(player);
        }
        pending
    }

    /// Number of claims waiting to be served
    pub fn len(&self) -> usize {
        self.inbox.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.is_empty()
    }
}
