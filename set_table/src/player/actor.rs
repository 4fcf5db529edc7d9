//! Automated player: picks slots, toggles tokens, and submits claims.

use super::handle::{PlayerHandle, PlayerMessage};
use crate::{
    config::GameConfig,
    dealer::{ClaimError, ClaimSender},
    game::{PlayerId, Slot},
    shutdown::wait_for_shutdown,
    table::{EventBus, Table, TableEvent, Toggle},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};

/// A bot seated at the table.
///
/// The bot alternates between thinking and toggling one token. Once it
/// holds a full claim it submits it and waits for the verdict, then sits
/// out the freeze that goes with it.
pub struct PlayerActor {
    id: PlayerId,
    table: Arc<Table>,
    events: Arc<EventBus>,
    claims: ClaimSender,
    inbox: mpsc::Receiver<PlayerMessage>,
    shutdown: watch::Receiver<bool>,
    rng: StdRng,
    set_size: usize,
    think_time: Duration,
    accuracy_pct: u8,
    point_freeze: Duration,
    penalty_freeze: Duration,
    tick: Duration,
}

impl PlayerActor {
    /// Create a bot and the handle the dealer uses to reach it
    pub fn new(
        id: PlayerId,
        config: &GameConfig,
        table: Arc<Table>,
        claims: ClaimSender,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, PlayerHandle) {
        let (handle, inbox) = PlayerHandle::new(id);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64 + 1)),
            None => StdRng::from_os_rng(),
        };

        let actor = Self {
            id,
            events: table.events().clone(),
            table,
            claims,
            inbox,
            shutdown,
            rng,
            set_size: config.set_size(),
            think_time: config.bot_think_time(),
            accuracy_pct: config.bot_accuracy_pct,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            tick: config.display_tick(),
        };
        (actor, handle)
    }

    /// Play until termination is requested or the dealer goes away
    pub async fn run(mut self) {
        log::debug!("Player {} started", self.id);

        while !self.is_terminated() {
            if !self.think().await {
                break;
            }
            self.skip_stale_messages();

            let Some(slot) = self.choose_slot().await else {
                continue;
            };
            let toggle = self.table.toggle_token(self.id, slot, self.set_size).await;
            if let Toggle::Placed { held } = toggle
                && held == self.set_size
                && !self.claim().await
            {
                break;
            }
        }

        log::debug!("Player {} stopped", self.id);
    }

    fn is_terminated(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleep for a jittered think time. Returns false on shutdown.
    async fn think(&mut self) -> bool {
        let base = self.think_time.as_millis() as u64;
        let millis = self.rng.random_range(base / 2..=base.saturating_mul(3) / 2);
        if millis == 0 {
            tokio::task::yield_now().await;
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(millis)) => true,
            _ = wait_for_shutdown(&mut self.shutdown) => false,
        }
    }

    /// Token losses while not waiting on a verdict need no reaction; the
    /// next look at the table already reflects them.
    fn skip_stale_messages(&mut self) {
        while let Ok(message) = self.inbox.try_recv() {
            log::trace!("Player {} skipping {:?}", self.id, message);
        }
    }

    /// With `accuracy_pct` chance, work towards a legal set on the table;
    /// otherwise pick any slot.
    async fn choose_slot(&mut self) -> Option<Slot> {
        let table_size = self.table.table_size();
        if table_size == 0 {
            return None;
        }

        if self.rng.random_range(0..100u8) < self.accuracy_pct
            && let Some(target) = self.table.find_sets(1).await.into_iter().next()
        {
            let held = self.table.claimed_slots(self.id).await;
            // Take back stray tokens before filling in the target.
            if let Some(&stray) = held.iter().find(|slot| !target.contains(slot)) {
                return Some(stray);
            }
            if let Some(&open) = target.iter().find(|slot| !held.contains(slot)) {
                return Some(open);
            }
        }

        Some(self.rng.random_range(0..table_size))
    }

    /// Submit the current claim and react to its verdict. Returns false if
    /// the player should stop.
    async fn claim(&mut self) -> bool {
        let submitted = tokio::select! {
            submitted = self.claims.submit_wait(self.id) => submitted,
            _ = wait_for_shutdown(&mut self.shutdown) => return false,
        };
        if let Err(ClaimError::Closed) = submitted {
            log::debug!("Player {}: dealer is gone", self.id);
            return false;
        }

        let message = tokio::select! {
            message = self.inbox.recv() => message,
            _ = wait_for_shutdown(&mut self.shutdown) => return false,
        };

        match message {
            Some(PlayerMessage::Scored) => self.freeze(self.point_freeze).await,
            Some(PlayerMessage::Penalized) => {
                for slot in self.table.claimed_slots(self.id).await {
                    self.table.remove_token(self.id, slot).await;
                }
                self.freeze(self.penalty_freeze).await
            }
            // Part of the claim was swept away; it will be discarded.
            Some(PlayerMessage::TokenLost(slot)) => {
                log::trace!("Player {} lost its token on slot {}", self.id, slot);
                true
            }
            None => false,
        }
    }

    /// Sit out `duration`, publishing the remaining time every tick.
    /// Returns false on shutdown.
    async fn freeze(&mut self, duration: Duration) -> bool {
        let until = Instant::now() + duration;

        loop {
            let remaining = until.saturating_duration_since(Instant::now());
            self.events.publish(TableEvent::Frozen {
                player: self.id,
                remaining,
            });
            if remaining.is_zero() {
                return true;
            }

            tokio::select! {
                _ = tokio::time::sleep(remaining.min(self.tick)) => {}
                _ = wait_for_shutdown(&mut self.shutdown) => return false,
            }
        }
    }
}
