//! Dealer actor: deals rounds, runs the countdown, adjudicates claims.

use super::{
    claims::ClaimReceiver,
    clock::RoundClock,
    messages::{EndReason, GameSummary, Verdict, winners},
};
use crate::{
    config::GameConfig,
    game::{Card, Deck, PlayerId, Slot},
    player::Contestant,
    shutdown::wait_for_shutdown,
    table::{Table, TableEvent},
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::sync::Arc;
use tokio::sync::watch;

/// The single arbiter of a game.
///
/// Only the dealer places or removes cards, owns the deck and the round
/// deadline, and serves claims one at a time in arrival order.
pub struct Dealer {
    config: GameConfig,
    table: Arc<Table>,
    players: Vec<Arc<dyn Contestant>>,
    deck: Deck,
    claims: ClaimReceiver,
    clock: RoundClock,
    shutdown: watch::Receiver<bool>,
    rng: StdRng,
    rounds: u32,
}

impl Dealer {
    /// Create a dealer holding a full deck of `config.deck_size` cards
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration
    /// * `table` - Shared table (also provides the oracle and event bus)
    /// * `players` - Seated players, in seat order
    /// * `claims` - Receiving end of the claim channel
    /// * `shutdown` - Flips to `true` when the game must stop
    pub fn new(
        config: GameConfig,
        table: Arc<Table>,
        players: Vec<Arc<dyn Contestant>>,
        claims: ClaimReceiver,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            deck: Deck::new(config.deck_size),
            clock: RoundClock::new(config.round_timeout(), config.turn_timeout_warning()),
            config,
            table,
            players,
            claims,
            shutdown,
            rng,
            rounds: 0,
        }
    }

    /// Start from `deck` instead of the full deck
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = deck;
        self
    }

    /// Run rounds until termination is requested or no set is left, then
    /// announce the winners.
    pub async fn run(mut self) -> GameSummary {
        log::info!(
            "Dealer starting with {} players and {} cards",
            self.players.len(),
            self.deck.len()
        );

        let reason = loop {
            if self.is_terminated() {
                break EndReason::Terminated;
            }
            if !self.sets_remaining().await {
                break EndReason::Exhausted;
            }

            self.rounds += 1;
            self.deal().await;
            self.countdown().await;
            self.sweep().await;
        };

        let summary = self.announce(reason).await;
        log::info!("Dealer stopped after {} rounds ({})", self.rounds, reason);
        summary
    }

    fn is_terminated(&self) -> bool {
        *self.shutdown.borrow()
    }

    async fn deal(&mut self) {
        self.deck.shuffle(&mut self.rng);
        let placed = self.place_cards_on_table().await;
        self.clock.extend();

        log::debug!(
            "Round {}: dealt {} cards, {} left in deck",
            self.rounds,
            placed,
            self.deck.len()
        );

        if self.config.hints {
            self.table.hints().await;
        }
        self.publish_countdown();
    }

    /// Serve claims until the deadline passes.
    async fn countdown(&mut self) {
        let tick = self.config.display_tick();

        loop {
            if self.is_terminated() {
                break;
            }

            let claims: Vec<PlayerId> = if self.clock.expired() {
                // Claims that were queued before the deadline are still served.
                let pending = self.claims.drain_pending();
                if pending.is_empty() {
                    break;
                }
                pending
            } else {
                let wait = self.clock.remaining().min(tick);
                let claim = tokio::select! {
                    claim = self.claims.try_take_one(wait) => claim,
                    _ = wait_for_shutdown(&mut self.shutdown) => None,
                };
                claim.into_iter().collect()
            };

            for player in claims {
                if self.serve_claim(player).await && !self.sets_remaining().await {
                    log::info!("No sets left in play, ending round {}", self.rounds);
                    return;
                }
            }

            self.publish_countdown();
        }
    }

    /// Adjudicate one claim and refill the table after a success
    async fn serve_claim(&mut self, player: PlayerId) -> bool {
        let scored = self.adjudicate(player).await.is_scored();
        if scored {
            self.place_cards_on_table().await;
        }
        scored
    }

    /// Judge `player`'s claim as it stands right now on the table.
    async fn adjudicate(&mut self, player: PlayerId) -> Verdict {
        let Some(contestant) = self.player(player) else {
            log::warn!("Claim from unknown player {}, ignoring", player);
            return Verdict::UnknownPlayer(player);
        };

        let claim = self.table.claim_of(player).await;
        let required = self.config.set_size();
        if claim.len() != required {
            log::debug!(
                "Player {} claim holds {} of {} cards, discarding",
                player,
                claim.len(),
                required
            );
            return Verdict::Discarded {
                held: claim.len(),
                required,
            };
        }

        let (slots, cards): (Vec<Slot>, Vec<Card>) = claim.into_iter().unzip();
        if !self.table.oracle().is_set(&cards) {
            contestant.on_penalized();
            self.table
                .events()
                .publish(TableEvent::Penalized { player });
            log::info!("Player {} claimed slots {:?}: not a set", player, slots);
            return Verdict::Penalized { slots };
        }

        for &slot in &slots {
            let vacated = self.table.remove_card(slot).await;
            self.notify_token_loss(slot, &vacated.cleared);
        }

        contestant.on_scored();
        self.table.events().publish(TableEvent::ScoreChanged {
            player,
            score: contestant.score(),
        });
        self.clock.extend();
        log::info!(
            "Player {} claimed slots {:?}: set, score {}",
            player,
            slots,
            contestant.score()
        );

        Verdict::Scored { slots, cards }
    }

    fn player(&self, id: PlayerId) -> Option<Arc<dyn Contestant>> {
        self.players.iter().find(|p| p.id() == id).cloned()
    }

    fn notify_token_loss(&self, slot: Slot, holders: &[PlayerId]) {
        for &holder in holders {
            if let Some(player) = self.player(holder) {
                player.on_token_lost(slot);
            }
        }
    }

    fn shuffled_slots(&mut self) -> Vec<Slot> {
        let mut slots: Vec<Slot> = (0..self.table.table_size()).collect();
        slots.shuffle(&mut self.rng);
        slots
    }

    /// Fill empty slots from the front of the deck, visiting slots in
    /// random order. Returns the number of cards placed.
    async fn place_cards_on_table(&mut self) -> usize {
        let mut placed = 0;

        for slot in self.shuffled_slots() {
            if self.deck.is_empty() {
                break;
            }
            if self.table.card_at(slot).await.is_some() {
                continue;
            }
            let Some(card) = self.deck.draw() else {
                break;
            };

            match self.table.place_card(card, slot).await {
                Ok(()) => placed += 1,
                Err(e) => {
                    log::error!("Failed to deal {} into slot {}: {}", card, slot, e);
                    self.deck.put_back(card);
                }
            }
        }

        placed
    }

    /// Return every card on the table to the deck. Returns the number swept.
    async fn sweep(&mut self) -> usize {
        let mut swept = 0;

        for slot in self.shuffled_slots() {
            if self.table.card_at(slot).await.is_none() {
                continue;
            }
            let vacated = self.table.remove_card(slot).await;
            self.notify_token_loss(slot, &vacated.cleared);
            if let Some(card) = vacated.card {
                self.deck.put_back(card);
                swept += 1;
            }
        }

        log::debug!(
            "Round {}: swept {} cards, deck holds {}",
            self.rounds,
            swept,
            self.deck.len()
        );
        swept
    }

    /// Whether any legal set can still be formed from the deck and table
    async fn sets_remaining(&self) -> bool {
        let mut pool: Vec<Card> = self.deck.iter().copied().collect();
        pool.extend(self.table.cards().await);
        !self.table.oracle().find_sets(&pool, 1).is_empty()
    }

    fn publish_countdown(&self) {
        self.table.events().publish(TableEvent::Countdown {
            remaining: self.clock.remaining(),
            warn: self.clock.in_warning(),
        });
    }

    async fn announce(&mut self, reason: EndReason) -> GameSummary {
        let scores: Vec<(PlayerId, u32)> =
            self.players.iter().map(|p| (p.id(), p.score())).collect();
        let winners = winners(&scores);

        self.table
            .events()
            .publish(TableEvent::Winners(winners.clone()));
        log::info!("Game over ({}): winners {:?}, scores {:?}", reason, winners, scores);

        GameSummary {
            reason,
            rounds: self.rounds,
            winners,
            scores,
            cards_left: self.deck.len() + self.table.count_cards().await,
        }
    }
}
