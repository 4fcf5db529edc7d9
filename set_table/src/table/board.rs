//! Shared table: which card sits in which slot, and who holds a token where.

use super::{
    errors::{TableError, TableResult},
    events::{EventBus, TableEvent},
};
use crate::{
    config::GameConfig,
    game::{Card, LegalityOracle, PlayerId, Slot},
};
use std::{collections::BTreeSet, sync::Arc, time::Duration};
use tokio::sync::RwLock;

/// Slot/card bijection plus per-slot token sets. Only ever touched under
/// the table lock.
#[derive(Debug)]
struct Layout {
    slot_to_card: Vec<Option<Card>>,
    card_to_slot: Vec<Option<Slot>>,
    tokens: Vec<BTreeSet<PlayerId>>,
}

impl Layout {
    fn new(table_size: usize, deck_size: usize) -> Self {
        Self {
            slot_to_card: vec![None; table_size],
            card_to_slot: vec![None; deck_size],
            tokens: vec![BTreeSet::new(); table_size],
        }
    }

    fn held_by(&self, player: PlayerId) -> impl Iterator<Item = Slot> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(_, holders)| holders.contains(&player))
            .map(|(slot, _)| slot)
    }
}

/// Outcome of vacating a slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vacated {
    /// Card that was in the slot, if any
    pub card: Option<Card>,
    /// Players whose token on the slot was cleared with it
    pub cleared: Vec<PlayerId>,
}

/// Outcome of a player toggling its token on a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Token placed; `held` is the player's token count afterwards
    Placed { held: usize },
    /// Token taken back; `held` is the player's token count afterwards
    Removed { held: usize },
    /// Slot empty, out of range, or the player is at its token limit
    Ignored,
}

/// A legal set currently on the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub slots: Vec<Slot>,
    pub cards: Vec<Card>,
    pub features: Vec<Vec<u32>>,
}

/// Point-in-time copy of the table for display and diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub slots: Vec<Option<Card>>,
    pub tokens: Vec<Vec<PlayerId>>,
}

/// The table shared by the dealer and every player.
///
/// Every operation runs under one table-wide lock, so callers always observe
/// a consistent slot/card mapping, and a slot's card and tokens change
/// together. Artificial dealing delays are awaited before the lock is taken.
pub struct Table {
    table_size: usize,
    deck_size: usize,
    layout: RwLock<Layout>,
    oracle: Arc<dyn LegalityOracle>,
    events: Arc<EventBus>,
    place_card_delay: Duration,
    remove_card_delay: Duration,
}

impl Table {
    /// Create an empty table
    ///
    /// # Arguments
    ///
    /// * `config` - Game configuration (sizes and dealing delays)
    /// * `oracle` - Rule used for hints
    /// * `events` - Bus that receives every table change
    pub fn new(
        config: &GameConfig,
        oracle: Arc<dyn LegalityOracle>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            table_size: config.table_size,
            deck_size: config.deck_size,
            layout: RwLock::new(Layout::new(config.table_size, config.deck_size)),
            oracle,
            events,
            place_card_delay: config.place_card_delay(),
            remove_card_delay: config.remove_card_delay(),
        }
    }

    pub fn table_size(&self) -> usize {
        self.table_size
    }

    pub fn oracle(&self) -> &Arc<dyn LegalityOracle> {
        &self.oracle
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Deal `card` into the empty `slot`
    ///
    /// # Errors
    ///
    /// Fails without touching the table if the slot is occupied, the card is
    /// already placed, or either id is out of range.
    pub async fn place_card(&self, card: Card, slot: Slot) -> TableResult<()> {
        if !self.place_card_delay.is_zero() {
            tokio::time::sleep(self.place_card_delay).await;
        }

        let mut layout = self.layout.write().await;

        if slot >= self.table_size {
            return Err(TableError::SlotOutOfRange {
                slot,
                table_size: self.table_size,
            });
        }
        if card.index() >= self.deck_size {
            return Err(TableError::CardOutOfRange {
                card,
                deck_size: self.deck_size,
            });
        }
        if let Some(existing) = layout.slot_to_card[slot] {
            return Err(TableError::SlotOccupied {
                slot,
                card: existing,
            });
        }
        if let Some(at) = layout.card_to_slot[card.index()] {
            return Err(TableError::CardAlreadyPlaced { card, slot: at });
        }

        layout.slot_to_card[slot] = Some(card);
        layout.card_to_slot[card.index()] = Some(slot);
        self.events.publish(TableEvent::CardPlaced { card, slot });
        Ok(())
    }

    /// Vacate `slot`, clearing every token on it in the same step.
    ///
    /// An empty or out-of-range slot is a no-op apart from its leftover
    /// tokens being cleared.
    pub async fn remove_card(&self, slot: Slot) -> Vacated {
        if !self.remove_card_delay.is_zero() {
            tokio::time::sleep(self.remove_card_delay).await;
        }

        let mut layout = self.layout.write().await;
        if slot >= self.table_size {
            return Vacated::default();
        }

        let card = layout.slot_to_card[slot].take();
        if let Some(card) = card {
            layout.card_to_slot[card.index()] = None;
        }

        let cleared: Vec<PlayerId> = std::mem::take(&mut layout.tokens[slot])
            .into_iter()
            .collect();
        for &player in &cleared {
            self.events.publish(TableEvent::TokenRemoved { player, slot });
        }
        if card.is_some() {
            self.events.publish(TableEvent::CardRemoved { slot });
        }

        Vacated { card, cleared }
    }

    /// Put `player`'s token on `slot`. Ignored unless the slot holds a card.
    ///
    /// Returns whether a new token was placed.
    pub async fn place_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut layout = self.layout.write().await;
        if layout.slot_to_card.get(slot).copied().flatten().is_none() {
            return false;
        }

        let placed = layout.tokens[slot].insert(player);
        if placed {
            self.events.publish(TableEvent::TokenPlaced { player, slot });
        }
        placed
    }

    /// Take `player`'s token off `slot`. Returns whether one was there.
    pub async fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut layout = self.layout.write().await;
        let removed = layout
            .tokens
            .get_mut(slot)
            .is_some_and(|holders| holders.remove(&player));
        if removed {
            self.events.publish(TableEvent::TokenRemoved { player, slot });
        }
        removed
    }

    /// Take the token back if `player` holds one on `slot`, otherwise place
    /// one if the slot holds a card and `player` holds fewer than `limit`.
    pub async fn toggle_token(&self, player: PlayerId, slot: Slot, limit: usize) -> Toggle {
        let mut layout = self.layout.write().await;
        if slot >= self.table_size {
            return Toggle::Ignored;
        }

        if layout.tokens[slot].remove(&player) {
            self.events.publish(TableEvent::TokenRemoved { player, slot });
            return Toggle::Removed {
                held: layout.held_by(player).count(),
            };
        }

        let held = layout.held_by(player).count();
        if layout.slot_to_card[slot].is_none() || held >= limit {
            return Toggle::Ignored;
        }

        layout.tokens[slot].insert(player);
        self.events.publish(TableEvent::TokenPlaced { player, slot });
        Toggle::Placed { held: held + 1 }
    }

    pub async fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.layout
            .read()
            .await
            .tokens
            .get(slot)
            .is_some_and(|holders| holders.contains(&player))
    }

    /// Slots on which `player` holds a token, ascending
    pub async fn claimed_slots(&self, player: PlayerId) -> Vec<Slot> {
        self.layout.read().await.held_by(player).collect()
    }

    /// `player`'s claim as ascending `(slot, card)` pairs, read in one step
    pub async fn claim_of(&self, player: PlayerId) -> Vec<(Slot, Card)> {
        let layout = self.layout.read().await;
        layout
            .held_by(player)
            .filter_map(|slot| layout.slot_to_card[slot].map(|card| (slot, card)))
            .collect()
    }

    pub async fn card_at(&self, slot: Slot) -> Option<Card> {
        self.layout
            .read()
            .await
            .slot_to_card
            .get(slot)
            .copied()
            .flatten()
    }

    pub async fn slot_of(&self, card: Card) -> Option<Slot> {
        self.layout
            .read()
            .await
            .card_to_slot
            .get(card.index())
            .copied()
            .flatten()
    }

    pub async fn count_cards(&self) -> usize {
        self.layout
            .read()
            .await
            .slot_to_card
            .iter()
            .filter(|card| card.is_some())
            .count()
    }

    /// Cards on the table in slot order
    pub async fn cards(&self) -> Vec<Card> {
        self.layout
            .read()
            .await
            .slot_to_card
            .iter()
            .flatten()
            .copied()
            .collect()
    }

    pub async fn snapshot(&self) -> TableSnapshot {
        let layout = self.layout.read().await;
        TableSnapshot {
            slots: layout.slot_to_card.clone(),
            tokens: layout
                .tokens
                .iter()
                .map(|holders| holders.iter().copied().collect())
                .collect(),
        }
    }

    /// Up to `limit` legal sets on the table, each as ascending slots
    pub async fn find_sets(&self, limit: usize) -> Vec<Vec<Slot>> {
        self.legal_sets(limit)
            .await
            .into_iter()
            .map(|set| set.into_iter().map(|(slot, _)| slot).collect())
            .collect()
    }

    /// Every legal set on the table, logged one per line
    pub async fn hints(&self) -> Vec<Hint> {
        let hints: Vec<Hint> = self
            .legal_sets(usize::MAX)
            .await
            .into_iter()
            .map(|set| {
                let (slots, cards): (Vec<Slot>, Vec<Card>) = set.into_iter().unzip();
                let features = self.oracle.features_of(&cards);
                Hint {
                    slots,
                    cards,
                    features,
                }
            })
            .collect();

        for hint in &hints {
            log::info!(
                "Hint: set found: slots {:?} features {:?}",
                hint.slots,
                hint.features
            );
        }
        hints
    }

    async fn legal_sets(&self, limit: usize) -> Vec<Vec<(Slot, Card)>> {
        let placed: Vec<(Slot, Card)> = {
            let layout = self.layout.read().await;
            layout
                .slot_to_card
                .iter()
                .enumerate()
                .filter_map(|(slot, card)| card.map(|card| (slot, card)))
                .collect()
        };

        // Pool is in slot order, so every found set comes back sorted by slot.
        let pool: Vec<Card> = placed.iter().map(|&(_, card)| card).collect();
        self.oracle
            .find_sets(&pool, limit)
            .into_iter()
            .map(|set| {
                placed
                    .iter()
                    .filter(|(_, card)| set.contains(card))
                    .copied()
                    .collect()
            })
            .collect()
    }

    /// Check the slot/card bijection and that empty slots carry no tokens
    pub async fn check_invariants(&self) -> TableResult<()> {
        let layout = self.layout.read().await;

        for (slot, card) in layout.slot_to_card.iter().enumerate() {
            match card {
                Some(card) => {
                    if layout.card_to_slot.get(card.index()).copied().flatten() != Some(slot) {
                        return Err(TableError::InvariantViolated(format!(
                            "slot {slot} holds {card} but the card maps elsewhere"
                        )));
                    }
                }
                None => {
                    if !layout.tokens[slot].is_empty() {
                        return Err(TableError::InvariantViolated(format!(
                            "empty slot {slot} still has tokens {:?}",
                            layout.tokens[slot]
                        )));
                    }
                }
            }
        }

        for (index, slot) in layout.card_to_slot.iter().enumerate() {
            if let Some(slot) = slot
                && layout.slot_to_card[*slot].map(Card::index) != Some(index)
            {
                return Err(TableError::InvariantViolated(format!(
                    "card #{index} maps to slot {slot} which holds something else"
                )));
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("table_size", &self.table_size)
            .field("deck_size", &self.deck_size)
            .finish_non_exhaustive()
    }
}
