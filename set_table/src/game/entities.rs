use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

/// Grid position on the table, `0..table_size`.
pub type Slot = usize;

/// Seated player identifier, `0..player_count`.
pub type PlayerId = usize;

/// A card is an opaque id in `0..deck_size`. What the id means (its
/// features) is decided by the legality oracle.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub u32);

impl Card {
    /// Position of this card in per-card lookup tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Card {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cards that are not on the table. Dealt from the front, refilled at the
/// back when the table is swept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Full deck of `deck_size` cards in id order.
    pub fn new(deck_size: usize) -> Self {
        // Config validation caps deck_size at u32::MAX.
        Self::from_cards((0..deck_size as u32).map(Card))
    }

    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    pub fn put_back(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    #[test]
    fn test_deck_holds_every_card_once() {
        let mut deck = Deck::new(81);
        deck.shuffle(&mut StdRng::seed_from_u64(7));

        let mut seen = HashSet::new();
        while let Some(card) = deck.draw() {
            assert!(card.index() < 81);
            assert!(seen.insert(card), "card {card} dealt twice");
        }
        assert_eq!(seen.len(), 81);
    }

    #[test]
    fn test_draw_from_front_put_back_at_end() {
        let mut deck = Deck::from_cards([Card(1), Card(2), Card(3)]);

        assert_eq!(deck.draw(), Some(Card(1)));
        deck.put_back(Card(1));

        let order: Vec<Card> = deck.iter().copied().collect();
        assert_eq!(order, vec![Card(2), Card(3), Card(1)]);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let mut a = Deck::new(20);
        let mut b = Deck::new(20);
        a.shuffle(&mut StdRng::seed_from_u64(42));
        b.shuffle(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_deck_draws_none() {
        let mut deck = Deck::from_cards([Card(0)]);
        assert_eq!(deck.draw(), Some(Card(0)));
        assert_eq!(deck.draw(), None);
        assert!(deck.is_empty());
    }
}
