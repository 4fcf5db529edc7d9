//! Table error types.

use crate::game::{Card, Slot};
use thiserror::Error;

/// Errors from table mutations whose preconditions do not hold
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Slot index past the end of the table
    #[error("Slot {slot} out of range (table size {table_size})")]
    SlotOutOfRange { slot: Slot, table_size: usize },

    /// Card id past the end of the deck
    #[error("Card {card} out of range (deck size {deck_size})")]
    CardOutOfRange { card: Card, deck_size: usize },

    /// Target slot already holds a card
    #[error("Slot {slot} already holds card {card}")]
    SlotOccupied { slot: Slot, card: Card },

    /// Card is already on the table somewhere else
    #[error("Card {card} already placed at slot {slot}")]
    CardAlreadyPlaced { card: Card, slot: Slot },

    /// Slot/card mapping or token sets are out of sync
    #[error("Table invariant violated: {0}")]
    InvariantViolated(String),
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
