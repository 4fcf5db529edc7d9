//! Shared table module.
//!
//! This module implements:
//! - Table: slot/card bijection and per-slot token sets behind one lock
//! - TableEvent/EventBus: fire-and-forget change notifications for displays
//! - TableError: precondition failures on table mutations
//!
//! ## Invariants
//!
//! For every occupied slot `s`, `slot_of(card_at(s)) == s`, and for every
//! placed card `c`, `card_at(slot_of(c)) == c`. A slot without a card never
//! carries tokens: removing a card clears its tokens in the same critical
//! section.
//!
//! ## Example
//!
//! ```
//! use set_table::{GameConfig, table::{EventBus, Table}, game::{Card, SetOracle}};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = GameConfig::default();
//!     let table = Table::new(
//!         &config,
//!         Arc::new(SetOracle::from_config(&config)),
//!         Arc::new(EventBus::new()),
//!     );
//!
//!     table.place_card(Card(5), 0).await.unwrap();
//!     assert!(table.place_token(1, 0).await);
//!     assert_eq!(table.claimed_slots(1).await, vec![0]);
//! }
//! ```

pub mod board;
pub mod errors;
pub mod events;

pub use board::{Hint, Table, TableSnapshot, Toggle, Vacated};
pub use errors::{TableError, TableResult};
pub use events::{EventBus, TableEvent};
