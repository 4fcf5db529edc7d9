//! Card primitives and the rule that decides what a set is.
//!
//! This module provides:
//! - Card, Slot and PlayerId identifiers
//! - Deck: the dealer's ordered pile of cards not on the table
//! - LegalityOracle: the pure decision function over groups of cards
//! - SetOracle: the classic feature-vector rule

pub mod entities;
pub mod oracle;

pub use entities::{Card, Deck, PlayerId, Slot};
pub use oracle::{LegalityOracle, SetOracle};
