//! The dealer: sole owner of the deck and the round deadline.
//!
//! Each round the dealer shuffles, fills the table, and then serves claims
//! from the claim channel one at a time until the deadline passes. A legal
//! claim vacates its slots, scores the player, refills the table and pushes
//! the deadline out again. When the deadline passes every card goes back to
//! the deck and a new round starts. The game ends when termination is
//! requested or no legal set is left among the cards in play.

pub mod actor;
pub mod claims;
pub mod clock;
pub mod messages;

pub use actor::Dealer;
pub use claims::{ClaimError, ClaimReceiver, ClaimResult, ClaimSender, claim_channel};
pub use clock::RoundClock;
pub use messages::{EndReason, GameSummary, Verdict, winners};
