//! # Set Table
//!
//! A concurrent table for the card game Set: any number of player tasks
//! race to claim groups of cards on a shared table, and a single dealer task
//! adjudicates claims strictly in arrival order under a round deadline.
//!
//! ## Architecture
//!
//! - **Table**: slot/card bijection plus per-slot player tokens, behind one
//!   table-wide lock. Players mutate only their own tokens; only the dealer
//!   places and removes cards.
//! - **Claim channel**: bounded FIFO of player ids. A player enqueues its id
//!   once it holds a full claim; the dealer reads the claim back from the
//!   table when it serves it.
//! - **Dealer**: `Deal → Countdown → Sweep` rounds until termination is
//!   requested or no legal set is left, then announces the winners.
//! - **Players**: bots that toggle tokens, submit claims and freeze after a
//!   verdict.
//!
//! ## Core Modules
//!
//! - [`config`]: game parameters and validation
//! - [`game`]: cards, deck and the legality oracle
//! - [`table`]: the shared table and its change events
//! - [`dealer`]: claim channel, round clock and the dealer actor
//! - [`player`]: player handle and bot actor
//! - [`manager`]: wiring and lifecycle of one game
//!
//! ## Example
//!
//! ```no_run
//! use set_table::{GameConfig, GameManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = GameManager::new(GameConfig::default())?;
//!     let summary = manager.run().await?;
//!     println!("winners: {:?}", summary.winners);
//!     Ok(())
//! }
//! ```

/// Game parameters.
pub mod config;
pub use config::{ConfigError, GameConfig};

/// Cards, deck and set legality.
pub mod game;

/// Shared table state.
pub mod table;

/// The adjudicating dealer.
pub mod dealer;
pub use dealer::{EndReason, GameSummary};

/// Players seated at the table.
pub mod player;

/// Game lifecycle.
pub mod manager;
pub use manager::{GameError, GameManager};

/// Game-wide termination flag.
pub mod shutdown;
pub use shutdown::ShutdownHandle;
