//! Players: the dealer-facing handle and the bot that drives it.
//!
//! A player places and removes its own tokens directly on the table. When
//! it holds a full claim it enqueues its id on the claim channel and waits
//! for the dealer's verdict, which arrives through its [`PlayerHandle`].

pub mod actor;
pub mod handle;

pub use actor::PlayerActor;
pub use handle::{Contestant, PlayerHandle, PlayerMessage};
