//! Bundled blackjack rule core.

pub mod game;

pub use game::Blackjack;
