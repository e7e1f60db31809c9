//! Bundled game implementations.
//!
//! The adapter is game-agnostic; anything implementing
//! [`crate::rules::TurnEngine`] plugs in. Blackjack is the reference game.

pub mod blackjack;
