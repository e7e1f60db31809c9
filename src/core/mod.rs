//! Core types: players, RNG, actions, configuration, table state.
//!
//! These are game-agnostic building blocks; the rule engine and the RL adapter
//! are both built on top of them.

pub mod action;
pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRange};
pub use config::{EnvConfig, RewardConfig};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{SeatState, TableState, TurnRecord};
