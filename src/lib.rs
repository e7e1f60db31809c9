//! # cardgym
//!
//! A turn-based multi-agent card game engine with an adapter that exposes the
//! game to reinforcement-learning agents through fixed-size discrete action
//! and observation protocols.
//!
//! ## Design Principles
//!
//! 1. **Protocol Safety**: Every integer an agent submits resolves to a
//!    well-defined effect or a well-defined penalty, never undefined behavior.
//!    Only structurally malformed calls are hard failures.
//!
//! 2. **N-Player First**: Turn order is strictly sequential over any number of
//!    seats; all players submit together each call, but only the designated
//!    actor's integer has effect.
//!
//! 3. **Partial Observability**: Every seat sees its own hand, the shared
//!    piles, and only the public fields of other seats, in one fixed vector
//!    layout so agents can share parameters across seats.
//!
//! 4. **Liveness**: A player that keeps submitting illegal input is penalized
//!    and, past a configured ceiling, a fallback action is forced so the
//!    episode always progresses.
//!
//! ## Architecture
//!
//! The rule core is consumed through the narrow [`rules::TurnEngine`]
//! interface: legal action ranges per player, an apply function, and a
//! game-over predicate. The adapter ([`env::TableEnv`]) decodes submitted
//! integers with a total [`env::ActionCodec`], resolves them against turn
//! order and legality, and projects state into per-player observations.
//!
//! ## Modules
//!
//! - `core`: players, RNG, actions, configuration, table state
//! - `cards`: 52-card deck and blackjack hand scoring
//! - `rules`: the turn engine boundary
//! - `env`: action codec, observation builder, step orchestrator
//! - `games`: bundled rule cores (blackjack)

pub mod cards;
pub mod core;
pub mod env;
pub mod games;
pub mod rules;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRange, EnvConfig, GameRng, GameRngState, PlayerId, PlayerMap, RewardConfig,
    SeatState, TableState, TurnRecord,
};

pub use crate::cards::{hand_value, Card, Deck, Rank, Suit};

pub use crate::rules::{ApplyOutcome, GameResult, RangeSet, TurnEngine};

pub use crate::env::{
    ActionCodec, InvalidEncoding, ObservationSpace, ProtocolError, StepInfo, StepOutcome,
    StepResult, TableEncoder, TableEnv,
};

pub use crate::games::blackjack::Blackjack;
