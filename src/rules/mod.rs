//! Rule engine boundary.

pub mod engine;

pub use engine::{ApplyOutcome, GameResult, RangeSet, TurnEngine};
