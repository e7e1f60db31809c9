//! Turn engine trait: the boundary between game rules and the RL adapter.
//!
//! Games implement `TurnEngine` to define:
//! - which action ranges a player currently has open,
//! - how an accepted action mutates the table,
//! - when the game is over.

use smallvec::SmallVec;

use crate::core::{Action, ActionRange, EnvConfig, GameRng, PlayerId, TableState};

/// Accepted action ranges for one player. Rarely more than a couple.
pub type RangeSet = SmallVec<[ActionRange; 4]>;

/// Outcome of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The action was applied and the table mutated.
    Accepted,
    /// The action is not legal in the current state. The table is unchanged.
    RejectedIllegal,
}

/// Result of a completed episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Multiple winners (split pot, tied banks).
    Winners(Vec<PlayerId>),
    /// No winner.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }
}

/// Rule core for one game, consumed by the orchestrator through this narrow
/// interface only.
///
/// ## Implementation Notes
///
/// - `legal_ranges`: return an empty set when the player has nothing to do
///   this call (already acted, or waiting on another seat).
/// - `apply`: rejection must be pure; a `RejectedIllegal` outcome leaves the
///   state untouched.
/// - `is_terminal`: return `None` while the episode continues.
pub trait TurnEngine {
    /// The configuration the engine was built with.
    fn config(&self) -> &EnvConfig;

    /// Build the state for a fresh episode.
    fn initial_state(&self, rng: &mut GameRng) -> TableState;

    /// Ordered accepted action ranges for a player in the given state.
    fn legal_ranges(&self, state: &TableState, player: PlayerId) -> RangeSet;

    /// Apply a concrete action for a player.
    fn apply(&self, state: &mut TableState, player: PlayerId, action: &Action) -> ApplyOutcome;

    /// Game-over predicate.
    fn is_terminal(&self, state: &TableState) -> Option<GameResult>;
}
