//! Table state: the snapshot the rule engine owns and the adapter observes.
//!
//! ## TableState
//!
//! Per-seat sub-states (hand, bank, bet), shared piles (deck, discard), the
//! pending actor, and the turn history. The orchestrator never mutates this
//! directly; all changes flow through [`crate::rules::TurnEngine::apply`].
//!
//! Growing piles use `im` persistent vectors so snapshots clone in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{Card, Deck};

/// One seat's private and public sub-state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    /// Cards in hand. Private: visible only to the owning seat.
    pub hand: Vector<Card>,
    /// Chips not currently wagered. Public.
    pub bank: i64,
    /// Current wager, 0 before the seat has bet this round. Public.
    pub bet: i64,
}

impl SeatState {
    /// Fresh seat with the given bank and no cards.
    #[must_use]
    pub fn new(bank: i64) -> Self {
        Self {
            hand: Vector::new(),
            bank,
            bet: 0,
        }
    }

    /// Whether this seat has placed its bet for the current round.
    #[must_use]
    pub fn has_bet(&self) -> bool {
        self.bet > 0
    }
}

/// A recorded accepted action, for debugging and tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The seat that acted.
    pub player: PlayerId,
    /// The accepted action.
    pub action: Action,
    /// Round in which it was taken.
    pub round: u32,
}

/// Complete table state for one episode.
#[derive(Clone, Debug)]
pub struct TableState {
    player_count: usize,
    /// Per-seat sub-states.
    pub seats: PlayerMap<SeatState>,
    /// Face-down draw pile.
    pub deck: Deck,
    /// Face-up discard pile, visible to everyone.
    pub discard: Vector<Card>,
    /// The seat whose turn is pending.
    pub next_player: PlayerId,
    /// Current round, starting at 1.
    pub round: u32,
    /// Set once the episode can no longer continue.
    pub finished: bool,
    /// Accepted actions in order.
    pub history: Vector<TurnRecord>,
    /// Table-local RNG for shuffles and deals.
    pub rng: GameRng,
}

impl TableState {
    /// Create a fresh table with empty piles.
    #[must_use]
    pub fn new(player_count: usize, starting_bank: i64, rng: GameRng) -> Self {
        Self {
            player_count,
            seats: PlayerMap::new(player_count, |_| SeatState::new(starting_bank)),
            deck: Deck::standard_52(),
            discard: Vector::new(),
            next_player: PlayerId::new(0),
            round: 1,
            finished: false,
            history: Vector::new(),
            rng,
        }
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Iterate over all seat IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    /// Borrow a seat's sub-state.
    #[must_use]
    pub fn seat(&self, player: PlayerId) -> &SeatState {
        &self.seats[player]
    }

    /// Mutably borrow a seat's sub-state.
    pub fn seat_mut(&mut self, player: PlayerId) -> &mut SeatState {
        &mut self.seats[player]
    }

    /// Sum of all current wagers.
    #[must_use]
    pub fn pot(&self) -> i64 {
        self.seats.iter().map(|(_, seat)| seat.bet).sum()
    }

    /// Append an accepted action to the history.
    pub fn record_turn(&mut self, player: PlayerId, action: Action) {
        let round = self.round;
        self.history.push_back(TurnRecord {
            player,
            action,
            round,
        });
    }
}
