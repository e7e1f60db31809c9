//! Bidirectional mapping between actions and a flat discrete index space.
//!
//! The index space is partitioned into contiguous, non-overlapping sub-ranges,
//! one per action kind:
//!
//! ```text
//! [0]                      Wait
//! [1 ..= bet_span]         Bet(bet_min + index - 1)
//! [bet_span + 1]           Hit
//! [bet_span + 2]           Skip
//! ```
//!
//! Decoding is total over `[0, cardinality)`; every in-range index yields
//! exactly one concrete action, and anything outside yields
//! [`InvalidEncoding`], which is distinct from "decodes fine but is illegal
//! right now".

use thiserror::Error;

use crate::core::{Action, ActionRange};

/// The submitted integer does not decode to any action at all.
///
/// Absorbed by the orchestrator as a penalty; never surfaced to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("action index {index} is outside the discrete action space of size {cardinality}")]
pub struct InvalidEncoding {
    /// The offending integer.
    pub index: i64,
    /// Size of the action space it missed.
    pub cardinality: usize,
}

/// Total, bidirectional codec between [`Action`] values and `[0, cardinality)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionCodec {
    bet_min: u32,
    bet_max: u32,
}

impl ActionCodec {
    const WAIT_INDEX: usize = 0;
    const BET_START: usize = 1;

    /// Build a codec for the given bet parameter domain.
    #[must_use]
    pub fn new(bet_min: u32, bet_max: u32) -> Self {
        assert!(bet_min >= 1, "bet_min must be at least 1");
        assert!(bet_min <= bet_max, "bet_min must not exceed bet_max");
        Self { bet_min, bet_max }
    }

    /// Number of distinct bet amounts.
    #[must_use]
    const fn bet_span(&self) -> usize {
        (self.bet_max - self.bet_min + 1) as usize
    }

    const fn hit_index(&self) -> usize {
        Self::BET_START + self.bet_span()
    }

    const fn skip_index(&self) -> usize {
        self.hit_index() + 1
    }

    /// Total size of the discrete action space, fixed at construction.
    #[must_use]
    pub const fn cardinality(&self) -> usize {
        self.skip_index() + 1
    }

    /// Decode an integer into a concrete action.
    pub fn decode(&self, index: i64) -> Result<Action, InvalidEncoding> {
        let invalid = InvalidEncoding {
            index,
            cardinality: self.cardinality(),
        };

        let index = usize::try_from(index).map_err(|_| invalid)?;

        if index == Self::WAIT_INDEX {
            Ok(Action::Wait)
        } else if index < self.hit_index() {
            let amount = self.bet_min + (index - Self::BET_START) as u32;
            Ok(Action::Bet(amount))
        } else if index == self.hit_index() {
            Ok(Action::Hit)
        } else if index == self.skip_index() {
            Ok(Action::Skip)
        } else {
            Err(invalid)
        }
    }

    /// Encode an action into its unique index.
    ///
    /// Exact inverse of [`decode`](Self::decode) for every action whose
    /// parameters lie in the configured domain.
    #[must_use]
    pub fn encode(&self, action: &Action) -> usize {
        match action {
            Action::Wait => Self::WAIT_INDEX,
            Action::Bet(amount) => {
                debug_assert!(
                    (self.bet_min..=self.bet_max).contains(amount),
                    "bet amount outside configured domain"
                );
                Self::BET_START + (amount - self.bet_min) as usize
            }
            Action::Hit => self.hit_index(),
            Action::Skip => self.skip_index(),
        }
    }

    /// Build the legality mask over the whole index space for a set of
    /// accepted ranges.
    ///
    /// An empty range set means the player has nothing to do, so only the
    /// `Wait` placeholder is marked legal.
    #[must_use]
    pub fn legal_mask(&self, ranges: &[ActionRange]) -> Vec<bool> {
        let mut mask = vec![false; self.cardinality()];

        if ranges.is_empty() {
            mask[Self::WAIT_INDEX] = true;
            return mask;
        }

        for range in ranges {
            match range {
                ActionRange::Wait => mask[Self::WAIT_INDEX] = true,
                ActionRange::Bet { min, max } => {
                    for amount in *min..=*max {
                        mask[self.encode(&Action::Bet(amount))] = true;
                    }
                }
                ActionRange::Hit => mask[self.hit_index()] = true,
                ActionRange::Skip => mask[self.skip_index()] = true,
            }
        }

        mask
    }
}
