//! The action vocabulary: concrete actions and legal-range descriptors.
//!
//! `Action` is one concrete, executable move. `ActionRange` describes a class
//! of currently-legal actions with bounds (e.g. "bet between 1 and 20") and is
//! used only to test legality or to sample a fallback action, never executed
//! directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// A concrete player action.
///
/// `Wait` is the placeholder submitted by players whose turn has not arrived;
/// it is always accepted for them and never forwarded to the rule engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Do nothing; the only acceptable submission when it is not your turn.
    Wait,
    /// Place a bet of the given amount.
    Bet(u32),
    /// Draw one more card.
    Hit,
    /// Stop drawing and end the turn.
    Skip,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Wait => write!(f, "Wait"),
            Action::Bet(amount) => write!(f, "Bet({amount})"),
            Action::Hit => write!(f, "Hit"),
            Action::Skip => write!(f, "Skip"),
        }
    }
}

/// A descriptor of a class of currently-legal actions.
///
/// Two ranges are equal iff their variant kind and bounds match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionRange {
    /// Waiting is acceptable.
    Wait,
    /// Any bet with `min <= amount <= max`.
    Bet { min: u32, max: u32 },
    /// A hit is acceptable.
    Hit,
    /// A skip is acceptable.
    Skip,
}

impl ActionRange {
    /// Test whether a concrete action falls inside this range.
    #[must_use]
    pub fn accepts(&self, action: &Action) -> bool {
        match (self, action) {
            (ActionRange::Wait, Action::Wait) => true,
            (ActionRange::Bet { min, max }, Action::Bet(amount)) => {
                (*min..=*max).contains(amount)
            }
            (ActionRange::Hit, Action::Hit) => true,
            (ActionRange::Skip, Action::Skip) => true,
            _ => false,
        }
    }

    /// Draw a uniform-random concrete action from this range.
    ///
    /// Used by the orchestrator to force progress after repeated illegal input.
    #[must_use]
    pub fn sample(&self, rng: &mut GameRng) -> Action {
        match self {
            ActionRange::Wait => Action::Wait,
            ActionRange::Bet { min, max } => Action::Bet(rng.gen_range_u32(*min..=*max)),
            ActionRange::Hit => Action::Hit,
            ActionRange::Skip => Action::Skip,
        }
    }
}

impl fmt::Display for ActionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionRange::Wait => write!(f, "Wait"),
            ActionRange::Bet { min, max } => write!(f, "Bet({min}..={max})"),
            ActionRange::Hit => write!(f, "Hit"),
            ActionRange::Skip => write!(f, "Skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_accepts_matching_kind() {
        assert!(ActionRange::Wait.accepts(&Action::Wait));
        assert!(ActionRange::Hit.accepts(&Action::Hit));
        assert!(ActionRange::Skip.accepts(&Action::Skip));

        assert!(!ActionRange::Hit.accepts(&Action::Skip));
        assert!(!ActionRange::Wait.accepts(&Action::Bet(1)));
    }

    #[test]
    fn test_bet_range_bounds() {
        let range = ActionRange::Bet { min: 2, max: 5 };

        assert!(!range.accepts(&Action::Bet(1)));
        assert!(range.accepts(&Action::Bet(2)));
        assert!(range.accepts(&Action::Bet(5)));
        assert!(!range.accepts(&Action::Bet(6)));
        assert!(!range.accepts(&Action::Hit));
    }

    #[test]
    fn test_range_equality_includes_bounds() {
        let a = ActionRange::Bet { min: 1, max: 20 };
        let b = ActionRange::Bet { min: 1, max: 20 };
        let c = ActionRange::Bet { min: 1, max: 10 };

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, ActionRange::Hit);
    }

    #[test]
    fn test_sample_stays_in_range() {
        let mut rng = GameRng::new(42);
        let range = ActionRange::Bet { min: 3, max: 9 };

        for _ in 0..100 {
            let action = range.sample(&mut rng);
            assert!(range.accepts(&action));
        }
    }

    #[test]
    fn test_sample_fixed_kinds() {
        let mut rng = GameRng::new(42);
        assert_eq!(ActionRange::Wait.sample(&mut rng), Action::Wait);
        assert_eq!(ActionRange::Hit.sample(&mut rng), Action::Hit);
        assert_eq!(ActionRange::Skip.sample(&mut rng), Action::Skip);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::Bet(3).to_string(), "Bet(3)");
        assert_eq!(ActionRange::Bet { min: 1, max: 20 }.to_string(), "Bet(1..=20)");
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::Bet(7);
        let json = serde_json::to_string(&action).unwrap();
        let deserialized: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, deserialized);
    }
}
