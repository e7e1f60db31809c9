//! Environment configuration.
//!
//! Everything the adapter needs to size its protocol is fixed here at
//! construction time: seat count, the bet parameter domain (which sizes the
//! discrete action space), the invalid-input ceiling, and the reward constants
//! per event kind.

use serde::{Deserialize, Serialize};

/// Reward constants, one per event kind.
///
/// Magnitudes are configuration, not design: callers tune them per experiment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Reward for a valid no-op (waiting when it is not your turn).
    pub valid_wait: f32,
    /// Bonus for a successfully placed bet.
    pub bet_accepted: f32,
    /// Bonus for a successful hit.
    pub hit_accepted: f32,
    /// Bonus for a successful skip.
    pub skip_accepted: f32,
    /// Penalty for an illegal or undecodable action. Strictly negative.
    pub illegal_action: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            valid_wait: 0.0,
            bet_accepted: 1.0,
            hit_accepted: 1.0,
            skip_accepted: 0.5,
            illegal_action: -1.0,
        }
    }
}

impl RewardConfig {
    /// Largest single-action bonus: the declared reward ceiling.
    #[must_use]
    pub fn ceiling(&self) -> f32 {
        self.bet_accepted
            .max(self.hit_accepted)
            .max(self.skip_accepted)
            .max(self.valid_wait)
    }

    /// The declared reward floor.
    #[must_use]
    pub fn floor(&self) -> f32 {
        self.illegal_action
    }

    /// Reward for an accepted concrete action.
    #[must_use]
    pub fn accepted(&self, action: &crate::core::Action) -> f32 {
        use crate::core::Action;
        match action {
            Action::Wait => self.valid_wait,
            Action::Bet(_) => self.bet_accepted,
            Action::Hit => self.hit_accepted,
            Action::Skip => self.skip_accepted,
        }
    }

    fn validate(&self) {
        assert!(
            self.illegal_action.is_finite() && self.illegal_action < 0.0,
            "illegal_action must be finite and strictly negative"
        );
        for bonus in [
            self.valid_wait,
            self.bet_accepted,
            self.hit_accepted,
            self.skip_accepted,
        ] {
            assert!(bonus.is_finite() && bonus >= 0.0, "bonuses must be finite and non-negative");
        }
        assert!(self.ceiling() > 0.0, "at least one bonus must be strictly positive");
    }
}

/// Environment configuration, consumed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Number of seats at the table.
    pub player_count: usize,
    /// Smallest legal bet.
    pub bet_min: u32,
    /// Largest legal bet; sizes the Bet sub-range of the action space.
    pub bet_max: u32,
    /// Chips each seat starts the episode with.
    pub starting_bank: u32,
    /// Cards dealt to each seat at the start of a round.
    pub starting_hand_size: usize,
    /// Rounds per episode.
    pub rounds: u32,
    /// Consecutive illegal inputs tolerated before a fallback action is forced.
    pub max_continuous_invalid_inputs: u32,
    /// Reward constants.
    pub rewards: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            bet_min: 1,
            bet_max: 20,
            starting_bank: 100,
            starting_hand_size: 2,
            rounds: 3,
            max_continuous_invalid_inputs: 5,
            rewards: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Default configuration for the given seat count.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        let config = Self {
            player_count,
            ..Self::default()
        };
        config.validate();
        config
    }

    /// Set the bet bounds.
    #[must_use]
    pub fn with_bet_bounds(mut self, min: u32, max: u32) -> Self {
        self.bet_min = min;
        self.bet_max = max;
        self.validate();
        self
    }

    /// Set the starting bank.
    #[must_use]
    pub fn with_starting_bank(mut self, bank: u32) -> Self {
        self.starting_bank = bank;
        self.validate();
        self
    }

    /// Set the cards dealt per seat per round.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self.validate();
        self
    }

    /// Set the rounds per episode.
    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self.validate();
        self
    }

    /// Set the invalid-input ceiling.
    #[must_use]
    pub fn with_invalid_input_ceiling(mut self, ceiling: u32) -> Self {
        self.max_continuous_invalid_inputs = ceiling;
        self
    }

    /// Set the reward constants.
    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self.validate();
        self
    }

    fn validate(&self) {
        assert!(self.player_count >= 1, "Must have at least 1 player");
        assert!(self.player_count <= 255, "At most 255 players supported");
        assert!(self.bet_min >= 1, "bet_min must be at least 1");
        assert!(self.bet_min <= self.bet_max, "bet_min must not exceed bet_max");
        assert!(
            self.starting_bank >= self.bet_min,
            "starting_bank must cover the minimum bet"
        );
        assert!(self.rounds >= 1, "Must play at least 1 round");
        assert!(self.starting_hand_size >= 1, "Must deal at least 1 card");
        self.rewards.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;

    #[test]
    fn test_default_config() {
        let config = EnvConfig::default();
        assert_eq!(config.player_count, 2);
        assert_eq!(config.bet_min, 1);
        assert_eq!(config.bet_max, 20);
    }

    #[test]
    fn test_builder() {
        let config = EnvConfig::new(4)
            .with_bet_bounds(2, 10)
            .with_starting_bank(50)
            .with_rounds(1);

        assert_eq!(config.player_count, 4);
        assert_eq!(config.bet_min, 2);
        assert_eq!(config.bet_max, 10);
        assert_eq!(config.starting_bank, 50);
        assert_eq!(config.rounds, 1);
    }

    #[test]
    fn test_reward_range_signs() {
        let rewards = RewardConfig::default();
        assert!(rewards.floor() < 0.0);
        assert!(rewards.ceiling() > 0.0);
    }

    #[test]
    fn test_accepted_reward_per_variant() {
        let rewards = RewardConfig::default();
        assert_eq!(rewards.accepted(&Action::Wait), rewards.valid_wait);
        assert_eq!(rewards.accepted(&Action::Bet(3)), rewards.bet_accepted);
        assert_eq!(rewards.accepted(&Action::Hit), rewards.hit_accepted);
        assert_eq!(rewards.accepted(&Action::Skip), rewards.skip_accepted);
    }

    #[test]
    #[should_panic(expected = "bet_min must not exceed bet_max")]
    fn test_invalid_bet_bounds() {
        let _ = EnvConfig::new(2).with_bet_bounds(10, 5);
    }

    #[test]
    #[should_panic(expected = "strictly negative")]
    fn test_invalid_penalty_sign() {
        let _ = EnvConfig::new(2).with_rewards(RewardConfig {
            illegal_action: 0.5,
            ..RewardConfig::default()
        });
    }

    #[test]
    fn test_config_serialization() {
        let config = EnvConfig::new(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EnvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
