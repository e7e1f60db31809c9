//! Step orchestrator: the environment adapter around a [`TurnEngine`].
//!
//! One external step call carries one integer per player. The orchestrator
//! decodes them, resolves the single designated actor against turn order and
//! legality, applies side effects through the engine, computes per-player
//! rewards, and forces progress when a player keeps submitting illegal input.
//!
//! Every submitted integer resolves to a well-defined effect or a well-defined
//! penalty; the only hard failures are structurally malformed calls.

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{Action, ActionRange, EnvConfig, GameRng, PlayerId, PlayerMap, TableState};
use crate::rules::{ApplyOutcome, GameResult, RangeSet, TurnEngine};

use super::codec::ActionCodec;
use super::obs::{ObservationSpace, TableEncoder};

/// Malformed call shape. Unlike illegal actions, which are absorbed with a
/// penalty, this surfaces to the caller: it indicates an integration bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The actions sequence has the wrong arity.
    #[error("expected {expected} action indices, got {got}")]
    WrongArity { expected: usize, got: usize },
    /// The episode already ended.
    #[error("step called on a finished episode; call reset first")]
    EpisodeFinished,
}

/// How one player's submission resolved this call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The action matched an accepted range and was applied.
    Accepted,
    /// A non-acting player waited, the valid no-op.
    ValidWait,
    /// Decodable action outside the accepted set. Penalized, state unchanged.
    RejectedIllegal,
    /// The integer decodes to no action at all. Penalized, state unchanged.
    InvalidEncoding,
    /// Rejection escalated: a fallback action was synthesized and applied.
    Forced,
}

/// Auxiliary step metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct StepInfo {
    /// Per-player resolution tags, seat order.
    pub outcomes: Vec<StepOutcome>,
    /// Fallback actions synthesized this call.
    pub forced: Vec<(PlayerId, Action)>,
    /// The seat due to act after this call, if any.
    pub next_player: Option<PlayerId>,
}

/// Everything one step call returns.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// One observation vector per player.
    pub observations: Vec<Vec<f32>>,
    /// One reward per player.
    pub rewards: Vec<f32>,
    /// Game-over flag, replicated per player for protocol uniformity.
    pub terminals: Vec<bool>,
    /// Auxiliary metadata.
    pub info: StepInfo,
}

/// Ordered accepted-range sets for one resolution pass.
///
/// Every player appears exactly once, in seat order; recomputed after every
/// accepted mutation.
#[derive(Clone, Debug)]
pub struct PendingTurns {
    entries: Vec<(PlayerId, RangeSet)>,
}

impl PendingTurns {
    fn compute<E: TurnEngine>(engine: &E, state: &TableState) -> Self {
        let entries = state
            .player_ids()
            .map(|player| (player, engine.legal_ranges(state, player)))
            .collect();
        Self { entries }
    }

    /// Accepted ranges for a player. Empty means nothing to do this call.
    #[must_use]
    pub fn ranges(&self, player: PlayerId) -> &[ActionRange] {
        &self.entries[player.index()].1
    }

    /// The designated actor: the first seat with a non-empty range set.
    #[must_use]
    pub fn next_actor(&self) -> Option<PlayerId> {
        self.entries
            .iter()
            .find(|(_, ranges)| !ranges.is_empty())
            .map(|(player, _)| *player)
    }
}

/// The environment adapter: a [`TurnEngine`] exposed through fixed-size
/// discrete action and observation protocols.
pub struct TableEnv<E: TurnEngine> {
    engine: E,
    config: EnvConfig,
    codec: ActionCodec,
    encoder: TableEncoder,
    state: TableState,
    pending: PendingTurns,
    invalid_counts: PlayerMap<u32>,
    rng: GameRng,
    terminal: bool,
}

impl<E: TurnEngine> TableEnv<E> {
    /// Wrap an engine. The seed drives all randomness for the episode.
    #[must_use]
    pub fn new(engine: E, seed: u64) -> Self {
        let config = engine.config().clone();
        let codec = ActionCodec::new(config.bet_min, config.bet_max);
        let encoder = TableEncoder::new(
            config.player_count,
            codec.cardinality(),
            // Banks can grow past the starting stack by winning pots
            (config.starting_bank * 2) as f32,
            config.bet_max as f32,
        );

        let mut rng = GameRng::new(seed);
        let state = engine.initial_state(&mut rng);
        let pending = PendingTurns::compute(&engine, &state);
        let invalid_counts = PlayerMap::with_value(config.player_count, 0);

        Self {
            engine,
            config,
            codec,
            encoder,
            state,
            pending,
            invalid_counts,
            rng,
            terminal: false,
        }
    }

    /// Start a fresh episode. Returns one observation per player.
    pub fn reset(&mut self) -> Vec<Vec<f32>> {
        self.state = self.engine.initial_state(&mut self.rng);
        self.pending = PendingTurns::compute(&self.engine, &self.state);
        self.invalid_counts = PlayerMap::with_value(self.config.player_count, 0);
        self.terminal = false;
        self.observations()
    }

    /// Resolve one step call: one integer per player, exactly
    /// `player_count` entries.
    pub fn step(&mut self, actions: &[i64]) -> Result<StepResult, ProtocolError> {
        if self.terminal {
            return Err(ProtocolError::EpisodeFinished);
        }

        let player_count = self.config.player_count;
        if actions.len() != player_count {
            return Err(ProtocolError::WrongArity {
                expected: player_count,
                got: actions.len(),
            });
        }

        let mut rewards = vec![0.0f32; player_count];
        let mut outcomes = vec![StepOutcome::ValidWait; player_count];
        let mut forced = Vec::new();

        // Computed once per call: only this seat's integer has effect.
        let actor = self.pending.next_actor();

        for player in PlayerId::all(player_count) {
            let idx = player.index();
            let is_actor = actor == Some(player);

            let accepted = match self.codec.decode(actions[idx]) {
                Ok(action) if is_actor => {
                    let in_range = self
                        .pending
                        .ranges(player)
                        .iter()
                        .any(|range| range.accepts(&action));
                    // Wait never reaches the engine, even when advertised
                    let applied = in_range
                        && (action == Action::Wait || self.apply_accepted(player, &action));
                    if applied {
                        rewards[idx] = self.config.rewards.accepted(&action);
                        outcomes[idx] = StepOutcome::Accepted;
                        true
                    } else {
                        outcomes[idx] = StepOutcome::RejectedIllegal;
                        false
                    }
                }
                Ok(Action::Wait) => {
                    // Not this seat's turn; waiting is the valid no-op.
                    rewards[idx] = self.config.rewards.valid_wait;
                    outcomes[idx] = StepOutcome::ValidWait;
                    true
                }
                Ok(_) => {
                    outcomes[idx] = StepOutcome::RejectedIllegal;
                    false
                }
                Err(err) => {
                    warn!(
                        player = idx,
                        index = err.index,
                        cardinality = err.cardinality,
                        "undecodable action index"
                    );
                    outcomes[idx] = StepOutcome::InvalidEncoding;
                    false
                }
            };

            if accepted {
                self.invalid_counts[player] = 0;
            } else {
                rewards[idx] = self.config.rewards.illegal_action;
                self.invalid_counts[player] += 1;
                if self.invalid_counts[player] > self.config.max_continuous_invalid_inputs {
                    self.force_progress(player, &mut outcomes, &mut forced);
                }
            }
        }

        self.terminal = self.engine.is_terminal(&self.state).is_some();

        Ok(StepResult {
            observations: self.observations(),
            rewards,
            terminals: vec![self.terminal; player_count],
            info: StepInfo {
                outcomes,
                forced,
                next_player: self.pending.next_actor(),
            },
        })
    }

    /// Apply an in-range action through the engine, keeping the pending set
    /// current. Returns false on the defensive path where the engine still
    /// rejects.
    fn apply_accepted(&mut self, player: PlayerId, action: &Action) -> bool {
        match self.engine.apply(&mut self.state, player, action) {
            ApplyOutcome::Accepted => {
                self.pending = PendingTurns::compute(&self.engine, &self.state);
                true
            }
            ApplyOutcome::RejectedIllegal => false,
        }
    }

    /// Escalation: synthesize a uniform-random action from the player's
    /// current accepted set and apply it, so one uncooperative agent cannot
    /// stall the episode. Seats with nothing to do get a synthesized Wait.
    ///
    /// The penalty already assigned for this call stands; only the counter
    /// resets.
    fn force_progress(
        &mut self,
        player: PlayerId,
        outcomes: &mut [StepOutcome],
        forced: &mut Vec<(PlayerId, Action)>,
    ) {
        let ranges: RangeSet = self.pending.ranges(player).iter().copied().collect();
        let action = match self.rng.choose(&ranges) {
            Some(range) => {
                let range = *range;
                range.sample(&mut self.rng)
            }
            None => Action::Wait,
        };

        debug!(player = player.index(), action = %action, "forcing fallback action");

        let applied = action == Action::Wait || self.apply_accepted(player, &action);
        if applied {
            self.invalid_counts[player] = 0;
            outcomes[player.index()] = StepOutcome::Forced;
            forced.push((player, action));
        }
    }

    fn observations(&self) -> Vec<Vec<f32>> {
        PlayerId::all(self.config.player_count)
            .map(|player| {
                let mask = self.codec.legal_mask(self.pending.ranges(player));
                self.encoder.encode(&self.state, &mask, player)
            })
            .collect()
    }

    // === Declared spaces and introspection ===

    /// Size of the flat discrete action space.
    #[must_use]
    pub fn action_space_cardinality(&self) -> usize {
        self.codec.cardinality()
    }

    /// The fixed composite observation shape.
    #[must_use]
    pub fn observation_space(&self) -> ObservationSpace {
        self.encoder.space()
    }

    /// Declared reward bounds: (strictly negative floor, strictly positive
    /// ceiling).
    #[must_use]
    pub fn reward_range(&self) -> (f32, f32) {
        (self.config.rewards.floor(), self.config.rewards.ceiling())
    }

    /// The codec, for encoding actions in drivers and tests.
    #[must_use]
    pub fn codec(&self) -> &ActionCodec {
        &self.codec
    }

    /// The configuration in force.
    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Borrow the current table state.
    #[must_use]
    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// The seat due to act next, if any.
    #[must_use]
    pub fn next_player(&self) -> Option<PlayerId> {
        self.pending.next_actor()
    }

    /// A player's current accepted ranges.
    #[must_use]
    pub fn accepted_ranges(&self, player: PlayerId) -> &[ActionRange] {
        self.pending.ranges(player)
    }

    /// A player's consecutive-invalid-input count.
    #[must_use]
    pub fn invalid_count(&self, player: PlayerId) -> u32 {
        self.invalid_counts[player]
    }

    /// Whether the episode has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The game result once terminal.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.engine.is_terminal(&self.state)
    }
}
