//! Environment bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{EnvConfig, PlayerId};
use crate::env::{ProtocolError, StepOutcome, TableEnv};
use crate::games::blackjack::Blackjack;

fn outcome_name(outcome: StepOutcome) -> &'static str {
    match outcome {
        StepOutcome::Accepted => "accepted",
        StepOutcome::ValidWait => "valid_wait",
        StepOutcome::RejectedIllegal => "rejected_illegal",
        StepOutcome::InvalidEncoding => "invalid_encoding",
        StepOutcome::Forced => "forced",
    }
}

fn protocol_error(err: ProtocolError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python wrapper for a blackjack table environment.
#[pyclass(name = "BlackjackEnv")]
pub struct PyBlackjackEnv {
    inner: TableEnv<Blackjack>,
}

#[pymethods]
impl PyBlackjackEnv {
    /// Create an environment.
    #[new]
    #[pyo3(signature = (player_count=2, seed=0, rounds=3, max_continuous_invalid_inputs=5))]
    fn new(
        player_count: usize,
        seed: u64,
        rounds: u32,
        max_continuous_invalid_inputs: u32,
    ) -> Self {
        let config = EnvConfig::new(player_count)
            .with_rounds(rounds)
            .with_invalid_input_ceiling(max_continuous_invalid_inputs);
        Self {
            inner: TableEnv::new(Blackjack::new(config), seed),
        }
    }

    /// Start a fresh episode. Returns one observation array per player.
    fn reset<'py>(&mut self, py: Python<'py>) -> Vec<Bound<'py, PyArray1<f32>>> {
        self.inner
            .reset()
            .iter()
            .map(|obs| PyArray1::from_slice_bound(py, obs))
            .collect()
    }

    /// Resolve one step: one integer per player.
    ///
    /// Returns `(observations, rewards, terminals, info)`.
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        actions: Vec<i64>,
    ) -> PyResult<(
        Vec<Bound<'py, PyArray1<f32>>>,
        Vec<f32>,
        Vec<bool>,
        Bound<'py, PyDict>,
    )> {
        let result = self.inner.step(&actions).map_err(protocol_error)?;

        let observations = result
            .observations
            .iter()
            .map(|obs| PyArray1::from_slice_bound(py, obs))
            .collect();

        let info = PyDict::new_bound(py);
        let outcomes: Vec<&'static str> = result
            .info
            .outcomes
            .iter()
            .map(|&outcome| outcome_name(outcome))
            .collect();
        info.set_item("outcomes", outcomes)?;
        info.set_item(
            "next_player",
            result.info.next_player.map(PlayerId::index),
        )?;
        info.set_item(
            "forced",
            result
                .info
                .forced
                .iter()
                .map(|(player, action)| (player.index(), action.to_string()))
                .collect::<Vec<_>>(),
        )?;

        Ok((observations, result.rewards, result.terminals, info))
    }

    /// Size of the flat discrete action space.
    #[getter]
    fn action_space_size(&self) -> usize {
        self.inner.action_space_cardinality()
    }

    /// Flattened width of one observation.
    #[getter]
    fn observation_size(&self) -> usize {
        self.inner.observation_space().flat_dim()
    }

    /// `(floor, ceiling)` of per-step rewards.
    #[getter]
    fn reward_range(&self) -> (f32, f32) {
        self.inner.reward_range()
    }

    /// Seat index due to act next, or None.
    #[getter]
    fn next_player(&self) -> Option<usize> {
        self.inner.next_player().map(PlayerId::index)
    }

    /// Whether the episode has ended.
    #[getter]
    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    fn __repr__(&self) -> String {
        format!(
            "BlackjackEnv(players={}, actions={})",
            self.inner.config().player_count,
            self.inner.action_space_cardinality()
        )
    }
}
