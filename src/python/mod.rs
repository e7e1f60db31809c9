//! Python bindings for training loops.
//!
//! Exposes the blackjack environment with the usual gym-style surface:
//!
//! ```python
//! import cardgym
//!
//! env = cardgym.BlackjackEnv(player_count=2, seed=42)
//! observations = env.reset()
//! observations, rewards, terminals, info = env.step([1, 0])
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::*;

/// cardgym: a multi-agent card table with a discrete RL protocol.
#[pymodule]
fn cardgym(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBlackjackEnv>()?;
    Ok(())
}
