//! The RL adapter: action codec, observation builder, step orchestrator.

pub mod codec;
pub mod obs;
pub mod orchestrator;

pub use codec::{ActionCodec, InvalidEncoding};
pub use obs::{ObservationSpace, TableEncoder};
pub use orchestrator::{
    PendingTurns, ProtocolError, StepInfo, StepOutcome, StepResult, TableEnv,
};
