mod comparison;
mod integrators;
mod oscillator;
mod parameters;
mod trajectory;

pub mod beats;
pub mod newton_rings;
pub mod numeric;
pub mod wien;

pub use comparison::{compare, ComparisonReport, ComparisonRow, ComparisonSummary};
pub use integrators::{
    run_euler, run_reference, EulerIntegrator, OscillatorParameters, ReferenceIntegrator,
};
pub use oscillator::{derivative, harmonic_rhs, OscillatorState, StepCount, PERIOD};
pub use parameters::{DeserializationError, ParameterStore, ParameterStoreError, SerializationError};
pub use trajectory::Trajectory;

use numeric::adaptive::IntegrationError;
use thiserror::Error;

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Reference integration failed: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Newton iteration from x0 = {x0} did not reach a non-trivial root after {iterations} iterations")]
    RootNotFound { x0: f64, iterations: usize },

    #[error(transparent)]
    ParameterError {
        #[from]
        source: ParameterStoreError,
    },
}

impl SimulationError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        SimulationError::InvalidArgument(message.into())
    }
}
