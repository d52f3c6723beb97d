use swarm_core::CoreError;
use swarm_coverage::CoverageError;
use swarm_readiness::ReadinessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("swarm configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SwarmResult<T> = Result<T, SwarmError>;
