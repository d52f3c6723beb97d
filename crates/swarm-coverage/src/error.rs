//! Error types for swarm-coverage.

use thiserror::Error;

use crate::CoverageKind;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("{0} coverage asked for a waypoint before initialize")]
    NotInitialized(CoverageKind),

    #[error("rank {rank} is out of range for {agents} agents")]
    RankOutOfRange { rank: usize, agents: usize },

    #[error("invalid coverage parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown coverage kind {0:?}")]
    UnknownKind(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, CoverageError>`.
pub type CoverageResult<T> = Result<T, CoverageError>;
