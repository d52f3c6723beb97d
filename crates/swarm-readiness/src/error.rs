//! Error types for swarm-readiness.

use swarm_core::AgentId;
use swarm_coverage::CoverageError;
use swarm_knowledge::KnowledgeError;
use thiserror::Error;

/// Why a cell could not be initialized this tick.  All of these are
/// transient; the coordinator retries on the next tick.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("agent {0} has no search area assigned")]
    Unassigned(AgentId),

    #[error("agent {0} is not available in its own replica yet")]
    NotAvailable(AgentId),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error(transparent)]
    Coverage(#[from] CoverageError),
}

/// Alias for `Result<T, ReadinessError>`.
pub type ReadinessResult<T> = Result<T, ReadinessError>;
