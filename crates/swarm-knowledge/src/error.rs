//! Error types for swarm-knowledge.

use swarm_core::{AreaId, RegionId};
use thiserror::Error;

/// Failures resolving registry entries.  All are transient from the
/// coordinators' point of view: the entry may simply not have replicated yet.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("search area {0} not registered")]
    AreaNotFound(AreaId),

    #[error("region {0} not registered")]
    RegionNotFound(RegionId),

    #[error("region {0} is not a rectangle")]
    NotRectangle(RegionId),
}

/// Alias for `Result<T, KnowledgeError>`.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
