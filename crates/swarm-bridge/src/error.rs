//! Error types for swarm-bridge.

use swarm_core::{BridgeId, RegionId};
use swarm_knowledge::KnowledgeError;
use thiserror::Error;

/// Reasons a bridge cannot be evaluated this tick.  None of them mark the
/// bridge as checked; the agent retries on a later tick.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge {0} has no source/sink registered")]
    MissingRequest(BridgeId),

    #[error("region {region} of bridge {bridge} is not a rectangle")]
    UnsupportedRegion { bridge: BridgeId, region: RegionId },

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Alias for `Result<T, BridgeError>`.
pub type BridgeResult<T> = Result<T, BridgeError>;
