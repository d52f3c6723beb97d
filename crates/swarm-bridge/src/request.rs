//! Bridge request resolution: bridge id → (source, sink) positions.

use swarm_core::{BridgeId, Position, RegionId};
use swarm_knowledge::{KnowledgeBase, KnowledgeError, KnowledgeExt};

use crate::{BridgeError, BridgeResult};

/// Midpoints of the bridge's source and sink regions.
///
/// Only rectangular regions resolve; anything else is reported as
/// [`BridgeError::UnsupportedRegion`].
pub fn resolve_endpoints<K: KnowledgeBase + ?Sized>(kb: &K, bridge: BridgeId) -> BridgeResult<(Position, Position)> {
    let (source, sink) = kb.bridge_endpoints(bridge).ok_or(BridgeError::MissingRequest(bridge))?;
    Ok((midpoint(kb, bridge, source)?, midpoint(kb, bridge, sink)?))
}

fn midpoint<K: KnowledgeBase + ?Sized>(kb: &K, bridge: BridgeId, region: RegionId) -> BridgeResult<Position> {
    let shape = kb.region(region).ok_or(KnowledgeError::RegionNotFound(region))?;
    shape.midpoint().ok_or(BridgeError::UnsupportedRegion { bridge, region })
}
